//! Email template repository over a key-value store.
//!
//! Key: `email_templates` → `[EmailTemplate]`

use std::sync::Arc;

use vfo_core::error::Result;
use vfo_core::store::{KeyValueStore, KeyValueStoreExt, keys};
use vfo_core::template::{EmailTemplate, EmailTemplateRepository};

pub struct KvEmailTemplateRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvEmailTemplateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl EmailTemplateRepository for KvEmailTemplateRepository {
    fn list(&self) -> Result<Vec<EmailTemplate>> {
        Ok(self.store.get_or_default(keys::EMAIL_TEMPLATES))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<EmailTemplate>> {
        Ok(self.list()?.into_iter().find(|t| t.id == id))
    }

    fn upsert(&self, template: EmailTemplate) -> Result<()> {
        self.store
            .update(keys::EMAIL_TEMPLATES, |all: &mut Vec<EmailTemplate>| {
                match all.iter_mut().find(|t| t.id == template.id) {
                    Some(existing) => *existing = template,
                    None => all.push(template),
                }
            })
    }

    fn insert_if_absent(&self, template: EmailTemplate) -> Result<bool> {
        self.store
            .update(keys::EMAIL_TEMPLATES, |all: &mut Vec<EmailTemplate>| {
                if all.iter().any(|t| t.id == template.id) {
                    false
                } else {
                    all.push(template);
                    true
                }
            })
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.store
            .update(keys::EMAIL_TEMPLATES, |all: &mut Vec<EmailTemplate>| {
                all.retain(|t| t.id != id)
            })
    }
}
