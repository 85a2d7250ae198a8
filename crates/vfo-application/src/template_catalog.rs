//! Email template catalog service.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use vfo_core::error::Result;
use vfo_core::template::{EmailTemplate, EmailTemplateRepository, TemplateShell, resolve};

use crate::site_settings::SiteConfigService;

/// A template resolved against one recipient's merge variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedEmail {
    pub template_id: String,
    pub subject: String,
    pub html: String,
}

/// CRUD over shared email templates.
///
/// Consumers hold template ids and resolve them at send time, so an edit is
/// visible to every sequence step and rule that references the template.
pub struct EmailTemplateCatalog {
    repository: Arc<dyn EmailTemplateRepository>,
    site: Arc<SiteConfigService>,
}

impl EmailTemplateCatalog {
    pub fn new(repository: Arc<dyn EmailTemplateRepository>, site: Arc<SiteConfigService>) -> Self {
        Self { repository, site }
    }

    pub fn list(&self) -> Result<Vec<EmailTemplate>> {
        self.repository.list()
    }

    pub fn get(&self, id: &str) -> Result<Option<EmailTemplate>> {
        self.repository.find_by_id(id)
    }

    /// The shell currently derived from site branding.
    pub fn shell(&self) -> TemplateShell {
        TemplateShell::from_site_config(&self.site.get())
    }

    /// Wraps a raw fragment in the branded shell.
    pub fn wrap(&self, raw_html: &str) -> String {
        self.shell().wrap(raw_html)
    }

    /// Saves the template, wrapping its raw content exactly once and
    /// assigning an id when it has none. Returns what was stored.
    pub fn upsert(&self, template: EmailTemplate) -> Result<EmailTemplate> {
        let stored = if template.id.trim().is_empty() {
            None
        } else {
            self.get(&template.id)?
        };
        let prepared = template.prepared_for_save(&self.shell(), stored.as_ref());
        tracing::info!("[Templates] Saving template '{}' ({})", prepared.name, prepared.id);
        self.repository.upsert(prepared.clone())?;
        Ok(prepared)
    }

    /// Saves the template only when its id is free. Used for default content.
    pub fn insert_if_absent(&self, template: EmailTemplate) -> Result<bool> {
        self.repository
            .insert_if_absent(template.prepared_for_save(&self.shell(), None))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.repository.delete(id)
    }

    /// Resolves subject and html against `vars`. `Ok(None)` when the id does
    /// not name a template.
    pub fn render(&self, template_id: &str, vars: &HashMap<String, String>) -> Result<Option<RenderedEmail>> {
        Ok(self.get(template_id)?.map(|t| RenderedEmail {
            template_id: t.id.clone(),
            subject: resolve(&t.subject, vars),
            html: resolve(&t.html, vars),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfo_core::store::KeyValueStore;
    use vfo_core::template::shell_depth;
    use vfo_infrastructure::{KvEmailTemplateRepository, MemoryStore};

    fn catalog() -> EmailTemplateCatalog {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        EmailTemplateCatalog::new(
            Arc::new(KvEmailTemplateRepository::new(store.clone())),
            Arc::new(SiteConfigService::new(store)),
        )
    }

    #[test]
    fn test_upsert_synthesizes_id_and_wraps_once() {
        let catalog = catalog();
        let saved = catalog
            .upsert(EmailTemplate::new("Consult Reminder", "See you soon", "<p>Hi</p>"))
            .unwrap();
        assert!(saved.id.starts_with("consult-reminder-"));
        assert_eq!(shell_depth(&saved.html), 1);

        let mut edited = catalog.get(&saved.id).unwrap().unwrap();
        edited.name = "Consult Reminder v2".to_string();
        let resaved = catalog.upsert(edited).unwrap();
        assert_eq!(resaved.id, saved.id);
        assert_eq!(shell_depth(&resaved.html), 1);
        assert_eq!(catalog.list().unwrap().len(), 1);
    }

    #[test]
    fn test_edited_html_is_what_gets_stored() {
        let catalog = catalog();
        let saved = catalog
            .upsert(EmailTemplate::new("Welcome", "Hi", "<p>old</p>").with_id("welcome"))
            .unwrap();

        let mut edited = saved.clone();
        edited.html = "<p>new body</p>".to_string();
        catalog.upsert(edited).unwrap();

        let stored = catalog.get("welcome").unwrap().unwrap();
        assert!(stored.html.contains("<p>new body</p>"));
        assert!(!stored.html.contains("<p>old</p>"));
        assert_eq!(stored.content.as_deref(), Some("<p>new body</p>"));
        assert_eq!(shell_depth(&stored.html), 1);
    }

    #[test]
    fn test_render_resolves_tags_and_missing_template_is_none() {
        let catalog = catalog();
        catalog
            .upsert(EmailTemplate::new("Welcome", "Welcome {{name}}", "<p>{{email}}</p>").with_id("welcome"))
            .unwrap();

        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Ann".to_string());
        let rendered = catalog.render("welcome", &vars).unwrap().unwrap();
        assert_eq!(rendered.subject, "Welcome Ann");
        assert!(rendered.html.contains("<p></p>"));

        assert!(catalog.render("missing", &vars).unwrap().is_none());
    }
}
