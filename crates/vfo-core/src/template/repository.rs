//! Email template repository trait.

use super::model::EmailTemplate;
use crate::error::Result;

/// Persistence contract for email templates, keyed by `id`.
pub trait EmailTemplateRepository: Send + Sync {
    fn list(&self) -> Result<Vec<EmailTemplate>>;

    fn find_by_id(&self, id: &str) -> Result<Option<EmailTemplate>>;

    /// Inserts or overwrites the template with the same id. Stored as given.
    fn upsert(&self, template: EmailTemplate) -> Result<()>;

    /// Inserts only when no template with this id exists. Returns whether it
    /// was inserted.
    fn insert_if_absent(&self, template: EmailTemplate) -> Result<bool>;

    fn delete(&self, id: &str) -> Result<()>;
}
