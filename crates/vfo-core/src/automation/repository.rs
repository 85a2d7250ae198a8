//! Automation rule repository trait.

use super::model::AutomationRule;
use crate::error::Result;

/// Persistence contract for automation rules, keyed by `id`.
///
/// Stored order is evaluation order: new rules are appended and an upsert of
/// an existing id keeps its position.
pub trait AutomationRuleRepository: Send + Sync {
    fn list(&self) -> Result<Vec<AutomationRule>>;

    fn upsert(&self, rule: AutomationRule) -> Result<()>;

    /// Inserts only when no rule with this id exists.
    fn insert_if_absent(&self, rule: AutomationRule) -> Result<bool>;

    fn delete(&self, id: &str) -> Result<()>;
}
