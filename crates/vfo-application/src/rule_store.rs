//! Automation rule service.

use std::sync::Arc;

use vfo_core::automation::{
    AutomationEvent, AutomationRule, AutomationRuleRepository, TransitionContext, matching_rules,
};
use vfo_core::error::Result;

/// CRUD over automation rules plus matching against a transition.
///
/// Actions are not validated on save. A rule that references a missing
/// template is stored as-is and does nothing when it fires.
pub struct AutomationRuleStore {
    repository: Arc<dyn AutomationRuleRepository>,
}

impl AutomationRuleStore {
    pub fn new(repository: Arc<dyn AutomationRuleRepository>) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Result<Vec<AutomationRule>> {
        self.repository.list()
    }

    pub fn upsert(&self, rule: AutomationRule) -> Result<AutomationRule> {
        tracing::info!("[Rules] Saving rule '{}' ({})", rule.name, rule.id);
        self.repository.upsert(rule.clone())?;
        Ok(rule)
    }

    pub fn insert_if_absent(&self, rule: AutomationRule) -> Result<bool> {
        self.repository.insert_if_absent(rule)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.repository.delete(id)
    }

    /// Rules matching `ctx`, in stored (insertion) order.
    pub fn matching(
        &self,
        event: &AutomationEvent,
        ctx: &TransitionContext,
    ) -> Result<Vec<AutomationRule>> {
        let rules = self.list()?;
        Ok(matching_rules(&rules, event, ctx)
            .into_iter()
            .cloned()
            .collect())
    }
}
