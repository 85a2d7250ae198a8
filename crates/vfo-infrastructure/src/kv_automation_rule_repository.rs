//! Automation rule repository over a key-value store.
//!
//! Key: `automation_rules` → `[AutomationRule]`

use std::sync::Arc;

use vfo_core::automation::{AutomationRule, AutomationRuleRepository};
use vfo_core::error::Result;
use vfo_core::store::{KeyValueStore, KeyValueStoreExt, keys};

pub struct KvAutomationRuleRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvAutomationRuleRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl AutomationRuleRepository for KvAutomationRuleRepository {
    fn list(&self) -> Result<Vec<AutomationRule>> {
        Ok(self.store.get_or_default(keys::AUTOMATION_RULES))
    }

    fn upsert(&self, rule: AutomationRule) -> Result<()> {
        self.store
            .update(keys::AUTOMATION_RULES, |all: &mut Vec<AutomationRule>| {
                match all.iter_mut().find(|r| r.id == rule.id) {
                    Some(existing) => *existing = rule,
                    None => all.push(rule),
                }
            })
    }

    fn insert_if_absent(&self, rule: AutomationRule) -> Result<bool> {
        self.store
            .update(keys::AUTOMATION_RULES, |all: &mut Vec<AutomationRule>| {
                if all.iter().any(|r| r.id == rule.id) {
                    false
                } else {
                    all.push(rule);
                    true
                }
            })
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.store
            .update(keys::AUTOMATION_RULES, |all: &mut Vec<AutomationRule>| {
                all.retain(|r| r.id != id)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use vfo_core::automation::{AutomationAction, AutomationEvent};

    #[test]
    fn test_upsert_keeps_position() {
        let repo = KvAutomationRuleRepository::new(Arc::new(MemoryStore::new()));
        for id in ["r1", "r2", "r3"] {
            repo.upsert(AutomationRule::new(id, id, AutomationEvent::StageChange))
                .unwrap();
        }
        repo.upsert(
            AutomationRule::new("r2", "renamed", AutomationEvent::StageChange)
                .with_action(AutomationAction::log("x")),
        )
        .unwrap();

        let rules = repo.list().unwrap();
        let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3"]);
        assert_eq!(rules[1].name, "renamed");
    }

    #[test]
    fn test_insert_if_absent_does_not_overwrite() {
        let repo = KvAutomationRuleRepository::new(Arc::new(MemoryStore::new()));
        repo.upsert(AutomationRule::new("r1", "edited", AutomationEvent::StageChange))
            .unwrap();
        let inserted = repo
            .insert_if_absent(AutomationRule::new("r1", "seed", AutomationEvent::StageChange))
            .unwrap();
        assert!(!inserted);
        assert_eq!(repo.list().unwrap()[0].name, "edited");
    }
}
