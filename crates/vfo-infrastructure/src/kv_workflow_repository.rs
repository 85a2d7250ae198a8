//! Workflow repository over a key-value store.
//!
//! Key: `workflows` → `[WorkflowDefinition]`

use std::sync::Arc;

use vfo_core::error::Result;
use vfo_core::pipeline::{WorkflowDefinition, WorkflowRepository};
use vfo_core::store::{KeyValueStore, KeyValueStoreExt, keys};

pub struct KvWorkflowRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvWorkflowRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl WorkflowRepository for KvWorkflowRepository {
    fn list(&self) -> Result<Vec<WorkflowDefinition>> {
        Ok(self.store.get_or_default(keys::WORKFLOWS))
    }

    fn find_by_key(&self, workflow_key: &str) -> Result<Option<WorkflowDefinition>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|w| w.workflow_key == workflow_key))
    }

    fn upsert_all(&self, workflows: Vec<WorkflowDefinition>) -> Result<()> {
        self.store
            .update(keys::WORKFLOWS, |all: &mut Vec<WorkflowDefinition>| {
                for wf in workflows {
                    match all.iter_mut().find(|w| w.workflow_key == wf.workflow_key) {
                        Some(existing) => *existing = wf,
                        None => all.push(wf),
                    }
                }
            })
    }

    fn delete(&self, workflow_key: &str) -> Result<()> {
        self.store
            .update(keys::WORKFLOWS, |all: &mut Vec<WorkflowDefinition>| {
                all.retain(|w| w.workflow_key != workflow_key)
            })
    }
}
