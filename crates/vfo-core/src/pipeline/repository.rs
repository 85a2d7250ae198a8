//! Workflow repository trait.

use super::workflow::WorkflowDefinition;
use crate::error::Result;

/// Persistence contract for imported workflows, keyed by `workflow_key`.
pub trait WorkflowRepository: Send + Sync {
    fn list(&self) -> Result<Vec<WorkflowDefinition>>;

    fn find_by_key(&self, workflow_key: &str) -> Result<Option<WorkflowDefinition>>;

    /// Upserts every workflow in one write, in the given order.
    fn upsert_all(&self, workflows: Vec<WorkflowDefinition>) -> Result<()>;

    fn delete(&self, workflow_key: &str) -> Result<()>;
}
