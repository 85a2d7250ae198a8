//! Workflow (custom pipeline) service.

use std::sync::Arc;

use vfo_core::error::Result;
use vfo_core::pipeline::{
    PipelineDefinition, WorkflowDefinition, WorkflowRepository, parse_workflow_import,
};

pub struct WorkflowService {
    repository: Arc<dyn WorkflowRepository>,
}

impl WorkflowService {
    pub fn new(repository: Arc<dyn WorkflowRepository>) -> Self {
        Self { repository }
    }

    pub fn list(&self) -> Result<Vec<WorkflowDefinition>> {
        self.repository.list()
    }

    /// Imports a JSON object or array of workflows, upserting by
    /// `workflow_key`. A payload with any error imports nothing.
    pub fn import_json(&self, text: &str) -> Result<Vec<WorkflowDefinition>> {
        let workflows = match parse_workflow_import(text) {
            Ok(workflows) => workflows,
            Err(e) => {
                tracing::warn!("[Workflows] Import rejected: {}", e);
                return Err(e);
            }
        };
        self.repository.upsert_all(workflows.clone())?;
        tracing::info!("[Workflows] Imported {} workflow(s)", workflows.len());
        Ok(workflows)
    }

    pub fn delete(&self, workflow_key: &str) -> Result<()> {
        self.repository.delete(workflow_key)
    }

    /// Built-in tracks followed by stored workflows. A stored workflow never
    /// shadows a built-in key.
    pub fn definitions(&self) -> Result<Vec<PipelineDefinition>> {
        let mut defs = PipelineDefinition::builtin();
        for wf in self.list()? {
            if !defs.iter().any(|d| d.key == wf.workflow_key) {
                defs.push(PipelineDefinition::from(&wf));
            }
        }
        Ok(defs)
    }

    pub fn definition_for(&self, key: &str) -> Result<Option<PipelineDefinition>> {
        Ok(self.definitions()?.into_iter().find(|d| d.key == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfo_infrastructure::{KvWorkflowRepository, MemoryStore};

    fn service() -> WorkflowService {
        WorkflowService::new(Arc::new(KvWorkflowRepository::new(Arc::new(MemoryStore::new()))))
    }

    #[test]
    fn test_import_upserts_by_key() {
        let service = service();
        service
            .import_json(r#"{"workflow_key":"apt","name":"APT","pipeline":"Legal","stages":[{"stage_key":"intake","name":"Intake"}]}"#)
            .unwrap();
        service
            .import_json(r#"[{"workflow_key":"apt","name":"APT v2","pipeline":"Legal","stages":[]},
                            {"workflow_key":"llps","name":"LLPS","pipeline":"Legal","stages":[]}]"#)
            .unwrap();

        let all = service.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "APT v2");
        assert!(service.definition_for("llps").unwrap().is_some());
    }

    #[test]
    fn test_rejected_import_applies_nothing() {
        let service = service();
        let err = service
            .import_json(r#"[{"workflow_key":"ok","stages":[]},{"workflow_key":""}]"#)
            .unwrap_err();
        assert!(err.is_import());
        assert!(service.list().unwrap().is_empty());
    }
}
