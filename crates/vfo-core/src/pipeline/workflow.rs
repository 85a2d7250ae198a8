//! Imported workflow definitions.
//!
//! A workflow is an externally authored pipeline (stage keys, names, SLAs and
//! owners). Stored workflows double as pipeline definitions.

use serde::{Deserialize, Serialize};

use super::definition::{PipelineDefinition, StageDef};
use crate::error::{Result, VfoError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStage {
    pub stage_key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub workflow_key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pipeline: String,
    #[serde(default)]
    pub stages: Vec<WorkflowStage>,
}

impl From<&WorkflowDefinition> for PipelineDefinition {
    fn from(wf: &WorkflowDefinition) -> Self {
        PipelineDefinition {
            key: wf.workflow_key.clone(),
            name: if wf.name.is_empty() {
                wf.workflow_key.clone()
            } else {
                wf.name.clone()
            },
            stages: wf
                .stages
                .iter()
                .map(|s| StageDef::new(s.stage_key.clone(), s.name.clone()))
                .collect(),
        }
    }
}

/// Parses a workflow import payload: a single object or an array of objects.
///
/// The payload is accepted or rejected as a whole. Nothing is returned for a
/// partially valid document.
pub fn parse_workflow_import(text: &str) -> Result<Vec<WorkflowDefinition>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| VfoError::import(format!("Invalid JSON: {}", e)))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    let mut workflows = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let wf: WorkflowDefinition = serde_json::from_value(item)
            .map_err(|e| VfoError::import(format!("Workflow #{}: {}", idx, e)))?;
        if wf.workflow_key.trim().is_empty() {
            return Err(VfoError::import(format!(
                "Workflow #{}: workflow_key must not be empty",
                idx
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for stage in &wf.stages {
            if !seen.insert(stage.stage_key.as_str()) {
                return Err(VfoError::import(format!(
                    "Workflow '{}': duplicate stage_key '{}'",
                    wf.workflow_key, stage.stage_key
                )));
            }
        }
        workflows.push(wf);
    }

    Ok(workflows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_object_import() {
        let json = r#"{"workflow_key":"wyoming_apt_v1","name":"Wyoming APT","pipeline":"Legal",
            "stages":[{"stage_key":"intake","name":"Intake","sla":"2d"},{"stage_key":"drafting","name":"Drafting"}]}"#;
        let wfs = parse_workflow_import(json).unwrap();
        assert_eq!(wfs.len(), 1);
        assert_eq!(wfs[0].stages[0].sla.as_deref(), Some("2d"));

        let pipeline = PipelineDefinition::from(&wfs[0]);
        assert_eq!(pipeline.stage_keys(), vec!["intake", "drafting"]);
    }

    #[test]
    fn test_invalid_json_rejects_everything() {
        let err = parse_workflow_import("[{\"workflow_key\":\"a\"}, {oops}]").unwrap_err();
        assert!(err.is_import());
    }

    #[test]
    fn test_one_bad_entry_rejects_the_array() {
        let json = r#"[{"workflow_key":"a","stages":[]},{"name":"missing key"}]"#;
        assert!(parse_workflow_import(json).is_err());
    }
}
