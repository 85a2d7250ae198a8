//! Pipeline definitions, imported workflows and derived views.

pub mod definition;
mod repository;
pub mod views;
pub mod workflow;

pub use definition::{
    KANBAN_PIPELINE, PipelineDefinition, SIMPLE_PIPELINE, SIMPLE_STAGES, StageDef,
};
pub use repository::WorkflowRepository;
pub use views::{KanbanColumn, candidate_type, kanban_columns, pipeline_status_label};
pub use workflow::{WorkflowDefinition, WorkflowStage, parse_workflow_import};
