//! Application services for the vfo engine.
//!
//! Build a [`Workspace`] over a store and call [`Workspace::init`]; every
//! service hangs off it.

pub mod activity_log;
pub mod automation_runner;
pub mod bootstrap;
pub mod client_records;
pub mod csv_import;
pub mod lifecycle;
pub mod nurture_engine;
pub mod rule_store;
pub mod site_settings;
pub mod state_machine;
pub mod template_catalog;
pub mod workflows;
pub mod workspace;

pub use activity_log::ActivityLog;
pub use automation_runner::{ActionOutcome, AutomationRunner};
pub use bootstrap::SeedReport;
pub use client_records::ClientRecordStore;
pub use lifecycle::LifecycleHooks;
pub use nurture_engine::{DispatchOutcome, NurtureSequenceEngine};
pub use rule_store::AutomationRuleStore;
pub use site_settings::{CatalogService, SiteConfigService};
pub use state_machine::{PipelineEntry, PipelineStateMachine, StageChange, TransitionReport};
pub use template_catalog::{EmailTemplateCatalog, RenderedEmail};
pub use workflows::WorkflowService;
pub use workspace::Workspace;
