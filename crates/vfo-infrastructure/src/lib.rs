//! Storage and configuration for the vfo engine.
//!
//! - `storage`: [`KeyValueStore`](vfo_core::store::KeyValueStore) implementations
//! - `kv_*_repository`: repository traits from `vfo-core` implemented over a store
//! - `config_service` / `paths`: `config.toml` loading and file locations

pub mod config_service;
pub mod kv_automation_rule_repository;
pub mod kv_booking_repository;
pub mod kv_email_template_repository;
pub mod kv_nurture_sequence_repository;
pub mod kv_workflow_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::kv_automation_rule_repository::KvAutomationRuleRepository;
pub use crate::kv_booking_repository::KvBookingRepository;
pub use crate::kv_email_template_repository::KvEmailTemplateRepository;
pub use crate::kv_nurture_sequence_repository::KvNurtureSequenceRepository;
pub use crate::kv_workflow_repository::KvWorkflowRepository;
pub use crate::paths::VfoPaths;
pub use crate::storage::{JsonFileStore, MemoryStore};
