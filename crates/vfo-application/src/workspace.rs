//! Service container.
//!
//! A `Workspace` owns one store and every service built on it. Callers get
//! services from here instead of reaching for storage themselves, and decide
//! when seeding happens by calling [`Workspace::init`].

use std::sync::Arc;

use vfo_core::config::AppConfig;
use vfo_core::error::Result;
use vfo_core::store::KeyValueStore;
use vfo_infrastructure::{
    ConfigService, JsonFileStore, KvAutomationRuleRepository, KvBookingRepository,
    KvEmailTemplateRepository, KvNurtureSequenceRepository, KvWorkflowRepository,
};

use crate::activity_log::ActivityLog;
use crate::automation_runner::AutomationRunner;
use crate::bootstrap::{SeedReport, Seeder};
use crate::client_records::ClientRecordStore;
use crate::lifecycle::LifecycleHooks;
use crate::nurture_engine::NurtureSequenceEngine;
use crate::rule_store::AutomationRuleStore;
use crate::site_settings::{CatalogService, SiteConfigService};
use crate::state_machine::PipelineStateMachine;
use crate::template_catalog::EmailTemplateCatalog;
use crate::workflows::WorkflowService;

pub struct Workspace {
    config: AppConfig,
    store: Arc<dyn KeyValueStore>,
    pub records: Arc<ClientRecordStore>,
    pub templates: Arc<EmailTemplateCatalog>,
    pub rules: Arc<AutomationRuleStore>,
    pub sequences: Arc<NurtureSequenceEngine>,
    pub workflows: Arc<WorkflowService>,
    pub pipeline: Arc<PipelineStateMachine>,
    pub runner: Arc<AutomationRunner>,
    pub lifecycle: Arc<LifecycleHooks>,
    pub activity: Arc<ActivityLog>,
    pub site: Arc<SiteConfigService>,
    pub catalog: Arc<CatalogService>,
}

impl Workspace {
    /// Wires every service over `store`. Nothing is read or written yet.
    pub fn new(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let activity = Arc::new(ActivityLog::new(store.clone()));
        let site = Arc::new(SiteConfigService::new(store.clone()));
        let catalog = Arc::new(CatalogService::new(store.clone()));
        let lifecycle = Arc::new(LifecycleHooks::new(store.clone(), activity.clone()));
        let workflows = Arc::new(WorkflowService::new(Arc::new(KvWorkflowRepository::new(
            store.clone(),
        ))));
        let records = Arc::new(ClientRecordStore::new(
            Arc::new(KvBookingRepository::new(store.clone())),
            workflows.clone(),
        ));
        let templates = Arc::new(EmailTemplateCatalog::new(
            Arc::new(KvEmailTemplateRepository::new(store.clone())),
            site.clone(),
        ));
        let rules = Arc::new(AutomationRuleStore::new(Arc::new(
            KvAutomationRuleRepository::new(store.clone()),
        )));
        let runner = Arc::new(AutomationRunner::new(
            templates.clone(),
            activity.clone(),
            lifecycle.clone(),
            site.clone(),
        ));
        let sequences = Arc::new(NurtureSequenceEngine::new(
            Arc::new(KvNurtureSequenceRepository::new(store.clone())),
            records.clone(),
            runner.clone(),
            activity.clone(),
        ));
        let pipeline = Arc::new(PipelineStateMachine::new(
            records.clone(),
            rules.clone(),
            runner.clone(),
            lifecycle.clone(),
            workflows.clone(),
            activity.clone(),
            config.max_rule_chain_depth,
        ));

        Self {
            config,
            store,
            records,
            templates,
            rules,
            sequences,
            workflows,
            pipeline,
            runner,
            lifecycle,
            activity,
            site,
            catalog,
        }
    }

    /// Opens the JSON store named by the config file.
    pub fn open(config_service: &ConfigService) -> Result<Self> {
        let config = config_service.get_config()?;
        let path = config_service.store_file()?;
        tracing::debug!("[Store] Opening {}", path.display());
        let store: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::new(path, config.namespace.clone()));
        Ok(Self::new(config, store))
    }

    /// Seeds default content when the config asks for it. Returns `None`
    /// when seeding is disabled.
    pub fn init(&self) -> Result<Option<SeedReport>> {
        if !self.config.seed_on_init {
            tracing::debug!("[Bootstrap] Seeding disabled by config");
            return Ok(None);
        }
        self.seed().map(Some)
    }

    /// Seeds unconditionally. Safe to repeat.
    pub fn seed(&self) -> Result<SeedReport> {
        Seeder {
            records: &self.records,
            templates: &self.templates,
            sequences: &self.sequences,
            rules: &self.rules,
            site: &self.site,
            catalog: &self.catalog,
        }
        .run()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }
}
