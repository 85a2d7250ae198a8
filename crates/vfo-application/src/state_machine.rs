//! Pipeline state machine.
//!
//! A transition validates stage membership against the booking's pipeline,
//! commits the new stage, runs stage-entry hooks and then fires every
//! matching stage-change rule in stored order. A `move_stage` action
//! re-enters the machine one level deeper, up to the configured chain depth.

use std::sync::Arc;

use serde::Serialize;
use vfo_core::automation::{AutomationEvent, TransitionContext};
use vfo_core::booking::{Booking, BookingPatch};
use vfo_core::error::{Result, VfoError};
use vfo_core::pipeline::{
    KanbanColumn, PipelineDefinition, candidate_type, kanban_columns, pipeline_status_label,
};

use crate::activity_log::ActivityLog;
use crate::automation_runner::{ActionOutcome, AutomationRunner};
use crate::client_records::ClientRecordStore;
use crate::lifecycle::LifecycleHooks;
use crate::rule_store::AutomationRuleStore;
use crate::workflows::WorkflowService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageChange {
    pub booking_id: String,
    pub from: String,
    pub to: String,
    /// 0 for the requested transition, 1+ for rule-driven moves.
    pub depth: usize,
}

/// Everything one `transition` call did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransitionReport {
    /// The booking as it stands after all chained moves.
    pub booking: Option<Booking>,
    pub changes: Vec<StageChange>,
    /// Ids of the rules that fired, in firing order (may repeat across
    /// chained moves).
    pub fired_rules: Vec<String>,
}

/// A booking annotated with its derived pipeline labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineEntry {
    pub id: String,
    pub name: String,
    pub pipeline: String,
    pub stage: String,
    pub progress_percent: u8,
    pub candidate_type: String,
    pub status_label: String,
}

pub struct PipelineStateMachine {
    records: Arc<ClientRecordStore>,
    rules: Arc<AutomationRuleStore>,
    runner: Arc<AutomationRunner>,
    lifecycle: Arc<LifecycleHooks>,
    workflows: Arc<WorkflowService>,
    activity: Arc<ActivityLog>,
    max_chain_depth: usize,
}

impl PipelineStateMachine {
    pub fn new(
        records: Arc<ClientRecordStore>,
        rules: Arc<AutomationRuleStore>,
        runner: Arc<AutomationRunner>,
        lifecycle: Arc<LifecycleHooks>,
        workflows: Arc<WorkflowService>,
        activity: Arc<ActivityLog>,
        max_chain_depth: usize,
    ) -> Self {
        Self {
            records,
            rules,
            runner,
            lifecycle,
            workflows,
            activity,
            max_chain_depth,
        }
    }

    /// Every pipeline a booking can be configured with.
    pub fn definitions(&self) -> Result<Vec<PipelineDefinition>> {
        self.workflows.definitions()
    }

    /// The definition for `key`, or a validation error when none exists.
    pub fn definition(&self, key: &str) -> Result<PipelineDefinition> {
        self.workflows
            .definition_for(key)?
            .ok_or_else(|| VfoError::validation(format!("Unknown pipeline '{}'", key)))
    }

    /// Moves a booking to `to_stage`. Any member stage may follow any other,
    /// including itself.
    pub fn transition(&self, booking_id: &str, to_stage: &str) -> Result<TransitionReport> {
        let mut report = TransitionReport::default();
        self.transition_at_depth(booking_id, to_stage, 0, &mut report)?;
        report.booking = self.records.find_by_id(booking_id)?;
        Ok(report)
    }

    fn transition_at_depth(
        &self,
        booking_id: &str,
        to_stage: &str,
        depth: usize,
        report: &mut TransitionReport,
    ) -> Result<()> {
        let booking = self.records.require(booking_id)?;
        let definition = self.definition(&booking.pipeline)?;
        if !definition.contains(to_stage) {
            return Err(VfoError::validation(format!(
                "Stage '{}' is not part of pipeline '{}' ({})",
                to_stage,
                definition.key,
                definition.stage_keys().join(", ")
            )));
        }

        let from_stage = booking.stage.clone();
        let updated = self
            .records
            .update(booking_id, BookingPatch::stage(to_stage))?
            .ok_or_else(|| VfoError::not_found("booking", booking_id))?;
        tracing::info!(
            "[Pipeline] {} moved {} -> {} (depth {})",
            booking_id,
            from_stage,
            to_stage,
            depth
        );
        report.changes.push(StageChange {
            booking_id: booking_id.to_string(),
            from: from_stage.clone(),
            to: to_stage.to_string(),
            depth,
        });

        self.lifecycle.on_stage_entered(&updated, to_stage)?;

        let ctx = TransitionContext::stage_change(booking_id, from_stage, to_stage, updated.pkg.clone());
        let matching = self.rules.matching(&AutomationEvent::StageChange, &ctx)?;

        let mut current = updated;
        for rule in matching {
            tracing::debug!("[Pipeline] Rule '{}' fired for {}", rule.id, booking_id);
            report.fired_rules.push(rule.id.clone());
            for action in &rule.actions {
                match self.runner.run(action, &current)? {
                    ActionOutcome::Done => {}
                    ActionOutcome::MoveStage(next) => {
                        self.chain_move(booking_id, &next, depth, report)?;
                        current = self.records.require(booking_id)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn chain_move(
        &self,
        booking_id: &str,
        next: &str,
        depth: usize,
        report: &mut TransitionReport,
    ) -> Result<()> {
        if depth >= self.max_chain_depth {
            tracing::warn!(
                "[Pipeline] Rule chain for {} stopped at depth {} (move to {} skipped)",
                booking_id,
                depth,
                next
            );
            self.activity.log(
                "rule_chain_aborted",
                Some(format!("{} -> {} at depth {}", booking_id, next, depth)),
            )?;
            return Ok(());
        }

        self.activity
            .log("auto_move_stage", Some(format!("{} -> {}", booking_id, next)))?;
        match self.transition_at_depth(booking_id, next, depth + 1, report) {
            Err(e) if e.is_validation() => {
                tracing::warn!("[Pipeline] Ignoring rule-driven move: {}", e);
                self.activity.log("auto_move_stage_rejected", Some(e.to_string()))?;
                Ok(())
            }
            other => other,
        }
    }

    /// Moves a booking onto another pipeline. Its stage is kept when it is a
    /// member of the new pipeline, else reset to the first stage. No rules
    /// fire.
    pub fn assign_pipeline(&self, booking_id: &str, pipeline_key: &str) -> Result<Booking> {
        let booking = self.records.require(booking_id)?;
        let definition = self.definition(pipeline_key)?;
        let stage = if definition.contains(&booking.stage) {
            booking.stage.clone()
        } else {
            definition
                .initial_stage()
                .ok_or_else(|| {
                    VfoError::validation(format!("Pipeline '{}' has no stages", pipeline_key))
                })?
                .to_string()
        };
        self.records
            .update(
                booking_id,
                BookingPatch {
                    pipeline: Some(definition.key.clone()),
                    stage: Some(stage),
                    ..BookingPatch::default()
                },
            )?
            .ok_or_else(|| VfoError::not_found("booking", booking_id))
    }

    /// Progress through the booking's own pipeline, 0 when unknown.
    pub fn progress_percent(&self, booking: &Booking) -> Result<u8> {
        Ok(self
            .workflows
            .definition_for(&booking.pipeline)?
            .map(|d| d.progress_percent(&booking.stage))
            .unwrap_or(0))
    }

    /// Every booking with its derived labels.
    pub fn pipeline_view(&self) -> Result<Vec<PipelineEntry>> {
        let definitions = self.definitions()?;
        Ok(self
            .records
            .list()?
            .into_iter()
            .map(|b| {
                let progress = definitions
                    .iter()
                    .find(|d| d.key == b.pipeline)
                    .map(|d| d.progress_percent(&b.stage))
                    .unwrap_or(0);
                PipelineEntry {
                    candidate_type: candidate_type(&b).to_string(),
                    status_label: pipeline_status_label(&b.stage).to_string(),
                    progress_percent: progress,
                    id: b.id,
                    name: b.name,
                    pipeline: b.pipeline,
                    stage: b.stage,
                }
            })
            .collect())
    }

    pub fn kanban(&self) -> Result<Vec<KanbanColumn>> {
        Ok(kanban_columns(&self.records.list()?))
    }
}
