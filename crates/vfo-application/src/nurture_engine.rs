//! Nurture sequence engine.
//!
//! Sequences are configuration: an ordered, revisable recipe of steps.
//! Nothing here runs on a timer. `plan` computes when enabled steps would be
//! due and `dispatch_step` performs one mocked send on demand.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vfo_core::error::Result;
use vfo_core::nurture::{
    NurtureSequence, NurtureSequenceRepository, PlannedStep, StepPatch, StepType,
};
use vfo_core::template::resolve;

use crate::activity_log::ActivityLog;
use crate::automation_runner::AutomationRunner;
use crate::client_records::ClientRecordStore;

/// Result of dispatching one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// An email was rendered into the outbox.
    Sent { template_id: String },
    /// A non-email step was recorded in the automation log.
    Logged { event: String },
    /// The step is inert (disabled, unlinked or missing).
    Skipped { reason: String },
}

impl DispatchOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}

pub struct NurtureSequenceEngine {
    repository: Arc<dyn NurtureSequenceRepository>,
    records: Arc<ClientRecordStore>,
    runner: Arc<AutomationRunner>,
    activity: Arc<ActivityLog>,
}

impl NurtureSequenceEngine {
    pub fn new(
        repository: Arc<dyn NurtureSequenceRepository>,
        records: Arc<ClientRecordStore>,
        runner: Arc<AutomationRunner>,
        activity: Arc<ActivityLog>,
    ) -> Self {
        Self {
            repository,
            records,
            runner,
            activity,
        }
    }

    // ------------------------------------------------------------------
    // Sequence level
    // ------------------------------------------------------------------

    pub fn list(&self) -> Result<Vec<NurtureSequence>> {
        self.repository.list()
    }

    pub fn get(&self, id: &str) -> Result<Option<NurtureSequence>> {
        self.repository.find_by_id(id)
    }

    pub fn upsert(&self, sequence: NurtureSequence) -> Result<NurtureSequence> {
        tracing::info!("[Nurture] Saving sequence '{}' ({})", sequence.name, sequence.id);
        self.repository.upsert(sequence.clone())?;
        Ok(sequence)
    }

    pub fn insert_if_absent(&self, sequence: NurtureSequence) -> Result<bool> {
        self.repository.insert_if_absent(sequence)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.repository.delete(id)
    }

    pub fn toggle_sequence(&self, id: &str) -> Result<Option<NurtureSequence>> {
        self.repository.modify(id, &mut |s| {
            s.toggle();
        })
    }

    // ------------------------------------------------------------------
    // Step mutators. A missing sequence yields `None`; a missing step
    // leaves the sequence unchanged.
    // ------------------------------------------------------------------

    /// Appends an `email` step. Returns its id.
    pub fn add_step(&self, seq_id: &str) -> Result<Option<String>> {
        let mut new_id = None;
        self.repository.modify(seq_id, &mut |s| {
            new_id = Some(s.add_step());
        })?;
        Ok(new_id)
    }

    pub fn update_step(
        &self,
        seq_id: &str,
        step_id: &str,
        patch: StepPatch,
    ) -> Result<Option<NurtureSequence>> {
        let mut patch = Some(patch);
        self.repository.modify(seq_id, &mut |s| {
            if let Some(patch) = patch.take() {
                s.update_step(step_id, patch);
            }
        })
    }

    pub fn remove_step(&self, seq_id: &str, step_id: &str) -> Result<Option<NurtureSequence>> {
        self.repository.modify(seq_id, &mut |s| {
            s.remove_step(step_id);
        })
    }

    /// Clones a step right after itself. Returns the copy's id.
    pub fn duplicate_step(&self, seq_id: &str, step_id: &str) -> Result<Option<String>> {
        let mut new_id = None;
        self.repository.modify(seq_id, &mut |s| {
            new_id = s.duplicate_step(step_id);
        })?;
        Ok(new_id)
    }

    pub fn toggle_step(&self, seq_id: &str, step_id: &str) -> Result<Option<NurtureSequence>> {
        self.repository.modify(seq_id, &mut |s| {
            s.toggle_step(step_id);
        })
    }

    /// Points a step at a template. The step type is not checked and the
    /// template need not exist yet.
    pub fn link_template(
        &self,
        seq_id: &str,
        step_id: &str,
        template_id: &str,
    ) -> Result<Option<NurtureSequence>> {
        self.repository.modify(seq_id, &mut |s| {
            s.link_template(step_id, template_id);
        })
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Enabled steps in order with due times relative to `anchor`.
    pub fn plan(&self, seq_id: &str, anchor: DateTime<Utc>) -> Result<Vec<PlannedStep>> {
        Ok(self
            .get(seq_id)?
            .map(|s| s.plan(anchor))
            .unwrap_or_default())
    }

    /// Performs one step for one booking.
    ///
    /// The booking must exist. Everything else that is missing or disabled
    /// makes the step inert rather than failing.
    pub fn dispatch_step(
        &self,
        seq_id: &str,
        step_id: &str,
        booking_id: &str,
    ) -> Result<DispatchOutcome> {
        let booking = self.records.require(booking_id)?;

        let Some(sequence) = self.get(seq_id)? else {
            return Ok(DispatchOutcome::skipped(format!("sequence '{}' not found", seq_id)));
        };
        if !sequence.enabled {
            return Ok(DispatchOutcome::skipped("sequence disabled"));
        }
        let Some(step) = sequence.get_step(step_id) else {
            return Ok(DispatchOutcome::skipped(format!("step '{}' not found", step_id)));
        };
        if !step.enabled {
            return Ok(DispatchOutcome::skipped("step disabled"));
        }

        match step.step_type {
            StepType::Email => {
                let Some(template_id) = step.template_id.as_deref() else {
                    return Ok(DispatchOutcome::skipped("no template linked"));
                };
                if self.runner.send_template(template_id, &booking)? {
                    Ok(DispatchOutcome::Sent {
                        template_id: template_id.to_string(),
                    })
                } else {
                    Ok(DispatchOutcome::skipped(format!(
                        "template '{}' not found",
                        template_id
                    )))
                }
            }
            StepType::Sms => {
                let Some(content) = step.sms_content.as_deref() else {
                    return Ok(DispatchOutcome::skipped("no sms content"));
                };
                if step.sms_over_soft_limit() {
                    tracing::debug!("[Nurture] SMS for step {} exceeds 160 characters", step.id);
                }
                let body = resolve(content, &booking.merge_vars());
                let to = booking.phone.clone().unwrap_or_default();
                self.activity
                    .log("sms_sent", Some(format!("{} ({}): {}", booking.id, to, body)))?;
                Ok(DispatchOutcome::Logged {
                    event: "sms_sent".to_string(),
                })
            }
            other => {
                let event = other.to_string();
                self.activity
                    .log(&event, Some(format!("{} for {}", step.label, booking.id)))?;
                Ok(DispatchOutcome::Logged { event })
            }
        }
    }
}
