use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use vfo_application::Workspace;
use vfo_core::nurture::{NurtureSequence, StepPatch, StepType};

use super::print_json;

#[derive(Subcommand)]
pub enum SequencesAction {
    List,
    /// Append an email step
    AddStep { seq_id: String },
    /// Change fields of a step
    UpdateStep {
        seq_id: String,
        step_id: String,
        #[arg(long = "type")]
        step_type: Option<StepType>,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        sms: Option<String>,
        #[arg(long)]
        offset_hours: Option<i64>,
    },
    RemoveStep { seq_id: String, step_id: String },
    /// Copy a step in place, right after the original
    DuplicateStep { seq_id: String, step_id: String },
    /// Enable or disable a whole sequence
    Toggle { seq_id: String },
    ToggleStep { seq_id: String, step_id: String },
    /// Point a step at a template
    Link {
        seq_id: String,
        step_id: String,
        template_id: String,
    },
    /// When each enabled step would run
    Plan {
        seq_id: String,
        /// RFC 3339 start time (defaults to now)
        #[arg(long)]
        anchor: Option<String>,
    },
    /// Run one step for one booking
    Dispatch {
        seq_id: String,
        step_id: String,
        booking_id: String,
    },
}

fn show(sequence: Option<NurtureSequence>, seq_id: &str) -> Result<()> {
    let sequence = sequence.with_context(|| format!("Sequence '{}' not found", seq_id))?;
    print_json(&sequence)
}

pub fn run(ws: &Workspace, action: SequencesAction) -> Result<()> {
    let engine = &ws.sequences;
    match action {
        SequencesAction::List => print_json(&engine.list()?)?,
        SequencesAction::AddStep { seq_id } => {
            let step_id = engine
                .add_step(&seq_id)?
                .with_context(|| format!("Sequence '{}' not found", seq_id))?;
            println!("{}", step_id);
        }
        SequencesAction::UpdateStep {
            seq_id,
            step_id,
            step_type,
            label,
            sms,
            offset_hours,
        } => {
            let patch = StepPatch {
                step_type,
                label,
                sms_content: sms,
                offset_hours,
                ..StepPatch::default()
            };
            show(engine.update_step(&seq_id, &step_id, patch)?, &seq_id)?;
        }
        SequencesAction::RemoveStep { seq_id, step_id } => {
            show(engine.remove_step(&seq_id, &step_id)?, &seq_id)?
        }
        SequencesAction::DuplicateStep { seq_id, step_id } => {
            match engine.duplicate_step(&seq_id, &step_id)? {
                Some(copy) => println!("{}", copy),
                None => println!("Nothing to duplicate"),
            }
        }
        SequencesAction::Toggle { seq_id } => show(engine.toggle_sequence(&seq_id)?, &seq_id)?,
        SequencesAction::ToggleStep { seq_id, step_id } => {
            show(engine.toggle_step(&seq_id, &step_id)?, &seq_id)?
        }
        SequencesAction::Link {
            seq_id,
            step_id,
            template_id,
        } => show(engine.link_template(&seq_id, &step_id, &template_id)?, &seq_id)?,
        SequencesAction::Plan { seq_id, anchor } => {
            let anchor = match anchor {
                Some(raw) => DateTime::parse_from_rfc3339(&raw)
                    .with_context(|| format!("Invalid anchor time '{}'", raw))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            print_json(&engine.plan(&seq_id, anchor)?)?;
        }
        SequencesAction::Dispatch {
            seq_id,
            step_id,
            booking_id,
        } => print_json(&engine.dispatch_step(&seq_id, &step_id, &booking_id)?)?,
    }
    Ok(())
}
