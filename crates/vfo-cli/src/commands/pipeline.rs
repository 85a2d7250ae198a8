use anyhow::Result;
use clap::Subcommand;
use vfo_application::Workspace;

use super::print_json;

#[derive(Subcommand)]
pub enum PipelineAction {
    /// Bookings with progress and status labels
    View,
    /// Kanban overview columns
    Kanban,
    /// Built-in and imported pipeline definitions
    Definitions,
    /// Put a booking on another pipeline
    Assign { booking_id: String, pipeline: String },
}

pub fn run(ws: &Workspace, action: PipelineAction) -> Result<()> {
    match action {
        PipelineAction::View => {
            for e in ws.pipeline.pipeline_view()? {
                println!(
                    "{:<24} {:<20} {:<12} {:>3}%  {:<16} {}",
                    e.id, e.name, e.stage, e.progress_percent, e.candidate_type, e.status_label
                );
            }
        }
        PipelineAction::Kanban => {
            for column in ws.pipeline.kanban()? {
                println!("{} ({})", column.label, column.count());
                for id in &column.booking_ids {
                    println!("  - {}", id);
                }
            }
        }
        PipelineAction::Definitions => print_json(&ws.pipeline.definitions()?)?,
        PipelineAction::Assign {
            booking_id,
            pipeline,
        } => print_json(&ws.pipeline.assign_pipeline(&booking_id, &pipeline)?)?,
    }
    Ok(())
}
