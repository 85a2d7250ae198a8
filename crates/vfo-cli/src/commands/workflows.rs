use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use vfo_application::Workspace;

use super::{print_json, read_input};

#[derive(Subcommand)]
pub enum WorkflowsAction {
    List,
    /// Import one workflow object or an array of them (`-` reads stdin)
    Import { file: PathBuf },
    Delete { workflow_key: String },
}

pub fn run(ws: &Workspace, action: WorkflowsAction) -> Result<()> {
    match action {
        WorkflowsAction::List => print_json(&ws.workflows.list()?)?,
        WorkflowsAction::Import { file } => {
            let imported = ws.workflows.import_json(&read_input(&file)?)?;
            println!("Imported {} workflow(s)", imported.len());
        }
        WorkflowsAction::Delete { workflow_key } => {
            ws.workflows.delete(&workflow_key)?;
            println!("Deleted workflow {}", workflow_key);
        }
    }
    Ok(())
}
