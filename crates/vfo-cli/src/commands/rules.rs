use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use vfo_application::Workspace;
use vfo_core::automation::AutomationRule;

use super::{print_json, read_input};

#[derive(Subcommand)]
pub enum RulesAction {
    List,
    /// Create or update a rule from its JSON form (`-` reads stdin)
    Save { file: PathBuf },
    Delete { id: String },
}

pub fn run(ws: &Workspace, action: RulesAction) -> Result<()> {
    match action {
        RulesAction::List => print_json(&ws.rules.list()?)?,
        RulesAction::Save { file } => {
            let rule: AutomationRule = serde_json::from_str(&read_input(&file)?)
                .context("Rule JSON does not match the rule shape")?;
            print_json(&ws.rules.upsert(rule)?)?;
        }
        RulesAction::Delete { id } => {
            ws.rules.delete(&id)?;
            println!("Deleted rule {}", id);
        }
    }
    Ok(())
}
