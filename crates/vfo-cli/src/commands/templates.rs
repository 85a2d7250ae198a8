use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use vfo_application::Workspace;
use vfo_core::template::EmailTemplate;

use super::{print_json, read_input};

#[derive(Subcommand)]
pub enum TemplatesAction {
    List,
    /// Create or update a template from a raw html fragment
    Save {
        name: String,
        subject: String,
        /// File holding the html fragment (`-` reads stdin)
        content: PathBuf,
        /// Keep an existing id; omitted ids are derived from the name
        #[arg(long)]
        id: Option<String>,
    },
    Delete { id: String },
    /// Render a template against a booking without sending it
    Preview { id: String, booking_id: String },
}

pub fn run(ws: &Workspace, action: TemplatesAction) -> Result<()> {
    match action {
        TemplatesAction::List => {
            for t in ws.templates.list()? {
                println!("{:<32} {:<28} {}", t.id, t.name, t.subject);
            }
        }
        TemplatesAction::Save {
            name,
            subject,
            content,
            id,
        } => {
            let mut template = EmailTemplate::new(name, subject, read_input(&content)?);
            if let Some(id) = id {
                template = template.with_id(id);
            }
            print_json(&ws.templates.upsert(template)?)?;
        }
        TemplatesAction::Delete { id } => {
            ws.templates.delete(&id)?;
            println!("Deleted template {}", id);
        }
        TemplatesAction::Preview { id, booking_id } => {
            let booking = ws.records.require(&booking_id)?;
            let rendered = ws
                .templates
                .render(&id, &booking.merge_vars())?
                .with_context(|| format!("Template '{}' not found", id))?;
            print_json(&rendered)?;
        }
    }
    Ok(())
}
