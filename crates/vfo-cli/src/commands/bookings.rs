use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Subcommand;
use vfo_application::Workspace;
use vfo_core::booking::Booking;

use super::{print_json, read_input};

#[derive(Subcommand)]
pub enum BookingsAction {
    /// List every booking
    List,
    /// Show one booking
    Show { id: String },
    /// Add a booking at stage New
    Add {
        name: String,
        email: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        pkg: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        slot: Option<String>,
    },
    /// Append a note
    Note { id: String, text: String },
    /// Attach a document record
    Doc {
        id: String,
        title: String,
        #[arg(long = "type", default_value = "pdf")]
        doc_type: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Import leads from CSV (`-` reads stdin)
    ImportCsv { file: PathBuf },
}

pub fn run(ws: &Workspace, action: BookingsAction) -> Result<()> {
    match action {
        BookingsAction::List => {
            for b in ws.records.list()? {
                println!("{:<24} {:<12} {:<24} {}", b.id, b.stage, b.name, b.email);
            }
        }
        BookingsAction::Show { id } => print_json(&ws.records.require(&id)?)?,
        BookingsAction::Add {
            name,
            email,
            id,
            pkg,
            phone,
            slot,
        } => {
            if name.trim().is_empty() || email.trim().is_empty() {
                bail!("name and email are required");
            }
            let id = id.unwrap_or_else(|| format!("bk-{}", chrono::Utc::now().timestamp_millis()));
            let mut booking = Booking::new(id, name, email);
            booking.pkg = pkg.unwrap_or_default();
            booking.slot = slot.unwrap_or_default();
            booking.phone = phone;
            print_json(&ws.records.add(booking)?)?;
        }
        BookingsAction::Note { id, text } => print_json(&ws.records.append_note(&id, text)?)?,
        BookingsAction::Doc {
            id,
            title,
            doc_type,
            url,
        } => print_json(&ws.records.append_document(&id, title, doc_type, url)?)?,
        BookingsAction::ImportCsv { file } => {
            let imported = ws.records.import_csv(&read_input(&file)?)?;
            println!("Imported {} lead(s)", imported.len());
        }
    }
    Ok(())
}
