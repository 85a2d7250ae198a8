use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use vfo_application::Workspace;
use vfo_core::records::{DocVersionStatus, FundingStatus};

use super::{print_json, read_input};

/// Post-signing work for one client: document versions, funding and reviews.
#[derive(Subcommand)]
pub enum VaultAction {
    /// Document versions of a booking
    Versions { booking_id: String },
    /// Add a Draft document version (`-` reads stdin)
    AddVersion {
        booking_id: String,
        name: String,
        content: Option<PathBuf>,
    },
    /// Draft, Redlined or Approved
    VersionStatus {
        version_id: String,
        status: DocVersionStatus,
    },
    /// Funding checklist of a booking
    Funding { booking_id: String },
    /// Pending, Submitted or Verified
    FundingStatus {
        item_id: String,
        status: FundingStatus,
        #[arg(long)]
        proof: Option<String>,
    },
    /// Maintenance enrollments and annual reviews
    Reviews,
    /// Book an open review 30 days out
    ScheduleReview { review_id: String },
    CompleteReview { review_id: String },
}

pub fn run(ws: &Workspace, action: VaultAction) -> Result<()> {
    let lifecycle = &ws.lifecycle;
    match action {
        VaultAction::Versions { booking_id } => {
            ws.records.require(&booking_id)?;
            print_json(&lifecycle.doc_versions(&booking_id))?;
        }
        VaultAction::AddVersion {
            booking_id,
            name,
            content,
        } => {
            let booking = ws.records.require(&booking_id)?;
            let content = match content {
                Some(path) => read_input(&path)?,
                None => String::new(),
            };
            print_json(&lifecycle.add_doc_version(&booking, name, content)?)?;
        }
        VaultAction::VersionStatus { version_id, status } => {
            print_json(&lifecycle.set_doc_version_status(&version_id, status)?)?;
        }
        VaultAction::Funding { booking_id } => {
            ws.records.require(&booking_id)?;
            print_json(&lifecycle.funding_items(&booking_id))?;
        }
        VaultAction::FundingStatus {
            item_id,
            status,
            proof,
        } => {
            print_json(&lifecycle.set_funding_status(&item_id, status, proof)?)?;
        }
        VaultAction::Reviews => {
            print_json(&serde_json::json!({
                "maintenance": lifecycle.maintenance(),
                "annualReviews": lifecycle.annual_reviews(),
            }))?;
        }
        VaultAction::ScheduleReview { review_id } => {
            print_json(&lifecycle.schedule_annual_review(&review_id)?)?;
        }
        VaultAction::CompleteReview { review_id } => {
            print_json(&lifecycle.complete_annual_review(&review_id)?)?;
        }
    }
    Ok(())
}
