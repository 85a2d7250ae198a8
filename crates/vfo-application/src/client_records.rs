//! Client record (booking) service.

use std::sync::Arc;

use vfo_core::booking::{Booking, BookingDocument, BookingPatch, BookingRepository};
use vfo_core::error::{Result, VfoError};

use crate::csv_import::parse_leads;
use crate::workflows::WorkflowService;

/// The only writer of booking records.
///
/// All writes are merge-by-id patches; list fields are extended by reading
/// the current record first so unrelated entries are never dropped.
pub struct ClientRecordStore {
    repository: Arc<dyn BookingRepository>,
    workflows: Arc<WorkflowService>,
}

impl ClientRecordStore {
    pub fn new(repository: Arc<dyn BookingRepository>, workflows: Arc<WorkflowService>) -> Self {
        Self {
            repository,
            workflows,
        }
    }

    pub fn list(&self) -> Result<Vec<Booking>> {
        self.repository.list()
    }

    /// Adds a new booking. The id must be unused and the stage must belong
    /// to the booking's pipeline.
    pub fn add(&self, booking: Booking) -> Result<Booking> {
        self.check_stage(&booking)?;
        tracing::info!("[Records] Adding booking {} ({})", booking.id, booking.name);
        self.repository.add(booking.clone())?;
        Ok(booking)
    }

    fn check_stage(&self, booking: &Booking) -> Result<()> {
        let definition = self
            .workflows
            .definition_for(&booking.pipeline)?
            .ok_or_else(|| VfoError::validation(format!("Unknown pipeline '{}'", booking.pipeline)))?;
        if definition.contains(&booking.stage) {
            Ok(())
        } else {
            Err(VfoError::validation(format!(
                "Stage '{}' is not part of pipeline '{}'",
                booking.stage, definition.key
            )))
        }
    }

    /// Shallow merge of `patch` into the booking. `Ok(None)` when missing.
    pub fn update(&self, id: &str, patch: BookingPatch) -> Result<Option<Booking>> {
        self.repository.update(id, patch)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        self.repository.find_by_id(id)
    }

    /// Like [`Self::find_by_id`] but a missing booking is an error.
    pub fn require(&self, id: &str) -> Result<Booking> {
        self.find_by_id(id)?
            .ok_or_else(|| VfoError::not_found("booking", id))
    }

    pub fn append_note(&self, id: &str, note: impl Into<String>) -> Result<Booking> {
        let mut notes = self.require(id)?.notes;
        notes.push(note.into());
        self.patch_existing(
            id,
            BookingPatch {
                notes: Some(notes),
                ..BookingPatch::default()
            },
        )
    }

    /// Appends a document; existing documents keep their order.
    pub fn append_document(
        &self,
        id: &str,
        title: impl Into<String>,
        doc_type: impl Into<String>,
        url: Option<String>,
    ) -> Result<Booking> {
        let mut docs = self.require(id)?.docs;
        docs.push(BookingDocument {
            id: format!("doc-{}", uuid::Uuid::new_v4().simple()),
            title: title.into(),
            doc_type: doc_type.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            url,
        });
        self.patch_existing(
            id,
            BookingPatch {
                docs: Some(docs),
                ..BookingPatch::default()
            },
        )
    }

    /// Parses CSV leads and appends them in file order. Returns the added
    /// bookings.
    pub fn import_csv(&self, text: &str) -> Result<Vec<Booking>> {
        let leads = parse_leads(text);
        for lead in &leads {
            self.add(lead.clone())?;
        }
        tracing::info!("[Records] Imported {} lead(s) from CSV", leads.len());
        Ok(leads)
    }

    fn patch_existing(&self, id: &str, patch: BookingPatch) -> Result<Booking> {
        self.update(id, patch)?
            .ok_or_else(|| VfoError::not_found("booking", id))
    }
}
