//! Stage-entry side effects and the post-signing work they start: funding
//! checklist, maintenance enrollment, annual reviews, the drafting queue and
//! document versions.
//!
//! Keys: `funding_items`, `maintenance`, `annual_reviews`, `drafting_queue`,
//! `doc_versions`

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use vfo_core::booking::Booking;
use vfo_core::error::{Result, VfoError};
use vfo_core::records::{
    AnnualReview, DocVersionStatus, DocumentVersion, DraftStatus, DraftTask, FundingItem,
    FundingStatus, MaintenanceEnrollment, ReviewStage,
};
use vfo_core::store::{KeyValueStore, KeyValueStoreExt, keys};

use crate::activity_log::ActivityLog;

/// Days between scheduling an annual review and its meeting.
pub const REVIEW_LEAD_DAYS: i64 = 30;

/// The four-task drafting pack: label and days from now.
pub const DRAFTING_PACK: [(&str, i64); 4] = [
    ("Assemble facts", 1),
    ("Generate core docs", 3),
    ("Attach add-ons", 4),
    ("QA review", 5),
];

pub struct LifecycleHooks {
    store: Arc<dyn KeyValueStore>,
    activity: Arc<ActivityLog>,
}

impl LifecycleHooks {
    pub fn new(store: Arc<dyn KeyValueStore>, activity: Arc<ActivityLog>) -> Self {
        Self { store, activity }
    }

    /// Runs the hooks for a booking that has just entered `stage`.
    pub fn on_stage_entered(&self, booking: &Booking, stage: &str) -> Result<()> {
        match stage {
            "Signed" => {
                self.seed_funding_items_if_missing(&booking.id)?;
            }
            "Completed" => {
                let enrolled = self.enroll_maintenance(&booking.id)?;
                self.create_annual_review_for(&booking.id)?;
                if enrolled {
                    self.activity
                        .log("maintenance_enrolled", Some(booking.id.clone()))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Funding checklist
    // ------------------------------------------------------------------

    pub fn funding_items(&self, booking_id: &str) -> Vec<FundingItem> {
        self.store
            .get_or_default::<Vec<FundingItem>>(keys::FUNDING_ITEMS)
            .into_iter()
            .filter(|i| i.booking_id == booking_id)
            .collect()
    }

    /// Adds the default checklist unless the booking already has items.
    pub fn seed_funding_items_if_missing(&self, booking_id: &str) -> Result<bool> {
        self.store
            .update(keys::FUNDING_ITEMS, |all: &mut Vec<FundingItem>| {
                if all.iter().any(|i| i.booking_id == booking_id) {
                    return false;
                }
                all.extend(FundingItem::default_checklist(booking_id));
                true
            })
    }

    /// Sets an item's status, recording `proof` when given.
    pub fn set_funding_status(
        &self,
        item_id: &str,
        status: FundingStatus,
        proof: Option<String>,
    ) -> Result<FundingItem> {
        let updated = self
            .store
            .update(keys::FUNDING_ITEMS, |all: &mut Vec<FundingItem>| {
                all.iter_mut().find(|i| i.id == item_id).map(|item| {
                    item.status = status;
                    if proof.is_some() {
                        item.proof = proof;
                    }
                    item.clone()
                })
            })?
            .ok_or_else(|| VfoError::not_found("funding item", item_id))?;
        tracing::info!("[Lifecycle] Funding item {} is now {}", item_id, status);
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Maintenance and annual reviews
    // ------------------------------------------------------------------

    pub fn maintenance(&self) -> Vec<MaintenanceEnrollment> {
        self.store.get_or_default(keys::MAINTENANCE)
    }

    /// Enrolls once per booking. Returns whether a new enrollment was made.
    pub fn enroll_maintenance(&self, booking_id: &str) -> Result<bool> {
        self.store
            .update(keys::MAINTENANCE, |all: &mut Vec<MaintenanceEnrollment>| {
                if all.iter().any(|m| m.booking_id == booking_id) {
                    return false;
                }
                all.push(MaintenanceEnrollment {
                    booking_id: booking_id.to_string(),
                    enrolled_at: Utc::now().to_rfc3339(),
                });
                true
            })
    }

    pub fn annual_reviews(&self) -> Vec<AnnualReview> {
        self.store.get_or_default(keys::ANNUAL_REVIEWS)
    }

    /// Opens a review unless the booking already has one that is not
    /// completed.
    pub fn create_annual_review_for(&self, booking_id: &str) -> Result<bool> {
        self.store
            .update(keys::ANNUAL_REVIEWS, |all: &mut Vec<AnnualReview>| {
                if all.iter().any(|r| r.booking_id == booking_id && r.is_open()) {
                    return false;
                }
                all.push(AnnualReview {
                    id: format!("ar-{}", uuid::Uuid::new_v4().simple()),
                    booking_id: booking_id.to_string(),
                    stage: ReviewStage::Open,
                    next_at: None,
                });
                true
            })
    }

    /// Books the review `REVIEW_LEAD_DAYS` from now.
    pub fn schedule_annual_review(&self, review_id: &str) -> Result<AnnualReview> {
        let next_at = (Utc::now() + TimeDelta::days(REVIEW_LEAD_DAYS)).to_rfc3339();
        self.move_review(review_id, ReviewStage::Scheduled, Some(next_at))
    }

    pub fn complete_annual_review(&self, review_id: &str) -> Result<AnnualReview> {
        self.move_review(review_id, ReviewStage::Completed, None)
    }

    /// Completed reviews are final; a new one is opened on the next
    /// `Completed` stage entry.
    fn move_review(
        &self,
        review_id: &str,
        stage: ReviewStage,
        next_at: Option<String>,
    ) -> Result<AnnualReview> {
        let moved = self
            .store
            .update(keys::ANNUAL_REVIEWS, |all: &mut Vec<AnnualReview>| {
                let review = all.iter_mut().find(|r| r.id == review_id)?;
                if !review.is_open() {
                    return Some(Err(VfoError::validation(format!(
                        "Annual review '{}' is already completed",
                        review_id
                    ))));
                }
                review.stage = stage;
                if next_at.is_some() {
                    review.next_at = next_at;
                }
                Some(Ok(review.clone()))
            })?
            .ok_or_else(|| VfoError::not_found("annual review", review_id))??;
        tracing::info!("[Lifecycle] Annual review {} is now {}", review_id, stage);
        Ok(moved)
    }

    // ------------------------------------------------------------------
    // Drafting queue
    // ------------------------------------------------------------------

    pub fn drafting_queue(&self) -> Vec<DraftTask> {
        self.store.get_or_default(keys::DRAFTING_QUEUE)
    }

    /// Appends one task due `delay_days` from now. A delay outside the
    /// representable date range leaves the task without a due date.
    pub fn schedule_task(&self, booking_id: &str, label: &str, delay_days: i64) -> Result<DraftTask> {
        let due = TimeDelta::try_days(delay_days).and_then(|d| Utc::now().checked_add_signed(d));
        if due.is_none() {
            tracing::warn!(
                "[Drafting] Delay of {} day(s) for '{}' is out of range, task left undated",
                delay_days,
                label
            );
        }
        let task = DraftTask {
            id: format!("dt-{}-{}", booking_id, uuid::Uuid::new_v4().simple()),
            booking_id: booking_id.to_string(),
            label: label.to_string(),
            status: DraftStatus::Queued,
            due: due.map(|d| d.to_rfc3339()),
        };
        let stored = task.clone();
        self.store
            .update(keys::DRAFTING_QUEUE, |all: &mut Vec<DraftTask>| all.push(stored))?;
        Ok(task)
    }

    pub fn set_draft_status(&self, task_id: &str, status: DraftStatus) -> Result<DraftTask> {
        let updated = self
            .store
            .update(keys::DRAFTING_QUEUE, |all: &mut Vec<DraftTask>| {
                all.iter_mut().find(|t| t.id == task_id).map(|task| {
                    task.status = status;
                    task.clone()
                })
            })?
            .ok_or_else(|| VfoError::not_found("drafting task", task_id))?;
        tracing::info!("[Drafting] Task {} is now {}", task_id, status);
        Ok(updated)
    }

    /// Creates the drafting pack for every `Signed` booking that has no
    /// tasks yet. Returns the number of tasks added.
    pub fn spawn_drafting_tasks_for_signed(&self, bookings: &[Booking]) -> Result<usize> {
        let now = Utc::now();
        let added = self
            .store
            .update(keys::DRAFTING_QUEUE, |all: &mut Vec<DraftTask>| {
                let mut added = 0;
                for b in bookings.iter().filter(|b| b.stage == "Signed") {
                    if all.iter().any(|t| t.booking_id == b.id) {
                        continue;
                    }
                    for (idx, (label, days)) in DRAFTING_PACK.iter().enumerate() {
                        all.push(DraftTask {
                            id: format!("dt-{}-{}", b.id, idx),
                            booking_id: b.id.clone(),
                            label: label.to_string(),
                            status: DraftStatus::Queued,
                            due: Some((now + TimeDelta::days(*days)).to_rfc3339()),
                        });
                        added += 1;
                    }
                }
                added
            })?;
        tracing::info!("[Drafting] Spawned {} drafting task(s)", added);
        Ok(added)
    }

    // ------------------------------------------------------------------
    // Document versions
    // ------------------------------------------------------------------

    pub fn doc_versions(&self, booking_id: &str) -> Vec<DocumentVersion> {
        self.store
            .get_or_default::<Vec<DocumentVersion>>(keys::DOC_VERSIONS)
            .into_iter()
            .filter(|v| v.booking_id == booking_id)
            .collect()
    }

    /// Appends a new `Draft` version for an existing booking.
    pub fn add_doc_version(
        &self,
        booking: &Booking,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<DocumentVersion> {
        let version = DocumentVersion {
            id: format!("dv-{}", uuid::Uuid::new_v4().simple()),
            booking_id: booking.id.clone(),
            name: name.into(),
            content: content.into(),
            status: DocVersionStatus::Draft,
            created_at: Utc::now().to_rfc3339(),
        };
        let stored = version.clone();
        self.store
            .update(keys::DOC_VERSIONS, |all: &mut Vec<DocumentVersion>| all.push(stored))?;
        tracing::info!("[Lifecycle] Added document version {} for {}", version.id, booking.id);
        Ok(version)
    }

    /// Moves a version through Draft, Redlined and Approved. An approved
    /// version cannot go back.
    pub fn set_doc_version_status(
        &self,
        version_id: &str,
        status: DocVersionStatus,
    ) -> Result<DocumentVersion> {
        self.store
            .update(keys::DOC_VERSIONS, |all: &mut Vec<DocumentVersion>| {
                let version = all.iter_mut().find(|v| v.id == version_id)?;
                if !version.can_move_to(status) {
                    return Some(Err(VfoError::validation(format!(
                        "Document version '{}' is approved and cannot become {}",
                        version_id, status
                    ))));
                }
                version.status = status;
                Some(Ok(version.clone()))
            })?
            .ok_or_else(|| VfoError::not_found("document version", version_id))?
    }
}
