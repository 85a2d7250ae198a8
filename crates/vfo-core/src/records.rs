//! Side-effect records produced by automations and lifecycle hooks.
//!
//! All of these are append-mostly lists, each stored under its own key.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A mocked email "send": the resolved subject and html, never delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxEmail {
    pub id: String,
    pub booking_id: String,
    pub template_id: String,
    pub subject: String,
    pub html: String,
    pub created_at: String,
}

/// One line of the persisted automation audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationLogEntry {
    pub id: String,
    pub time: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AutomationLogEntry {
    pub fn new(event: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            id: format!("al-{}", uuid::Uuid::new_v4().simple()),
            time: chrono::Utc::now().to_rfc3339(),
            event: event.into(),
            detail,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum DraftStatus {
    #[default]
    Queued,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    Done,
}

/// A document-drafting task in the drafting queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftTask {
    pub id: String,
    pub booking_id: String,
    pub label: String,
    #[serde(default)]
    pub status: DraftStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum FundingStatus {
    #[default]
    Pending,
    Submitted,
    Verified,
}

/// One asset-funding checklist item for a signed client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingItem {
    pub id: String,
    pub booking_id: String,
    pub label: String,
    #[serde(default)]
    pub status: FundingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
}

/// Labels of the checklist seeded when a client signs.
pub const DEFAULT_FUNDING_LABELS: [&str; 3] = [
    "Retitle Bank Accounts",
    "Brokerage Beneficiary Updates",
    "Real Estate Deed Transfer",
];

impl FundingItem {
    /// The default checklist for `booking_id`, ids `fi-<booking>-1..3`.
    pub fn default_checklist(booking_id: &str) -> Vec<FundingItem> {
        DEFAULT_FUNDING_LABELS
            .iter()
            .enumerate()
            .map(|(idx, label)| FundingItem {
                id: format!("fi-{}-{}", booking_id, idx + 1),
                booking_id: booking_id.to_string(),
                label: label.to_string(),
                status: FundingStatus::Pending,
                proof: None,
            })
            .collect()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum DocVersionStatus {
    #[default]
    Draft,
    Redlined,
    Approved,
}

/// One assembled revision of a client's document set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: String,
    pub booking_id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: DocVersionStatus,
    pub created_at: String,
}

impl DocumentVersion {
    /// Approved versions are frozen.
    pub fn can_move_to(&self, next: DocVersionStatus) -> bool {
        self.status != DocVersionStatus::Approved || next == DocVersionStatus::Approved
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceEnrollment {
    pub booking_id: String,
    pub enrolled_at: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ReviewStage {
    #[default]
    Open,
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualReview {
    pub id: String,
    pub booking_id: String,
    #[serde(default)]
    pub stage: ReviewStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_at: Option<String>,
}

impl AnnualReview {
    pub fn is_open(&self) -> bool {
        self.stage != ReviewStage::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_draft_status_wire_format() {
        let json = serde_json::to_string(&DraftStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        assert_eq!(DraftStatus::from_str("In Progress").unwrap(), DraftStatus::InProgress);
        assert_eq!(DraftStatus::Queued.to_string(), "Queued");
    }

    #[test]
    fn test_approved_version_is_frozen() {
        let mut v = DocumentVersion {
            id: "dv-1".to_string(),
            booking_id: "b1".to_string(),
            name: "Trust v1".to_string(),
            content: String::new(),
            status: DocVersionStatus::Draft,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        assert!(v.can_move_to(DocVersionStatus::Redlined));
        assert!(v.can_move_to(DocVersionStatus::Approved));
        v.status = DocVersionStatus::Approved;
        assert!(!v.can_move_to(DocVersionStatus::Draft));
        assert!(v.can_move_to(DocVersionStatus::Approved));
    }

    #[test]
    fn test_default_funding_checklist() {
        let items = FundingItem::default_checklist("b7");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, "fi-b7-1");
        assert_eq!(items[2].label, "Real Estate Deed Transfer");
        assert!(items.iter().all(|i| i.status == FundingStatus::Pending));
    }
}
