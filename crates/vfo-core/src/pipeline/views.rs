//! Derived, read-only views over bookings.
//!
//! Nothing here is persisted. Column membership on the kanban board is
//! computed per column, so one booking may show up in more than one column
//! (a signed client with a questionnaire note is both "Engaged" and
//! "Questionnaire Received").

use serde::Serialize;

use super::definition::KANBAN_PIPELINE;
use crate::booking::Booking;

/// Display label describing what kind of client a booking represents.
pub fn candidate_type(booking: &Booking) -> &'static str {
    match booking.stage.as_str() {
        "New" => "Lead",
        "Booked" => "Free Consult",
        "Paid" => "Paid Consult",
        "Signed" if booking.pkg.contains("WYDAPT") => "Engaged WYDAPT",
        "Signed" => "Engaged LLPS",
        "Onboarding" | "Completed" => "Engaged",
        _ => "Lead",
    }
}

/// Display label for where a stage sits in the overall client journey.
///
/// Stages outside the primary track are shown as-is.
pub fn pipeline_status_label(stage: &str) -> &str {
    match stage {
        "New" => "Booked Consult",
        "Booked" | "Paid" => "Pre-Engagement",
        "Signed" => "Engaged",
        "Onboarding" => "Matter in Process",
        "Completed" => "Matter Fulfilled",
        other => other,
    }
}

/// One column of the kanban overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KanbanColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub booking_ids: Vec<String>,
}

impl KanbanColumn {
    pub fn count(&self) -> usize {
        self.booking_ids.len()
    }
}

struct ColumnSpec {
    key: &'static str,
    label: &'static str,
    simple: fn(&Booking) -> bool,
    kanban_stages: &'static [&'static str],
}

const COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec {
        key: "book-consults",
        label: "Book Consults",
        simple: |b| b.stage == "New",
        kanban_stages: &["New"],
    },
    ColumnSpec {
        key: "pre-engagement",
        label: "Pre-Engagement",
        simple: |b| b.stage == "Booked" || b.stage == "Paid",
        kanban_stages: &["pre_engagement", "Booked", "Paid"],
    },
    ColumnSpec {
        key: "engaged",
        label: "Engaged",
        simple: |b| b.stage == "Signed",
        kanban_stages: &["engaged"],
    },
    ColumnSpec {
        key: "questionnaire",
        label: "Questionnaire Received",
        simple: |b| b.stage == "Signed" && b.has_note_containing("questionnaire"),
        kanban_stages: &["questionnaire_received"],
    },
    ColumnSpec {
        key: "in-process",
        label: "Matter in Process",
        simple: |b| b.stage == "Onboarding",
        kanban_stages: &["matter_in_process"],
    },
    ColumnSpec {
        key: "fulfilled",
        label: "Matter Fulfilled",
        simple: |b| b.stage == "Completed",
        kanban_stages: &["matter_fulfilled"],
    },
];

/// Groups bookings into the six kanban overview columns, preserving the
/// input order inside each column.
pub fn kanban_columns(bookings: &[Booking]) -> Vec<KanbanColumn> {
    COLUMNS
        .iter()
        .map(|spec| KanbanColumn {
            key: spec.key,
            label: spec.label,
            booking_ids: bookings
                .iter()
                .filter(|b| {
                    if b.pipeline == KANBAN_PIPELINE {
                        spec.kanban_stages.contains(&b.stage.as_str())
                    } else {
                        (spec.simple)(b)
                    }
                })
                .map(|b| b.id.clone())
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(id: &str, stage: &str) -> Booking {
        let mut b = Booking::new(id, "Test Client", "t@example.com");
        b.stage = stage.to_string();
        b
    }

    #[test]
    fn test_candidate_type_table() {
        let mut b = booking("b1", "Signed");
        assert_eq!(candidate_type(&b), "Engaged LLPS");
        b.pkg = "WYDAPT-full".to_string();
        assert_eq!(candidate_type(&b), "Engaged WYDAPT");
        assert_eq!(candidate_type(&booking("b2", "Paid")), "Paid Consult");
        assert_eq!(candidate_type(&booking("b3", "Completed")), "Engaged");
    }

    #[test]
    fn test_pipeline_status_label_table() {
        assert_eq!(pipeline_status_label("New"), "Booked Consult");
        assert_eq!(pipeline_status_label("Paid"), "Pre-Engagement");
        assert_eq!(pipeline_status_label("Completed"), "Matter Fulfilled");
        assert_eq!(pipeline_status_label("engaged"), "engaged");
    }

    #[test]
    fn test_kanban_fan_in() {
        let mut signed = booking("s1", "Signed");
        signed.notes.push("Questionnaire received 3/2".to_string());
        let bookings = vec![
            booking("n1", "New"),
            booking("b1", "Booked"),
            booking("p1", "Paid"),
            signed,
        ];
        let cols = kanban_columns(&bookings);

        assert_eq!(cols[1].booking_ids, vec!["b1", "p1"]);
        assert_eq!(cols[2].booking_ids, vec!["s1"]);
        assert_eq!(cols[3].booking_ids, vec!["s1"]);
        assert_eq!(cols[5].count(), 0);
    }

    #[test]
    fn test_kanban_track_bookings_use_own_stage() {
        let mut b = booking("k1", "questionnaire_received");
        b.pipeline = KANBAN_PIPELINE.to_string();
        let cols = kanban_columns(&[b]);
        assert_eq!(cols[3].booking_ids, vec!["k1"]);
        assert!(cols[2].booking_ids.is_empty());
    }
}
