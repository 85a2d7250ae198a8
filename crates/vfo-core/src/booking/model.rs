//! Booking (client record) domain model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::pipeline::SIMPLE_PIPELINE;

fn default_pipeline() -> String {
    SIMPLE_PIPELINE.to_string()
}

/// Price attached to a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

/// A document attached to a booking. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDocument {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Answers collected by the intake questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeAnswers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_of_residence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizenship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citizenship_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub priority: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_other: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_types_other: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_value_range: Option<String>,
}

/// A client booking tracked through a pipeline.
///
/// `stage` is always a member of the stage set of the pipeline named by
/// `pipeline`; the state machine is the only writer of that field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_at: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub guests: Vec<String>,
    #[serde(default)]
    pub pkg: String,
    #[serde(default)]
    pub slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(flatten)]
    pub intake: IntakeAnswers,
    pub stage: String,
    #[serde(default = "default_pipeline")]
    pub pipeline: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub docs: Vec<BookingDocument>,
}

impl Booking {
    /// Creates a booking on the primary track at stage `New`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            appointment_at: None,
            name: name.into(),
            email: email.into(),
            guests: Vec::new(),
            pkg: String::new(),
            slot: String::new(),
            phone: None,
            price: None,
            intake: IntakeAnswers::default(),
            stage: "New".to_string(),
            pipeline: default_pipeline(),
            notes: Vec::new(),
            docs: Vec::new(),
        }
    }

    /// Variables available to merge tags when a message targets this booking.
    pub fn merge_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("id".to_string(), self.id.clone());
        vars.insert("name".to_string(), self.name.clone());
        vars.insert(
            "first_name".to_string(),
            self.name.split_whitespace().next().unwrap_or_default().to_string(),
        );
        vars.insert("email".to_string(), self.email.clone());
        vars.insert("phone".to_string(), self.phone.clone().unwrap_or_default());
        vars.insert("pkg".to_string(), self.pkg.clone());
        vars.insert("slot".to_string(), self.slot.clone());
        vars.insert("stage".to_string(), self.stage.clone());
        vars.insert(
            "appointment_at".to_string(),
            self.appointment_at.clone().unwrap_or_default(),
        );
        vars
    }

    /// True when any note mentions `needle` (case-insensitive).
    pub fn has_note_containing(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.notes.iter().any(|n| n.to_lowercase().contains(&needle))
    }
}

/// Shallow partial update of a [`Booking`]. `None` leaves a field untouched.
///
/// List fields (`notes`, `docs`, `guests`) are replaced wholesale when set;
/// callers appending a single item go through the record store's append
/// helpers so unrelated entries are never dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub pkg: Option<String>,
    pub slot: Option<String>,
    pub appointment_at: Option<String>,
    pub price: Option<Price>,
    pub intake: Option<IntakeAnswers>,
    pub stage: Option<String>,
    pub pipeline: Option<String>,
    pub guests: Option<Vec<String>>,
    pub notes: Option<Vec<String>>,
    pub docs: Option<Vec<BookingDocument>>,
}

impl BookingPatch {
    pub fn stage(stage: impl Into<String>) -> Self {
        Self {
            stage: Some(stage.into()),
            ..Self::default()
        }
    }

    /// Applies the set fields onto `booking`.
    pub fn apply(self, booking: &mut Booking) {
        if let Some(v) = self.name {
            booking.name = v;
        }
        if let Some(v) = self.email {
            booking.email = v;
        }
        if let Some(v) = self.phone {
            booking.phone = Some(v);
        }
        if let Some(v) = self.pkg {
            booking.pkg = v;
        }
        if let Some(v) = self.slot {
            booking.slot = v;
        }
        if let Some(v) = self.appointment_at {
            booking.appointment_at = Some(v);
        }
        if let Some(v) = self.price {
            booking.price = Some(v);
        }
        if let Some(v) = self.intake {
            booking.intake = v;
        }
        if let Some(v) = self.stage {
            booking.stage = v;
        }
        if let Some(v) = self.pipeline {
            booking.pipeline = v;
        }
        if let Some(v) = self.guests {
            booking.guests = v;
        }
        if let Some(v) = self.notes {
            booking.notes = v;
        }
        if let Some(v) = self.docs {
            booking.docs = v;
        }
    }
}
