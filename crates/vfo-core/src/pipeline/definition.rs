//! Pipeline definitions: named, ordered stage sets.

use serde::{Deserialize, Serialize};

/// Key of the six-stage primary track.
pub const SIMPLE_PIPELINE: &str = "simple";
/// Key of the six-stage kanban track.
pub const KANBAN_PIPELINE: &str = "kanban";

/// Stage keys of the primary track, in order.
pub const SIMPLE_STAGES: [&str; 6] = ["New", "Booked", "Paid", "Signed", "Onboarding", "Completed"];

/// One stage of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDef {
    /// Value stored in `Booking.stage`.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Additional stage values that belong to this stage (fan-in).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl StageDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    /// True when `value` is this stage's key or one of its aliases.
    pub fn matches(&self, value: &str) -> bool {
        self.key == value || self.aliases.iter().any(|a| a == value)
    }
}

/// An ordered stage set a booking's stage is validated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub key: String,
    pub name: String,
    pub stages: Vec<StageDef>,
}

impl PipelineDefinition {
    /// The primary track: `New, Booked, Paid, Signed, Onboarding, Completed`.
    pub fn simple() -> Self {
        Self {
            key: SIMPLE_PIPELINE.to_string(),
            name: "Client Pipeline".to_string(),
            stages: SIMPLE_STAGES
                .iter()
                .map(|s| StageDef::new(*s, *s))
                .collect(),
        }
    }

    /// The kanban track. Its second column accepts both `Booked` and `Paid`.
    pub fn kanban() -> Self {
        Self {
            key: KANBAN_PIPELINE.to_string(),
            name: "Kanban".to_string(),
            stages: vec![
                StageDef::new("New", "Book Consults"),
                StageDef::new("pre_engagement", "Pre-Engagement").with_aliases(&["Booked", "Paid"]),
                StageDef::new("engaged", "Engaged"),
                StageDef::new("questionnaire_received", "Questionnaire Received"),
                StageDef::new("matter_in_process", "Matter in Process"),
                StageDef::new("matter_fulfilled", "Matter Fulfilled"),
            ],
        }
    }

    /// Both built-in tracks.
    pub fn builtin() -> Vec<Self> {
        vec![Self::simple(), Self::kanban()]
    }

    /// Finds the stage a stored value belongs to.
    pub fn resolve(&self, value: &str) -> Option<&StageDef> {
        self.stages.iter().find(|s| s.matches(value))
    }

    /// True when `value` is a member of this stage set.
    pub fn contains(&self, value: &str) -> bool {
        self.resolve(value).is_some()
    }

    /// Zero-based position of the stage `value` belongs to.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.matches(value))
    }

    /// `(index + 1) / count * 100`, rounded. Unknown stages report 0.
    pub fn progress_percent(&self, value: &str) -> u8 {
        match self.index_of(value) {
            Some(idx) if !self.stages.is_empty() => {
                let pct = ((idx + 1) as f64 / self.stages.len() as f64) * 100.0;
                pct.round() as u8
            }
            _ => 0,
        }
    }

    /// The first stage, used as the default for new records.
    pub fn initial_stage(&self) -> Option<&str> {
        self.stages.first().map(|s| s.key.as_str())
    }

    pub fn stage_keys(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.key.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_progress_matches_overview() {
        let p = PipelineDefinition::simple();
        assert_eq!(p.progress_percent("New"), 17);
        assert_eq!(p.progress_percent("Paid"), 50);
        assert_eq!(p.progress_percent("Completed"), 100);
        assert_eq!(p.progress_percent("Nope"), 0);
    }

    #[test]
    fn test_kanban_accepts_legacy_values_in_pre_engagement() {
        let p = PipelineDefinition::kanban();
        assert!(p.contains("Booked"));
        assert!(p.contains("Paid"));
        assert_eq!(p.index_of("Paid"), Some(1));
        assert_eq!(p.resolve("Booked").unwrap().label, "Pre-Engagement");
        assert!(!p.contains("Signed"));
    }
}
