//! Nurture sequence domain models.

use std::sync::OnceLock;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Kind of work a nurture step performs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepType {
    #[default]
    Email,
    Sms,
    FormSend,
    EsignRequest,
    AlertAdvisor,
    DocumentSend,
    ManualReview,
}

/// One step of a nurture sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NurtureStep {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Only used by `email` steps, but any step may carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Only used by `sms` steps. Merge tags allowed; 160 chars is a display
    /// hint, not a limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_content: Option<String>,
    /// Delay from the sequence anchor. When absent the delay is read from a
    /// `T+Nd` style marker in the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_hours: Option<i64>,
}

fn default_enabled() -> bool {
    true
}

/// Soft display cap for SMS bodies.
pub const SMS_SOFT_LIMIT: usize = 160;

fn label_offset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bT\s*\+\s*(\d+)\s*([hdw])?").expect("label offset pattern is valid")
    })
}

/// Parses `T+0`, `T+12h`, `T+2d` or `T+1w` out of free-text label text.
/// A bare number is read as days. Offsets too large for an `i64` hour count
/// yield `None`.
pub fn parse_label_offset(label: &str) -> Option<i64> {
    let caps = label_offset_pattern().captures(label)?;
    let n: i64 = caps[1].parse().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "d".to_string());
    match unit.as_str() {
        "h" => Some(n),
        "w" => n.checked_mul(24 * 7),
        _ => n.checked_mul(24),
    }
}

impl NurtureStep {
    pub fn new(id: impl Into<String>, step_type: StepType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            step_type,
            label: label.into(),
            enabled: true,
            template_id: None,
            sms_content: None,
            offset_hours: None,
        }
    }

    /// Structured offset, falling back to the label marker.
    pub fn effective_offset_hours(&self) -> Option<i64> {
        self.offset_hours.or_else(|| parse_label_offset(&self.label))
    }

    pub fn sms_over_soft_limit(&self) -> bool {
        self.sms_content
            .as_deref()
            .is_some_and(|s| s.chars().count() > SMS_SOFT_LIMIT)
    }
}

/// Merge-by-id patch for a step. `None` leaves a field untouched; an empty
/// `template_id` clears the link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPatch {
    #[serde(rename = "type")]
    pub step_type: Option<StepType>,
    pub label: Option<String>,
    pub enabled: Option<bool>,
    pub template_id: Option<String>,
    pub sms_content: Option<String>,
    pub offset_hours: Option<i64>,
}

impl StepPatch {
    fn apply(self, step: &mut NurtureStep) {
        if let Some(v) = self.step_type {
            step.step_type = v;
        }
        if let Some(v) = self.label {
            step.label = v;
        }
        if let Some(v) = self.enabled {
            step.enabled = v;
        }
        if let Some(v) = self.template_id {
            step.template_id = if v.is_empty() { None } else { Some(v) };
        }
        if let Some(v) = self.sms_content {
            step.sms_content = Some(v);
        }
        if let Some(v) = self.offset_hours {
            step.offset_hours = Some(v);
        }
    }
}

/// An enabled step scheduled relative to an anchor time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedStep {
    pub step_id: String,
    pub step_type: StepType,
    pub label: String,
    pub template_id: Option<String>,
    /// `None` when the step carries no timing at all.
    pub due_at: Option<DateTime<Utc>>,
}

/// A named, ordered list of steps. List order is execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurtureSequence {
    pub id: String,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub steps: Vec<NurtureStep>,
}

fn generate_step_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("step-{}", &suffix[..8])
}

impl NurtureSequence {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            steps: Vec::new(),
        }
    }

    pub fn get_step(&self, step_id: &str) -> Option<&NurtureStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn get_step_mut(&mut self, step_id: &str) -> Option<&mut NurtureStep> {
        self.steps.iter_mut().find(|s| s.id == step_id)
    }

    fn fresh_step_id(&self) -> String {
        loop {
            let id = generate_step_id();
            if self.get_step(&id).is_none() {
                return id;
            }
        }
    }

    /// Appends an enabled `email` step and returns its id.
    pub fn add_step(&mut self) -> String {
        let id = self.fresh_step_id();
        self.steps
            .push(NurtureStep::new(id.clone(), StepType::Email, "New step"));
        id
    }

    /// Returns false when the step does not exist.
    pub fn update_step(&mut self, step_id: &str, patch: StepPatch) -> bool {
        match self.get_step_mut(step_id) {
            Some(step) => {
                patch.apply(step);
                true
            }
            None => false,
        }
    }

    pub fn remove_step(&mut self, step_id: &str) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.id != step_id);
        self.steps.len() != before
    }

    /// Clones the step directly after itself with a fresh id and a
    /// `" (Copy)"` label suffix. Returns the new id.
    pub fn duplicate_step(&mut self, step_id: &str) -> Option<String> {
        let idx = self.steps.iter().position(|s| s.id == step_id)?;
        let mut copy = self.steps[idx].clone();
        copy.id = self.fresh_step_id();
        copy.label = format!("{} (Copy)", copy.label);
        let new_id = copy.id.clone();
        self.steps.insert(idx + 1, copy);
        Some(new_id)
    }

    /// Flips the sequence flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn toggle_step(&mut self, step_id: &str) -> Option<bool> {
        let step = self.get_step_mut(step_id)?;
        step.enabled = !step.enabled;
        Some(step.enabled)
    }

    /// Sets the step's template reference. No type check is performed.
    pub fn link_template(&mut self, step_id: &str, template_id: impl Into<String>) -> bool {
        match self.get_step_mut(step_id) {
            Some(step) => {
                step.template_id = Some(template_id.into());
                true
            }
            None => false,
        }
    }

    /// Enabled steps in list order with due times from `anchor`. A disabled
    /// sequence plans nothing.
    pub fn plan(&self, anchor: DateTime<Utc>) -> Vec<PlannedStep> {
        if !self.enabled {
            return Vec::new();
        }
        self.steps
            .iter()
            .filter(|s| s.enabled)
            .map(|s| PlannedStep {
                step_id: s.id.clone(),
                step_type: s.step_type,
                label: s.label.clone(),
                template_id: s.template_id.clone(),
                due_at: s
                    .effective_offset_hours()
                    .and_then(|h| due_after(anchor, &s.id, h)),
            })
            .collect()
    }
}

fn due_after(anchor: DateTime<Utc>, step_id: &str, hours: i64) -> Option<DateTime<Utc>> {
    let due = TimeDelta::try_hours(hours).and_then(|d| anchor.checked_add_signed(d));
    if due.is_none() {
        tracing::warn!(
            "[Nurture] Offset of {}h on step {} is out of range, leaving it unscheduled",
            hours,
            step_id
        );
    }
    due
}

/// The sequence every new workspace starts with.
pub fn default_sequences() -> Vec<NurtureSequence> {
    let mut sms = NurtureStep::new("sms-nudge", StepType::Sms, "SMS nudge (T+3d)");
    sms.enabled = false;
    vec![NurtureSequence {
        id: "lead-paid-consult".to_string(),
        name: "Lead → Paid Consult".to_string(),
        enabled: true,
        steps: vec![
            NurtureStep::new("email-welcome", StepType::Email, "Welcome email (T+0)"),
            NurtureStep::new("email-reminder", StepType::Email, "Reminder email (T+2d)"),
            sms,
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use strum::IntoEnumIterator;

    #[test]
    fn test_step_type_wire_names() {
        let names: Vec<String> = StepType::iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "email",
                "sms",
                "form_send",
                "esign_request",
                "alert_advisor",
                "document_send",
                "manual_review"
            ]
        );
        assert_eq!(serde_json::to_string(&StepType::EsignRequest).unwrap(), "\"esign_request\"");
    }

    #[test]
    fn test_parse_label_offset() {
        assert_eq!(parse_label_offset("Welcome email (T+0)"), Some(0));
        assert_eq!(parse_label_offset("Reminder email (T+2d)"), Some(48));
        assert_eq!(parse_label_offset("Check-in (T+12h)"), Some(12));
        assert_eq!(parse_label_offset("Follow up (t+1w)"), Some(168));
        assert_eq!(parse_label_offset("Manual review"), None);
    }

    #[test]
    fn test_duplicate_inserts_after_original() {
        let mut seq = default_sequences().remove(0);
        let new_id = seq.duplicate_step("email-welcome").unwrap();

        assert_eq!(seq.steps.len(), 4);
        assert_eq!(seq.steps[0].id, "email-welcome");
        assert_eq!(seq.steps[1].id, new_id);
        assert_ne!(new_id, "email-welcome");
        assert_eq!(seq.steps[1].label, "Welcome email (T+0) (Copy)");
        assert_eq!(seq.steps[2].id, "email-reminder");
    }

    #[test]
    fn test_add_step_defaults_to_email() {
        let mut seq = NurtureSequence::new("s", "S");
        let id = seq.add_step();
        let step = seq.get_step(&id).unwrap();
        assert_eq!(step.step_type, StepType::Email);
        assert!(step.enabled);
        assert!(id.starts_with("step-"));
    }

    #[test]
    fn test_update_step_merges_fields() {
        let mut seq = default_sequences().remove(0);
        let patch = StepPatch {
            sms_content: Some("Hi {{first_name}}".to_string()),
            ..StepPatch::default()
        };
        assert!(seq.update_step("sms-nudge", patch));
        let step = seq.get_step("sms-nudge").unwrap();
        assert_eq!(step.label, "SMS nudge (T+3d)");
        assert_eq!(step.sms_content.as_deref(), Some("Hi {{first_name}}"));
        assert!(!seq.update_step("missing", StepPatch::default()));
    }

    #[test]
    fn test_link_template_has_no_type_check() {
        let mut seq = default_sequences().remove(0);
        assert!(seq.link_template("sms-nudge", "welcome"));
        assert_eq!(seq.get_step("sms-nudge").unwrap().template_id.as_deref(), Some("welcome"));
    }

    #[test]
    fn test_plan_skips_disabled_steps_and_orders_by_list() {
        let mut seq = default_sequences().remove(0);
        let anchor = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();

        let plan = seq.plan(anchor);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].due_at, Some(anchor));
        assert_eq!(plan[1].due_at, Some(anchor + TimeDelta::days(2)));

        seq.toggle_step("sms-nudge");
        seq.update_step(
            "email-reminder",
            StepPatch {
                offset_hours: Some(6),
                ..StepPatch::default()
            },
        );
        let plan = seq.plan(anchor);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[1].due_at, Some(anchor + TimeDelta::hours(6)));

        seq.toggle();
        assert!(seq.plan(anchor).is_empty());
    }

    #[test]
    fn test_oversized_label_offset_is_left_unscheduled() {
        assert_eq!(parse_label_offset("Wait (T+9999999999999999999w)"), None);
        assert_eq!(parse_label_offset("Wait (T+999999999999999999d)"), None);

        let seq = NurtureSequence {
            id: "s".to_string(),
            name: "Long wait".to_string(),
            enabled: true,
            steps: vec![
                NurtureStep::new("far", StepType::Email, "Follow up (T+999999999d)"),
                NurtureStep::new("near", StepType::Email, "Follow up (T+1d)"),
            ],
        };
        let anchor = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();

        let plan = seq.plan(anchor);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].due_at, None);
        assert_eq!(plan[1].due_at, Some(anchor + TimeDelta::days(1)));
    }
}
