//! Automation rule domain models.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of event a rule listens for.
///
/// Unrecognised event names are kept verbatim in `Other` so rules authored
/// for newer event kinds survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AutomationEvent {
    StageChange,
    DailyCheck,
    MatterComplete,
    Other(String),
}

impl AutomationEvent {
    pub fn as_str(&self) -> &str {
        match self {
            Self::StageChange => "stage_change",
            Self::DailyCheck => "daily_check",
            Self::MatterComplete => "matter_complete",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for AutomationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AutomationEvent {
    fn from(value: &str) -> Self {
        match value {
            "stage_change" => Self::StageChange,
            "daily_check" => Self::DailyCheck,
            "matter_complete" => Self::MatterComplete,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for AutomationEvent {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<AutomationEvent> for String {
    fn from(value: AutomationEvent) -> Self {
        value.as_str().to_string()
    }
}

/// One side effect a rule performs when it fires.
///
/// Stored as `{"type": "...", ...fields}`. Anything that does not parse as a
/// known kind (new kinds, or a known kind with missing fields) is kept as
/// `Unknown` and written back exactly as it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AutomationAction {
    SendEmailTemplate { template_id: String },
    AlertAdvisor { message: String },
    ScheduleTask { task: String, delay_days: i64 },
    Log { message: String },
    /// Moves the booking to another stage, which re-enters rule evaluation.
    MoveStage { stage: String },
    /// Only meaningful while the site paywall is enabled.
    RequestPayment {
        amount: Option<f64>,
        currency: Option<String>,
    },
    Unknown { kind: String, payload: Value },
}

impl AutomationAction {
    pub fn send_email_template(template_id: impl Into<String>) -> Self {
        Self::SendEmailTemplate {
            template_id: template_id.into(),
        }
    }

    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
        }
    }

    pub fn move_stage(stage: impl Into<String>) -> Self {
        Self::MoveStage {
            stage: stage.into(),
        }
    }

    /// The wire `type` tag.
    pub fn kind(&self) -> &str {
        match self {
            Self::SendEmailTemplate { .. } => "send_email_template",
            Self::AlertAdvisor { .. } => "alert_advisor",
            Self::ScheduleTask { .. } => "schedule_task",
            Self::Log { .. } => "log",
            Self::MoveStage { .. } => "move_stage",
            Self::RequestPayment { .. } => "request_payment",
            Self::Unknown { kind, .. } => kind,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TaggedAction {
    SendEmailTemplate {
        #[serde(rename = "templateId")]
        template_id: String,
    },
    AlertAdvisor {
        #[serde(default)]
        message: String,
    },
    ScheduleTask {
        task: String,
        #[serde(rename = "delayDays", default)]
        delay_days: i64,
    },
    Log {
        #[serde(default)]
        message: String,
    },
    MoveStage {
        stage: String,
    },
    RequestPayment {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency: Option<String>,
    },
}

impl From<Value> for AutomationAction {
    fn from(value: Value) -> Self {
        match serde_json::from_value::<TaggedAction>(value.clone()) {
            Ok(TaggedAction::SendEmailTemplate { template_id }) => {
                Self::SendEmailTemplate { template_id }
            }
            Ok(TaggedAction::AlertAdvisor { message }) => Self::AlertAdvisor { message },
            Ok(TaggedAction::ScheduleTask { task, delay_days }) => {
                Self::ScheduleTask { task, delay_days }
            }
            Ok(TaggedAction::Log { message }) => Self::Log { message },
            Ok(TaggedAction::MoveStage { stage }) => Self::MoveStage { stage },
            Ok(TaggedAction::RequestPayment { amount, currency }) => {
                Self::RequestPayment { amount, currency }
            }
            Err(_) => Self::Unknown {
                kind: value
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                payload: value,
            },
        }
    }
}

impl From<AutomationAction> for Value {
    fn from(action: AutomationAction) -> Self {
        let tagged = match action {
            AutomationAction::SendEmailTemplate { template_id } => {
                TaggedAction::SendEmailTemplate { template_id }
            }
            AutomationAction::AlertAdvisor { message } => TaggedAction::AlertAdvisor { message },
            AutomationAction::ScheduleTask { task, delay_days } => {
                TaggedAction::ScheduleTask { task, delay_days }
            }
            AutomationAction::Log { message } => TaggedAction::Log { message },
            AutomationAction::MoveStage { stage } => TaggedAction::MoveStage { stage },
            AutomationAction::RequestPayment { amount, currency } => {
                TaggedAction::RequestPayment { amount, currency }
            }
            AutomationAction::Unknown { payload, .. } => return payload,
        };
        serde_json::to_value(tagged).unwrap_or_default()
    }
}

/// The facts a rule's conditions are tested against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionContext {
    pub booking_id: String,
    pub stage_from: Option<String>,
    pub stage_to: Option<String>,
    pub pkg: String,
}

impl TransitionContext {
    pub fn stage_change(
        booking_id: impl Into<String>,
        stage_from: impl Into<String>,
        stage_to: impl Into<String>,
        pkg: impl Into<String>,
    ) -> Self {
        Self {
            booking_id: booking_id.into(),
            stage_from: Some(stage_from.into()),
            stage_to: Some(stage_to.into()),
            pkg: pkg.into(),
        }
    }

    /// Looks up a condition key. Unknown keys have no value.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "stage_from" => self.stage_from.as_deref(),
            "stage_to" => self.stage_to.as_deref(),
            "pkg" => Some(self.pkg.as_str()),
            "booking_id" => Some(self.booking_id.as_str()),
            _ => None,
        }
    }
}

/// "When `event` happens and every condition holds, run `actions` in order."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub event: AutomationEvent,
    /// Loose key/value map, usually `{stage_from, stage_to, pkg}`.
    /// A `null` or empty-string value means "don't care".
    #[serde(default)]
    pub conditions: BTreeMap<String, Value>,
    #[serde(default)]
    pub actions: Vec<AutomationAction>,
}

impl AutomationRule {
    pub fn new(id: impl Into<String>, name: impl Into<String>, event: AutomationEvent) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            event,
            conditions: BTreeMap::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.insert(key.into(), Value::String(value.into()));
        self
    }

    pub fn with_action(mut self, action: AutomationAction) -> Self {
        self.actions.push(action);
        self
    }

    /// True when the rule listens for `event` and every declared condition
    /// equals the context's value for that key.
    pub fn matches(&self, event: &AutomationEvent, ctx: &TransitionContext) -> bool {
        if &self.event != event {
            return false;
        }
        self.conditions.iter().all(|(key, expected)| {
            let expected = match expected {
                Value::Null => return true,
                Value::String(s) if s.is_empty() => return true,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            ctx.get(key) == Some(expected.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_action_round_trip_uses_camel_case_fields() {
        let action: AutomationAction =
            serde_json::from_value(json!({"type": "send_email_template", "templateId": "welcome"})).unwrap();
        assert_eq!(action, AutomationAction::send_email_template("welcome"));
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "send_email_template", "templateId": "welcome"})
        );
    }

    #[test]
    fn test_unknown_action_is_preserved_verbatim() {
        let raw = json!({"type": "send_sms", "to": "+15550100", "body": "hi"});
        let action: AutomationAction = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(action.kind(), "send_sms");
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);
    }

    #[test]
    fn test_known_kind_with_missing_field_is_unknown() {
        let action: AutomationAction =
            serde_json::from_value(json!({"type": "send_email_template"})).unwrap();
        assert!(matches!(action, AutomationAction::Unknown { .. }));
    }

    #[test]
    fn test_event_round_trip() {
        let rule: AutomationRule = serde_json::from_value(json!({
            "id": "r1", "name": "n", "event": "quarterly_sweep", "conditions": {}, "actions": []
        }))
        .unwrap();
        assert_eq!(rule.event, AutomationEvent::Other("quarterly_sweep".to_string()));
        assert_eq!(serde_json::to_value(&rule).unwrap()["event"], "quarterly_sweep");
    }

    #[test]
    fn test_conditions_absent_null_and_empty_are_dont_care() {
        let ctx = TransitionContext::stage_change("b1", "New", "Signed", "consult-30");
        let mut rule = AutomationRule::new("r1", "any", AutomationEvent::StageChange);
        assert!(rule.matches(&AutomationEvent::StageChange, &ctx));

        rule.conditions.insert("stage_from".to_string(), Value::Null);
        rule.conditions.insert("pkg".to_string(), json!(""));
        assert!(rule.matches(&AutomationEvent::StageChange, &ctx));

        let rule = rule.with_condition("stage_to", "Paid");
        assert!(!rule.matches(&AutomationEvent::StageChange, &ctx));
    }

    #[test]
    fn test_unrecognised_condition_key_never_matches() {
        let ctx = TransitionContext::stage_change("b1", "New", "Signed", "");
        let rule = AutomationRule::new("r1", "x", AutomationEvent::StageChange).with_condition("region", "WY");
        assert!(!rule.matches(&AutomationEvent::StageChange, &ctx));
    }
}
