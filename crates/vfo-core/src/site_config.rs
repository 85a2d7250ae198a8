//! Site configuration: branding and feature toggles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, VfoError};

/// Flat settings object shared by the public site and the admin console.
///
/// Only the fields the engine reads are typed. Everything else round-trips
/// through `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_address: Option<String>,
    /// `None` means never configured, which is treated as enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paywall_enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteConfig {
    /// Payment actions are skipped only when the paywall is explicitly off.
    pub fn paywall_active(&self) -> bool {
        self.paywall_enabled.unwrap_or(true)
    }

    /// Returns a copy with the top-level keys of `patch` written over this
    /// config. Nested objects are replaced, not merged.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<SiteConfig> {
        let mut current = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => return Err(VfoError::internal("site config did not serialize to an object")),
        };
        for (key, value) in patch {
            current.insert(key.clone(), value.clone());
        }
        Ok(serde_json::from_value(Value::Object(current))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_is_shallow_and_keeps_unknown_keys() {
        let base: SiteConfig = serde_json::from_value(json!({
            "primaryColor": "#3C4630",
            "videoUrl": "https://example.com/v.mp4"
        }))
        .unwrap();

        let patch = json!({"paywallEnabled": false, "advisorName": "Dana Reyes"});
        let merged = base.merged(patch.as_object().unwrap()).unwrap();

        assert_eq!(merged.primary_color.as_deref(), Some("#3C4630"));
        assert_eq!(merged.advisor_name.as_deref(), Some("Dana Reyes"));
        assert!(!merged.paywall_active());
        assert_eq!(merged.extra["videoUrl"], "https://example.com/v.mp4");
    }

    #[test]
    fn test_paywall_defaults_to_active() {
        assert!(SiteConfig::default().paywall_active());
    }
}
