use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::bridge::error::{invalid_json, BridgeResult};

/// Parameters supplied by the host on every lifecycle callback.
///
/// Every field is optional. Reads go through the accessor methods, which treat blank strings as
/// absent and apply the documented default, so callers never inspect the raw fields directly.
///
/// Decoding is per parameter: a value of the wrong type is dropped and reported through
/// [`rejected_parameters`](Self::rejected_parameters) instead of failing the whole bag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BridgeConfig {
    pub project_id: Option<String>,
    pub disabled: Option<bool>,
    pub tracking_allowed: Option<bool>,
    pub debug: Option<bool>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub session_id: Option<String>,
    pub screen_name: Option<String>,
    pub app_name: Option<String>,
    pub environment: Option<String>,
    pub session_tags_json: Option<String>,
    pub event_name: Option<String>,
    pub event_data_json: Option<String>,
    pub event_trigger_token: Option<TriggerToken>,
    pub(crate) rejected: Vec<String>,
}

/// Opaque value whose change (not its content) signals that a new event should be sent.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum TriggerToken {
    Number(f64),
    Text(String),
    Flag(bool),
}

/// NaN equals NaN here: an unchanged token must compare equal to itself.
impl PartialEq for TriggerToken {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TriggerToken::Number(a), TriggerToken::Number(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (TriggerToken::Text(a), TriggerToken::Text(b)) => a == b,
            (TriggerToken::Flag(a), TriggerToken::Flag(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for TriggerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerToken::Number(value) => write!(f, "{value}"),
            TriggerToken::Text(value) => write!(f, "\"{value}\""),
            TriggerToken::Flag(value) => write!(f, "{value}"),
        }
    }
}

impl From<i32> for TriggerToken {
    fn from(value: i32) -> Self {
        TriggerToken::Number(f64::from(value))
    }
}

impl From<i64> for TriggerToken {
    fn from(value: i64) -> Self {
        TriggerToken::Number(value as f64)
    }
}

impl From<f64> for TriggerToken {
    fn from(value: f64) -> Self {
        TriggerToken::Number(value)
    }
}

impl From<&str> for TriggerToken {
    fn from(value: &str) -> Self {
        TriggerToken::Text(value.to_string())
    }
}

impl From<String> for TriggerToken {
    fn from(value: String) -> Self {
        TriggerToken::Text(value)
    }
}

impl From<bool> for TriggerToken {
    fn from(value: bool) -> Self {
        TriggerToken::Flag(value)
    }
}

impl<'de> Deserialize<'de> for BridgeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        BridgeConfig::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Removes `name` from the bag and decodes it; `null` reads as absent.
fn take<T>(map: &mut Map<String, Value>, name: &str, rejected: &mut Vec<String>) -> Option<T>
where
    T: DeserializeOwned,
{
    let value = map.remove(name).filter(|value| !value.is_null())?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            rejected.push(format!("{name}: {err}"));
            None
        }
    }
}

/// Flags also accept the strings `"true"` and `"false"`, which some hosts send for two-option
/// parameters.
fn take_flag(map: &mut Map<String, Value>, name: &str, rejected: &mut Vec<String>) -> Option<bool> {
    match map.remove(name)? {
        Value::Null => None,
        Value::Bool(flag) => Some(flag),
        Value::String(text) if text.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(text) if text.trim().eq_ignore_ascii_case("false") => Some(false),
        other => {
            rejected.push(format!("{name}: expected a boolean, got `{other}`"));
            None
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.trim().is_empty())
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the host parameter bag from its JSON representation.
    pub fn from_json(raw: &str) -> BridgeResult<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// Decodes a parameter bag. Only a non-object bag is an error; wrongly typed parameters are
    /// dropped and listed in [`rejected_parameters`](Self::rejected_parameters).
    pub fn from_value(value: Value) -> BridgeResult<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(invalid_json(format!(
                    "Parameters must be a JSON object, got `{other}`"
                )))
            }
        };
        let mut rejected = Vec::new();
        let bag = &mut map;
        let mut config = BridgeConfig {
            project_id: take(bag, "projectId", &mut rejected),
            disabled: take_flag(bag, "disabled", &mut rejected),
            tracking_allowed: None,
            debug: take_flag(bag, "debug", &mut rejected),
            user_id: take(bag, "userId", &mut rejected),
            user_name: take(bag, "userName", &mut rejected),
            user_email: take(bag, "userEmail", &mut rejected),
            session_id: take(bag, "sessionId", &mut rejected),
            screen_name: take(bag, "screenName", &mut rejected),
            app_name: take(bag, "appName", &mut rejected),
            environment: take(bag, "environment", &mut rejected),
            session_tags_json: take(bag, "sessionTagsJson", &mut rejected),
            event_name: take(bag, "eventName", &mut rejected),
            event_data_json: take(bag, "eventDataJson", &mut rejected),
            event_trigger_token: take(bag, "eventTriggerToken", &mut rejected),
            rejected: Vec::new(),
        };

        // An unreadable consent value withholds consent rather than falling back to "allowed".
        let before = rejected.len();
        config.tracking_allowed = take_flag(bag, "trackingAllowed", &mut rejected);
        if rejected.len() > before {
            config.tracking_allowed = Some(false);
        }

        config.rejected = rejected;
        Ok(config)
    }

    /// Parameters dropped during decoding because their value had the wrong type, as
    /// `name: reason`.
    pub fn rejected_parameters(&self) -> &[String] {
        &self.rejected
    }

    /// Trimmed project identifier, or `None` when missing or blank.
    pub fn project_id(&self) -> Option<&str> {
        non_blank(&self.project_id).map(str::trim)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    /// Absent means allowed.
    pub fn is_tracking_allowed(&self) -> bool {
        self.tracking_allowed.unwrap_or(true)
    }

    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    pub fn user_id(&self) -> Option<&str> {
        non_blank(&self.user_id)
    }

    pub fn user_name(&self) -> Option<&str> {
        non_blank(&self.user_name)
    }

    pub fn user_email(&self) -> Option<&str> {
        non_blank(&self.user_email)
    }

    pub fn session_id(&self) -> Option<&str> {
        non_blank(&self.session_id)
    }

    pub fn screen_name(&self) -> Option<&str> {
        non_blank(&self.screen_name)
    }

    pub fn app_name(&self) -> Option<&str> {
        non_blank(&self.app_name)
    }

    pub fn environment(&self) -> Option<&str> {
        non_blank(&self.environment)
    }

    pub fn session_tags_json(&self) -> Option<&str> {
        non_blank(&self.session_tags_json)
    }

    pub fn event_name(&self) -> Option<&str> {
        non_blank(&self.event_name)
    }

    pub fn event_data_json(&self) -> Option<&str> {
        non_blank(&self.event_data_json)
    }

    pub fn event_trigger_token(&self) -> Option<&TriggerToken> {
        self.event_trigger_token.as_ref()
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn with_tracking_allowed(mut self, allowed: bool) -> Self {
        self.tracking_allowed = Some(allowed);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_user_email(mut self, user_email: impl Into<String>) -> Self {
        self.user_email = Some(user_email.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_screen_name(mut self, screen_name: impl Into<String>) -> Self {
        self.screen_name = Some(screen_name.into());
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_session_tags_json(mut self, raw: impl Into<String>) -> Self {
        self.session_tags_json = Some(raw.into());
        self
    }

    pub fn with_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = Some(event_name.into());
        self
    }

    pub fn with_event_data_json(mut self, raw: impl Into<String>) -> Self {
        self.event_data_json = Some(raw.into());
        self
    }

    pub fn with_event_trigger_token(mut self, token: impl Into<TriggerToken>) -> Self {
        self.event_trigger_token = Some(token.into());
        self
    }
}
