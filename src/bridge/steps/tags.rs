use serde_json::{Map, Value};

use crate::bridge::error::{invalid_json, BridgeError, BridgeResult};
use crate::bridge::host::LifecycleContext;
use crate::bridge::report::{SkipReason, StepOutcome};
use crate::bridge::sdk::SessionSdk;
use crate::bridge::state::SessionState;
use crate::logger::Logger;

/// Parses a flat JSON object of session tags.
pub(crate) fn parse_session_tags(raw: &str) -> BridgeResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(invalid_json(format!(
            "Session tags must be a JSON object, got `{other}`"
        ))),
    }
}

/// String form sent to the SDK; `None` for values that are skipped.
fn tag_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Applies the configured session tags once. Malformed input leaves the step open for a retry
/// on a later cycle.
pub(crate) fn run(
    sdk: &dyn SessionSdk,
    state: &mut SessionState,
    context: &LifecycleContext,
    logger: &Logger,
) -> StepOutcome {
    if !state.is_initialized() {
        return StepOutcome::Skipped(SkipReason::NotInitialized);
    }
    if state.session_tags_applied {
        return StepOutcome::Skipped(SkipReason::AlreadyApplied);
    }
    let Some(raw) = context.parameters.session_tags_json() else {
        return StepOutcome::Skipped(SkipReason::NothingConfigured);
    };

    let tags = match parse_session_tags(raw) {
        Ok(tags) => tags,
        Err(err) => {
            logger.warn(format!("Ignoring session tags until they parse: {err}"));
            return StepOutcome::Failed(err);
        }
    };

    let mut first_error: Option<BridgeError> = None;
    for (key, value) in &tags {
        let Some(value) = tag_value(value) else {
            continue;
        };
        logger.debug(format!("Tagging session {key}={value}"));
        if let Err(err) = sdk.set_tag(key, &value) {
            logger.warn(format!("Failed to set session tag `{key}`: {err}"));
            first_error.get_or_insert(err);
        }
    }

    state.session_tags_applied = true;
    match first_error {
        Some(err) => StepOutcome::Failed(err),
        None => StepOutcome::Applied,
    }
}
