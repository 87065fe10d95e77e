use crate::bridge::host::LifecycleContext;
use crate::bridge::report::{SkipReason, StepOutcome};
use crate::bridge::sdk::SessionSdk;
use crate::bridge::state::SessionState;
use crate::logger::Logger;

/// Sends the configured event when the trigger token differs from the previous one.
pub(crate) fn run(
    sdk: &dyn SessionSdk,
    state: &mut SessionState,
    context: &LifecycleContext,
    logger: &Logger,
) -> StepOutcome {
    if !state.is_initialized() {
        return StepOutcome::Skipped(SkipReason::NotInitialized);
    }
    let Some(token) = context.parameters.event_trigger_token() else {
        return StepOutcome::Skipped(SkipReason::NothingConfigured);
    };
    if state.last_trigger_token.as_ref() == Some(token) {
        return StepOutcome::Skipped(SkipReason::Unchanged);
    }

    let Some(event_name) = context.parameters.event_name() else {
        logger.debug(format!(
            "Trigger token changed to {token} but no event name is configured"
        ));
        state.last_trigger_token = Some(token.clone());
        return StepOutcome::Skipped(SkipReason::MissingEventName);
    };

    // Event data is validated only; the SDK's event primitive takes a name alone.
    if let Some(raw) = context.parameters.event_data_json() {
        if let Err(err) = serde_json::from_str::<serde_json::Value>(raw) {
            logger.warn(format!(
                "Event data for `{event_name}` is not valid JSON, sending without it: {err}"
            ));
        }
    }

    logger.debug(format!("Sending event `{event_name}` for trigger token {token}"));
    let result = sdk.event(event_name);
    state.last_trigger_token = Some(token.clone());
    match result {
        Ok(()) => StepOutcome::Applied,
        Err(err) => StepOutcome::Failed(err),
    }
}
