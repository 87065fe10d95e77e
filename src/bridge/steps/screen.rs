use crate::bridge::host::LifecycleContext;
use crate::bridge::report::{SkipReason, StepOutcome};
use crate::bridge::sdk::SessionSdk;
use crate::bridge::state::SessionState;
use crate::bridge::steps::identity::ResolvedIdentity;
use crate::logger::Logger;

/// Re-identifies the session whenever the resolved screen name changes.
pub(crate) fn run(
    sdk: &dyn SessionSdk,
    state: &mut SessionState,
    context: &LifecycleContext,
    logger: &Logger,
) -> StepOutcome {
    if !state.is_initialized() {
        return StepOutcome::Skipped(SkipReason::NotInitialized);
    }
    let Some(screen_name) = context.screen_name() else {
        return StepOutcome::Skipped(SkipReason::NothingConfigured);
    };
    if state.last_screen_name.as_deref() == Some(screen_name.as_str()) {
        return StepOutcome::Skipped(SkipReason::Unchanged);
    }

    logger.debug(format!(
        "Screen changed from {:?} to `{screen_name}`",
        state.last_screen_name
    ));
    let identity = ResolvedIdentity::resolve(context).with_screen_name(screen_name.clone());
    match identity.send(sdk) {
        Ok(()) => {
            state.last_screen_name = Some(screen_name);
            StepOutcome::Applied
        }
        Err(err) => StepOutcome::Failed(err),
    }
}
