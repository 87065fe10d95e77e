use crate::bridge::constants::{TAG_APP_NAME, TAG_ENVIRONMENT, TAG_USER_EMAIL};
use crate::bridge::error::{BridgeError, BridgeResult};
use crate::bridge::host::LifecycleContext;
use crate::bridge::report::{SkipReason, StepOutcome};
use crate::bridge::sdk::SessionSdk;
use crate::bridge::state::SessionState;
use crate::logger::Logger;

/// Identity values passed to the SDK's `identify` primitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ResolvedIdentity {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub screen_name: Option<String>,
    pub user_name: Option<String>,
}

impl ResolvedIdentity {
    pub fn resolve(context: &LifecycleContext) -> Self {
        Self {
            user_id: context.user_id().map(str::to_string),
            session_id: context.session_id().map(str::to_string),
            screen_name: context.screen_name(),
            user_name: context.user_name().map(str::to_string),
        }
    }

    pub fn with_screen_name(mut self, screen_name: String) -> Self {
        self.screen_name = Some(screen_name);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.session_id.is_none()
            && self.screen_name.is_none()
            && self.user_name.is_none()
    }

    /// A missing user id is sent as an empty string; the other values stay absent.
    pub fn send(&self, sdk: &dyn SessionSdk) -> BridgeResult<()> {
        sdk.identify(
            self.user_id.as_deref().unwrap_or_default(),
            self.session_id.as_deref(),
            self.screen_name.as_deref(),
            self.user_name.as_deref(),
        )
    }
}

/// Sends identity and static metadata tags once for the lifetime of the bridge.
pub(crate) fn run(
    sdk: &dyn SessionSdk,
    state: &mut SessionState,
    context: &LifecycleContext,
    logger: &Logger,
) -> StepOutcome {
    if !state.is_initialized() {
        return StepOutcome::Skipped(SkipReason::NotInitialized);
    }
    if state.metadata_sent {
        return StepOutcome::Skipped(SkipReason::AlreadyApplied);
    }

    let mut first_error: Option<BridgeError> = None;
    let mut note = |err: BridgeError| {
        logger.warn(format!("Failed to send session metadata: {err}"));
        first_error.get_or_insert(err);
    };

    let identity = ResolvedIdentity::resolve(context);
    if identity.is_empty() {
        logger.debug("No identity values resolved; skipping identify");
    } else {
        logger.debug(format!("Identifying session: {identity:?}"));
        match identity.send(sdk) {
            Ok(()) => state.last_screen_name = identity.screen_name.clone(),
            Err(err) => note(err),
        }
    }

    let tags = [
        (TAG_APP_NAME, context.app_name()),
        (TAG_ENVIRONMENT, context.environment()),
        (TAG_USER_EMAIL, context.user_email()),
    ];
    for (key, value) in tags {
        let Some(value) = value else {
            continue;
        };
        logger.debug(format!("Tagging session {key}={value}"));
        if let Err(err) = sdk.set_tag(key, value) {
            note(err);
        }
    }

    state.metadata_sent = true;
    match first_error {
        Some(err) => StepOutcome::Failed(err),
        None => StepOutcome::Applied,
    }
}
