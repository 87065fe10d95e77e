use crate::bridge::report::{SkipReason, StepOutcome};
use crate::bridge::sdk::SessionSdk;
use crate::bridge::state::{SdkStatus, SessionState};
use crate::logger::Logger;

/// Starts the SDK session for `project_id` unless it is already running for that project or a
/// previous attempt for the same project failed.
pub(crate) fn run(
    sdk: &dyn SessionSdk,
    state: &mut SessionState,
    project_id: Option<&str>,
    consent: bool,
    logger: &Logger,
) -> StepOutcome {
    let Some(project_id) = project_id else {
        logger.debug("No project id configured; tracking stays off");
        return StepOutcome::Skipped(SkipReason::MissingProjectId);
    };

    match state.status {
        SdkStatus::Initialized if state.project_id.as_deref() == Some(project_id) => {
            return StepOutcome::Skipped(SkipReason::AlreadyInitialized);
        }
        SdkStatus::Error if state.failed_project_id.as_deref() == Some(project_id) => {
            return StepOutcome::Skipped(SkipReason::PreviousInitFailed);
        }
        _ => {}
    }

    logger.debug(format!("Initializing session SDK for project `{project_id}`"));
    if let Err(err) = sdk.init(project_id) {
        state.mark_failed(project_id);
        return StepOutcome::Failed(err);
    }
    state.mark_initialized(project_id);

    match sdk.consent(consent) {
        Ok(()) => state.applied_consent = Some(consent),
        Err(err) => {
            state.applied_consent = None;
            logger.warn(format!("Failed to apply consent after initialization: {err}"));
        }
    }
    logger.debug(format!(
        "Session SDK initialized for project `{project_id}` with consent {consent}"
    ));
    StepOutcome::Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::sdk::{RecordingSdk, SdkCall, SdkPrimitive};
    use crate::bridge::steps::test_support::quiet_logger;

    #[test]
    fn missing_project_id_is_a_no_op() {
        let sdk = RecordingSdk::new();
        let mut state = SessionState::default();
        let outcome = run(&sdk, &mut state, None, true, &quiet_logger());
        assert_eq!(outcome, StepOutcome::Skipped(SkipReason::MissingProjectId));
        assert!(sdk.calls().is_empty());
        assert_eq!(state.status(), SdkStatus::NotStarted);
    }

    #[test]
    fn first_run_initializes_and_pushes_consent() {
        let sdk = RecordingSdk::new();
        let mut state = SessionState::default();
        let outcome = run(&sdk, &mut state, Some("p1"), true, &quiet_logger());

        assert_eq!(outcome, StepOutcome::Applied);
        assert_eq!(
            sdk.calls(),
            vec![SdkCall::Init("p1".into()), SdkCall::Consent(true)]
        );
        assert_eq!(state.status(), SdkStatus::Initialized);
        assert_eq!(state.project_id(), Some("p1"));
        assert_eq!(state.applied_consent(), Some(true));
    }

    #[test]
    fn same_project_is_not_reinitialized() {
        let sdk = RecordingSdk::new();
        let mut state = SessionState::default();
        let logger = quiet_logger();
        run(&sdk, &mut state, Some("p1"), true, &logger);
        let outcome = run(&sdk, &mut state, Some("p1"), true, &logger);

        assert_eq!(outcome, StepOutcome::Skipped(SkipReason::AlreadyInitialized));
        assert_eq!(sdk.init_calls().len(), 1);
    }

    #[test]
    fn new_project_reinitializes() {
        let sdk = RecordingSdk::new();
        let mut state = SessionState::default();
        let logger = quiet_logger();
        run(&sdk, &mut state, Some("p1"), true, &logger);
        let outcome = run(&sdk, &mut state, Some("p2"), true, &logger);

        assert_eq!(outcome, StepOutcome::Applied);
        assert_eq!(sdk.init_calls(), vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(state.project_id(), Some("p2"));
    }

    #[test]
    fn failure_is_terminal_for_the_same_project() {
        let sdk = RecordingSdk::new();
        sdk.set_failing(SdkPrimitive::Init, true);
        let mut state = SessionState::default();
        let logger = quiet_logger();

        let outcome = run(&sdk, &mut state, Some("p1"), true, &logger);
        assert!(matches!(outcome, StepOutcome::Failed(_)));
        assert_eq!(state.status(), SdkStatus::Error);
        assert_eq!(sdk.consent_calls(), Vec::<bool>::new());

        sdk.set_failing(SdkPrimitive::Init, false);
        let outcome = run(&sdk, &mut state, Some("p1"), true, &logger);
        assert_eq!(outcome, StepOutcome::Skipped(SkipReason::PreviousInitFailed));
        assert_eq!(sdk.init_calls().len(), 1);

        let outcome = run(&sdk, &mut state, Some("p2"), true, &logger);
        assert_eq!(outcome, StepOutcome::Applied);
        assert_eq!(state.status(), SdkStatus::Initialized);
    }

    #[test]
    fn failed_consent_push_leaves_consent_unapplied() {
        let sdk = RecordingSdk::new();
        sdk.set_failing(SdkPrimitive::Consent, true);
        let mut state = SessionState::default();

        let outcome = run(&sdk, &mut state, Some("p1"), true, &quiet_logger());
        assert_eq!(outcome, StepOutcome::Applied);
        assert_eq!(state.status(), SdkStatus::Initialized);
        assert_eq!(state.applied_consent(), None);
        assert_eq!(
            sdk.calls(),
            vec![SdkCall::Init("p1".into()), SdkCall::Consent(true)]
        );
    }
}
