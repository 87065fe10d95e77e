use std::fmt;
use std::sync::Arc;

use crate::bridge::config::BridgeConfig;
use crate::bridge::consent::ConsentGate;
use crate::bridge::constants::BRIDGE_LOGGER_NAME;
use crate::bridge::host::LifecycleContext;
use crate::bridge::report::{CycleReport, SkipReason, Step, StepOutcome};
use crate::bridge::sdk::SessionSdk;
use crate::bridge::state::SessionState;
use crate::bridge::steps::{bootstrap, event, identity, screen, tags};
use crate::logger::{LogLevel, Logger};

/// Host-facing outputs. The bridge is one-way, so this is always empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeOutputs;

/// Lifecycle controller that turns host callbacks into idempotent SDK calls.
///
/// The host calls [`init`](Self::init) once and [`update_view`](Self::update_view) on every
/// refresh. Each call runs the consent gate, mirrors consent changes, bootstraps the SDK when
/// needed and then runs the identity, session-tag, screen and event steps in that order. Errors
/// never leave the bridge: they are logged once per cycle and returned in the [`CycleReport`].
pub struct SessionBridge {
    sdk: Arc<dyn SessionSdk>,
    state: SessionState,
    logger: Logger,
}

impl fmt::Debug for SessionBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBridge")
            .field("state", &self.state)
            .field("logger", &self.logger)
            .finish()
    }
}

impl SessionBridge {
    pub fn new(sdk: Arc<dyn SessionSdk>) -> Self {
        Self::with_logger(sdk, Logger::new(BRIDGE_LOGGER_NAME))
    }

    pub fn with_logger(sdk: Arc<dyn SessionSdk>, logger: Logger) -> Self {
        Self {
            sdk,
            state: SessionState::default(),
            logger,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn init(&mut self, context: &LifecycleContext) -> CycleReport {
        self.apply_log_level(&context.parameters);
        self.logger.debug("init");
        self.run_cycle(context)
    }

    pub fn update_view(&mut self, context: &LifecycleContext) -> CycleReport {
        self.apply_log_level(&context.parameters);
        self.logger.debug("updateView");
        self.run_cycle(context)
    }

    pub fn outputs(&self) -> BridgeOutputs {
        BridgeOutputs
    }

    /// Leaves the session running: recording must outlive the component within the same page.
    pub fn destroy(&mut self) {
        self.logger
            .debug("destroy: keeping the session SDK running for the rest of the page");
    }

    fn apply_log_level(&self, parameters: &BridgeConfig) {
        let level = if parameters.is_debug() {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        };
        if let Err(err) = self.logger.set_log_level(level) {
            self.logger.error(err.to_string());
        }
    }

    fn run_cycle(&mut self, context: &LifecycleContext) -> CycleReport {
        let parameters = &context.parameters;
        for rejected in parameters.rejected_parameters() {
            self.logger.warn(format!("Ignoring unreadable parameter {rejected}"));
        }
        let gate = ConsentGate::new(parameters);
        let mut report = CycleReport::new(gate.decision());

        if !gate.is_enabled() {
            self.logger.debug("Component disabled; skipping all tracking");
            return report;
        }

        let allowed = gate.is_tracking_allowed();
        report.record(Step::Consent, self.sync_consent(allowed));
        if !allowed {
            self.logger
                .debug("Tracking not allowed; no further session calls this cycle");
            self.log_report(&report);
            return report;
        }

        let sdk = self.sdk.as_ref();
        let state = &mut self.state;
        let logger = &self.logger;
        let project_id = parameters.project_id();
        report.record(
            Step::Bootstrap,
            bootstrap::run(sdk, state, project_id, allowed, logger),
        );
        if project_id.is_none() {
            logger.debug("No project id configured; no further session calls this cycle");
            self.log_report(&report);
            return report;
        }
        report.record(Step::Identity, identity::run(sdk, state, context, logger));
        report.record(Step::SessionTags, tags::run(sdk, state, context, logger));
        report.record(Step::Screen, screen::run(sdk, state, context, logger));
        report.record(Step::Event, event::run(sdk, state, context, logger));

        self.log_report(&report);
        report
    }

    /// Pushes a consent change to an initialized SDK. Before initialization the value is applied
    /// by the bootstrap step instead.
    fn sync_consent(&mut self, allowed: bool) -> StepOutcome {
        if !self.state.is_initialized() {
            return StepOutcome::Skipped(SkipReason::NotInitialized);
        }
        if self.state.applied_consent == Some(allowed) {
            return StepOutcome::Skipped(SkipReason::Unchanged);
        }

        self.logger.debug(format!("Consent changed to {allowed}"));
        match self.sdk.consent(allowed) {
            Ok(()) => {
                self.state.applied_consent = Some(allowed);
                StepOutcome::Applied
            }
            Err(err) => StepOutcome::Failed(err),
        }
    }

    fn log_report(&self, report: &CycleReport) {
        for (step, outcome) in report.steps() {
            match outcome {
                StepOutcome::Applied => self.logger.debug(format!("{step}: applied")),
                StepOutcome::Skipped(reason) => self
                    .logger
                    .debug(format!("{step}: skipped ({})", reason.as_str())),
                StepOutcome::Failed(err) => self.logger.error(format!("{step} failed: {err}")),
            }
        }
        self.logger.debug(format!(
            "Cycle finished with SDK status {}",
            self.state.status().as_str()
        ));
    }
}
