//! Per-cycle outcome records returned by the lifecycle entry points.

use std::fmt;

use crate::bridge::error::BridgeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Consent,
    Bootstrap,
    Identity,
    SessionTags,
    Screen,
    Event,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Consent => "consent",
            Step::Bootstrap => "bootstrap",
            Step::Identity => "identity",
            Step::SessionTags => "session-tags",
            Step::Screen => "screen",
            Step::Event => "event",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Open,
    Disabled,
    TrackingNotAllowed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    MissingProjectId,
    AlreadyInitialized,
    PreviousInitFailed,
    NotInitialized,
    AlreadyApplied,
    NothingConfigured,
    Unchanged,
    MissingEventName,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::MissingProjectId => "no project id configured",
            SkipReason::AlreadyInitialized => "already initialized for this project",
            SkipReason::PreviousInitFailed => "initialization already failed for this project",
            SkipReason::NotInitialized => "session SDK not initialized",
            SkipReason::AlreadyApplied => "already applied",
            SkipReason::NothingConfigured => "nothing configured",
            SkipReason::Unchanged => "unchanged since last cycle",
            SkipReason::MissingEventName => "no event name configured",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Skipped(SkipReason),
    Failed(BridgeError),
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Applied)
    }
}

/// What happened during one `init` or `update_view` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    gate: GateDecision,
    steps: Vec<(Step, StepOutcome)>,
}

impl CycleReport {
    pub(crate) fn new(gate: GateDecision) -> Self {
        Self {
            gate,
            steps: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push((step, outcome));
    }

    pub fn gate(&self) -> GateDecision {
        self.gate
    }

    pub fn steps(&self) -> &[(Step, StepOutcome)] {
        &self.steps
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(candidate, _)| *candidate == step)
            .map(|(_, outcome)| outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = (Step, &BridgeError)> {
        self.steps.iter().filter_map(|(step, outcome)| match outcome {
            StepOutcome::Failed(err) => Some((*step, err)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::error::sdk_failure;

    #[test]
    fn outcome_lookup_and_failures() {
        let mut report = CycleReport::new(GateDecision::Open);
        report.record(Step::Bootstrap, StepOutcome::Applied);
        report.record(Step::Event, StepOutcome::Failed(sdk_failure("boom")));

        assert_eq!(report.gate(), GateDecision::Open);
        assert!(report.outcome(Step::Bootstrap).unwrap().is_applied());
        assert_eq!(report.outcome(Step::Screen), None);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Step::Event);
    }
}
