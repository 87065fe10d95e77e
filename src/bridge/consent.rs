//! Pure predicates deciding whether tracking may happen in the current cycle.

use crate::bridge::config::BridgeConfig;
use crate::bridge::report::GateDecision;

#[derive(Clone, Copy, Debug)]
pub struct ConsentGate<'a> {
    config: &'a BridgeConfig,
}

impl<'a> ConsentGate<'a> {
    pub fn new(config: &'a BridgeConfig) -> Self {
        Self { config }
    }

    /// True unless the host explicitly disabled the component.
    pub fn is_enabled(&self) -> bool {
        !self.config.is_disabled()
    }

    /// True unless the host explicitly withheld consent.
    pub fn is_tracking_allowed(&self) -> bool {
        self.config.is_tracking_allowed()
    }

    pub fn decision(&self) -> GateDecision {
        if !self.is_enabled() {
            GateDecision::Disabled
        } else if !self.is_tracking_allowed() {
            GateDecision::TrackingNotAllowed
        } else {
            GateDecision::Open
        }
    }
}
