//! Bridge between a low-code host's component lifecycle and a session-analytics SDK.
//!
//! [`SessionBridge`] owns the session state for one component instance. It bootstraps the SDK at
//! most once per project id, sends identity and session tags once, mirrors consent changes,
//! re-identifies on screen changes and forwards an event each time the trigger token changes.

mod config;
mod consent;
mod constants;
mod controller;
pub mod error;
mod host;
mod report;
mod sdk;
mod state;
mod steps;

pub use config::{BridgeConfig, TriggerToken};
pub use consent::ConsentGate;
pub use controller::{BridgeOutputs, SessionBridge};
pub use host::{infer_environment, HostSnapshot, HostUser, LifecycleContext};
pub use report::{CycleReport, GateDecision, SkipReason, Step, StepOutcome};
pub use sdk::{RecordingSdk, SdkCall, SdkPrimitive, SessionSdk};
pub use state::{SdkStatus, SessionState};
