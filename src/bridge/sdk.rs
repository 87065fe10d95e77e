use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::bridge::error::{sdk_failure, BridgeResult};

/// The five primitives the bridge drives on the wrapped session-analytics SDK.
///
/// Calls are fire-and-forget from the bridge's point of view. The `Result` only lets an adapter
/// report that the underlying SDK threw; the bridge logs the error and keeps going.
pub trait SessionSdk {
    /// Starts a new recording session for `project_id`.
    fn init(&self, project_id: &str) -> BridgeResult<()>;

    fn consent(&self, allowed: bool) -> BridgeResult<()>;

    fn identify(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        screen_name: Option<&str>,
        user_name: Option<&str>,
    ) -> BridgeResult<()>;

    fn set_tag(&self, key: &str, value: &str) -> BridgeResult<()>;

    fn event(&self, name: &str) -> BridgeResult<()>;
}

/// Names one [`SessionSdk`] primitive, used to make [`RecordingSdk`] fail selectively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SdkPrimitive {
    Init,
    Consent,
    Identify,
    SetTag,
    Event,
}

impl SdkPrimitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdkPrimitive::Init => "init",
            SdkPrimitive::Consent => "consent",
            SdkPrimitive::Identify => "identify",
            SdkPrimitive::SetTag => "setTag",
            SdkPrimitive::Event => "event",
        }
    }
}

/// One outbound call as observed by [`RecordingSdk`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SdkCall {
    Init(String),
    Consent(bool),
    Identify {
        user_id: String,
        session_id: Option<String>,
        screen_name: Option<String>,
        user_name: Option<String>,
    },
    SetTag {
        key: String,
        value: String,
    },
    Event(String),
}

/// In-memory SDK that records every call instead of talking to a page.
///
/// Clones share the same call log, so a test can hand one clone to the bridge and inspect the
/// other.
#[derive(Clone, Debug, Default)]
pub struct RecordingSdk {
    calls: Arc<Mutex<Vec<SdkCall>>>,
    failing: Arc<Mutex<BTreeSet<SdkPrimitive>>>,
}

impl RecordingSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent calls to `primitive` fail. Failing calls are still recorded.
    pub fn set_failing(&self, primitive: SdkPrimitive, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(primitive);
        } else {
            set.remove(&primitive);
        }
    }

    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn take_calls(&self) -> Vec<SdkCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    pub fn init_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SdkCall::Init(project_id) => Some(project_id),
                _ => None,
            })
            .collect()
    }

    pub fn consent_calls(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SdkCall::Consent(allowed) => Some(allowed),
                _ => None,
            })
            .collect()
    }

    pub fn identify_calls(&self) -> Vec<SdkCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SdkCall::Identify { .. }))
            .collect()
    }

    pub fn tags(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SdkCall::SetTag { key, value } => Some((key, value)),
                _ => None,
            })
            .collect()
    }

    pub fn events(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SdkCall::Event(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    fn record(&self, primitive: SdkPrimitive, call: SdkCall) -> BridgeResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&primitive) {
            return Err(sdk_failure(format!(
                "Session SDK threw from `{}`",
                primitive.as_str()
            )));
        }
        Ok(())
    }
}

impl SessionSdk for RecordingSdk {
    fn init(&self, project_id: &str) -> BridgeResult<()> {
        self.record(SdkPrimitive::Init, SdkCall::Init(project_id.to_string()))
    }

    fn consent(&self, allowed: bool) -> BridgeResult<()> {
        self.record(SdkPrimitive::Consent, SdkCall::Consent(allowed))
    }

    fn identify(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        screen_name: Option<&str>,
        user_name: Option<&str>,
    ) -> BridgeResult<()> {
        self.record(
            SdkPrimitive::Identify,
            SdkCall::Identify {
                user_id: user_id.to_string(),
                session_id: session_id.map(str::to_string),
                screen_name: screen_name.map(str::to_string),
                user_name: user_name.map(str::to_string),
            },
        )
    }

    fn set_tag(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.record(
            SdkPrimitive::SetTag,
            SdkCall::SetTag {
                key: key.to_string(),
                value: value.to_string(),
            },
        )
    }

    fn event(&self, name: &str) -> BridgeResult<()> {
        self.record(SdkPrimitive::Event, SdkCall::Event(name.to_string()))
    }
}
