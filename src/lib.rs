//! Lifecycle bridge that forwards a low-code host component's `init`/`updateView` callbacks to a
//! session-analytics SDK with consent gating and at-most-once side effects.
//!
//! The core lives in [`bridge`]; [`platform::browser`] holds the `wasm-web` bindings that drive
//! the SDK's global command queue in a real page.

pub mod bridge;
pub mod logger;
pub mod platform;
