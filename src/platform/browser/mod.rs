//! Browser bindings, available on `wasm32` with the `wasm-web` feature.

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod clarity;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod control;

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use clarity::ClaritySdk;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use control::SessionBridgeControl;

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod wasm {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::Window;

    use crate::bridge::error::{sdk_failure, unsupported, BridgeError, BridgeResult};
    use crate::bridge::{HostSnapshot, HostUser};

    pub(crate) fn window() -> BridgeResult<Window> {
        web_sys::window().ok_or_else(|| unsupported("Global window object not available"))
    }

    pub(crate) fn js_error(value: JsValue) -> BridgeError {
        if let Some(error) = value.dyn_ref::<js_sys::Error>() {
            return sdk_failure(String::from(error.message()));
        }
        match value.as_string() {
            Some(message) => sdk_failure(message),
            None => sdk_failure(format!("{value:?}")),
        }
    }

    /// Snapshot of the current page location plus the host-reported user.
    pub fn current_host(user: HostUser) -> BridgeResult<HostSnapshot> {
        let href = window()?.location().href().map_err(js_error)?;
        HostSnapshot::new().with_user(user).with_location(&href)
    }
}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use wasm::current_host;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub(crate) use wasm::{js_error, window};
