use std::sync::Arc;

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use web_sys::HtmlDivElement;

use crate::bridge::error::BridgeResult;
use crate::bridge::{BridgeConfig, HostUser, LifecycleContext, SessionBridge};
use crate::platform::browser::{current_host, js_error, ClaritySdk};

/// JavaScript-facing component wrapping a [`SessionBridge`] backed by [`ClaritySdk`].
///
/// `parameters` is a plain object of raw parameter values using the camelCase names of
/// [`BridgeConfig`]; `user` is `{ userId, userName }` from the host's user settings.
#[wasm_bindgen]
pub struct SessionBridgeControl {
    bridge: SessionBridge,
}

impl Default for SessionBridgeControl {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SessionBridgeControl {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SessionBridgeControl {
        Self {
            bridge: SessionBridge::new(Arc::new(ClaritySdk::new())),
        }
    }

    /// The container is unused: the component renders nothing.
    pub fn init(&mut self, parameters: JsValue, user: JsValue, _container: HtmlDivElement) {
        match lifecycle_context(&parameters, &user) {
            Ok(context) => {
                self.bridge.init(&context);
            }
            Err(err) => self.bridge.logger().error(format!("init skipped: {err}")),
        }
    }

    #[wasm_bindgen(js_name = updateView)]
    pub fn update_view(&mut self, parameters: JsValue, user: JsValue) {
        match lifecycle_context(&parameters, &user) {
            Ok(context) => {
                self.bridge.update_view(&context);
            }
            Err(err) => self
                .bridge
                .logger()
                .error(format!("updateView skipped: {err}")),
        }
    }

    #[wasm_bindgen(js_name = getOutputs)]
    pub fn get_outputs(&self) -> JsValue {
        js_sys::Object::new().into()
    }

    pub fn destroy(&mut self) {
        self.bridge.destroy();
    }
}

fn decode<T>(value: &JsValue) -> BridgeResult<T>
where
    T: DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    let serialized = String::from(js_sys::JSON::stringify(value).map_err(js_error)?);
    Ok(serde_json::from_str(&serialized)?)
}

fn lifecycle_context(parameters: &JsValue, user: &JsValue) -> BridgeResult<LifecycleContext> {
    let parameters: BridgeConfig = decode(parameters)?;
    let user: HostUser = decode(user)?;
    Ok(LifecycleContext::new(parameters, current_host(user)?))
}
