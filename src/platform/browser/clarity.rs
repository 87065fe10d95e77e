//! Session SDK adapter for the browser. Commands go through the SDK's global queue function,
//! which is stubbed before the tag script loads so early calls are buffered by the page.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlScriptElement, Window};

use crate::bridge::error::{sdk_failure, BridgeResult};
use crate::bridge::SessionSdk;
use crate::platform::browser::{js_error, window};

const DEFAULT_GLOBAL_NAME: &str = "clarity";
const DEFAULT_TAG_ORIGIN: &str = "https://www.clarity.ms/tag/";

#[derive(Clone, Debug)]
pub struct ClaritySdk {
    global_name: String,
    tag_origin: String,
}

impl Default for ClaritySdk {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaritySdk {
    pub fn new() -> Self {
        Self {
            global_name: DEFAULT_GLOBAL_NAME.to_string(),
            tag_origin: DEFAULT_TAG_ORIGIN.to_string(),
        }
    }

    /// Name of the global queue function on `window`.
    pub fn with_global_name(mut self, global_name: impl Into<String>) -> Self {
        self.global_name = global_name.into();
        self
    }

    /// Prefix the project id is appended to when building the tag script URL.
    pub fn with_tag_origin(mut self, tag_origin: impl Into<String>) -> Self {
        self.tag_origin = tag_origin.into();
        self
    }

    fn script_id(&self, project_id: &str) -> String {
        format!("{}-tag-{project_id}", self.global_name)
    }

    fn queue_function(&self, window: &Window) -> BridgeResult<Function> {
        let key = JsValue::from_str(&self.global_name);
        let existing = Reflect::get(window, &key).map_err(js_error)?;
        if let Some(function) = existing.dyn_ref::<Function>() {
            return Ok(function.clone());
        }

        let name = &self.global_name;
        let stub = Function::new_no_args(&format!(
            "(window[{name:?}].q = window[{name:?}].q || []).push(arguments);"
        ));
        Reflect::set(window, &key, &stub).map_err(js_error)?;
        Ok(stub)
    }

    fn command(&self, args: &[JsValue]) -> BridgeResult<()> {
        let window = window()?;
        let queue = self.queue_function(&window)?;
        let arguments = args.iter().collect::<Array>();
        queue
            .apply(&JsValue::NULL, &arguments)
            .map(|_| ())
            .map_err(js_error)
    }

    fn inject_tag(&self, document: &Document, project_id: &str) -> BridgeResult<()> {
        let script_id = self.script_id(project_id);
        if document.get_element_by_id(&script_id).is_some() {
            return Ok(());
        }

        let script = document
            .create_element("script")
            .map_err(js_error)?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| sdk_failure("Script element has wrong type"))?;
        let encoded = String::from(js_sys::encode_uri_component(project_id));
        script.set_id(&script_id);
        script.set_async(true);
        script.set_src(&format!("{}{encoded}", self.tag_origin));

        if let Some(head) = document.head() {
            head.append_child(&script).map_err(js_error)?;
        } else if let Some(body) = document.body() {
            body.append_child(&script).map_err(js_error)?;
        } else {
            return Err(sdk_failure("No <head> or <body> element to attach the tag script"));
        }
        Ok(())
    }
}

impl SessionSdk for ClaritySdk {
    fn init(&self, project_id: &str) -> BridgeResult<()> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| sdk_failure("Document not available"))?;
        self.queue_function(&window)?;
        self.inject_tag(&document, project_id)
    }

    fn consent(&self, allowed: bool) -> BridgeResult<()> {
        self.command(&[JsValue::from_str("consent"), JsValue::from_bool(allowed)])
    }

    fn identify(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        screen_name: Option<&str>,
        user_name: Option<&str>,
    ) -> BridgeResult<()> {
        let optional = |value: Option<&str>| value.map(JsValue::from_str).unwrap_or(JsValue::UNDEFINED);
        self.command(&[
            JsValue::from_str("identify"),
            JsValue::from_str(user_id),
            optional(session_id),
            optional(screen_name),
            optional(user_name),
        ])
    }

    fn set_tag(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.command(&[
            JsValue::from_str("set"),
            JsValue::from_str(key),
            JsValue::from_str(value),
        ])
    }

    fn event(&self, name: &str) -> BridgeResult<()> {
        self.command(&[JsValue::from_str("event"), JsValue::from_str(name)])
    }
}
