//! Host-provided context: the parameter bag plus what the page knows about the user and location.

use serde::Deserialize;
use url::Url;

use crate::bridge::config::BridgeConfig;
use crate::bridge::constants::ENVIRONMENT_HINTS;
use crate::bridge::error::{invalid_argument, BridgeResult};

/// Signed-in user as reported by the host platform.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostUser {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

/// Snapshot of the hosting page taken at the start of a lifecycle callback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostSnapshot {
    location: Option<Url>,
    user: HostUser,
}

impl HostSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `href` as the current page location.
    pub fn with_location(mut self, href: &str) -> BridgeResult<Self> {
        let url = Url::parse(href)
            .map_err(|err| invalid_argument(format!("Invalid page location `{href}`: {err}")))?;
        self.location = Some(url);
        Ok(self)
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.location = Some(url);
        self
    }

    pub fn with_user(mut self, user: HostUser) -> Self {
        self.user = user;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user.user_id = Some(user_id.into());
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user.user_name = Some(user_name.into());
        self
    }

    pub fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user
            .user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user
            .user_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Path followed by the `#fragment`, mirroring `location.pathname + location.hash`.
    pub fn screen_path(&self) -> Option<String> {
        let url = self.location.as_ref()?;
        let mut screen = url.path().to_string();
        if let Some(fragment) = url.fragment().filter(|fragment| !fragment.is_empty()) {
            screen.push('#');
            screen.push_str(fragment);
        }
        if screen.is_empty() {
            None
        } else {
            Some(screen)
        }
    }

    pub fn last_path_segment(&self) -> Option<&str> {
        self.location
            .as_ref()?
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .last()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.location.as_ref()?.host_str()
    }

    pub fn inferred_environment(&self) -> Option<&'static str> {
        self.hostname().and_then(infer_environment)
    }
}

/// Maps a hostname to an environment label by substring, e.g. `contoso-uat.example.com` to `TEST`.
pub fn infer_environment(hostname: &str) -> Option<&'static str> {
    let hostname = hostname.to_ascii_lowercase();
    ENVIRONMENT_HINTS
        .iter()
        .find(|(hint, _)| hostname.contains(hint))
        .map(|(_, label)| *label)
}

/// Everything one lifecycle callback receives from the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LifecycleContext {
    pub parameters: BridgeConfig,
    pub host: HostSnapshot,
}

impl LifecycleContext {
    pub fn new(parameters: BridgeConfig, host: HostSnapshot) -> Self {
        Self { parameters, host }
    }

    /// Explicit screen name, else the page path and fragment.
    pub fn screen_name(&self) -> Option<String> {
        self.parameters
            .screen_name()
            .map(str::to_string)
            .or_else(|| self.host.screen_path())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.parameters.user_id().or_else(|| self.host.user_id())
    }

    pub fn user_name(&self) -> Option<&str> {
        self.parameters.user_name().or_else(|| self.host.user_name())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.parameters.session_id()
    }

    pub fn app_name(&self) -> Option<&str> {
        self.parameters
            .app_name()
            .or_else(|| self.host.last_path_segment())
    }

    pub fn environment(&self) -> Option<&str> {
        self.parameters
            .environment()
            .or_else(|| self.host.inferred_environment())
    }

    /// Email has no host fallback.
    pub fn user_email(&self) -> Option<&str> {
        self.parameters.user_email()
    }
}
