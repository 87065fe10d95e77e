use crate::bridge::config::TriggerToken;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SdkStatus {
    #[default]
    NotStarted,
    Initialized,
    Error,
}

impl SdkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SdkStatus::NotStarted => "not-started",
            SdkStatus::Initialized => "initialized",
            SdkStatus::Error => "error",
        }
    }
}

/// Mutable runtime state owned by one bridge instance.
///
/// Nothing here is ever reset: the latches stay set and the recorded values persist across
/// `destroy`, for as long as the instance lives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub(crate) status: SdkStatus,
    pub(crate) project_id: Option<String>,
    pub(crate) failed_project_id: Option<String>,
    pub(crate) applied_consent: Option<bool>,
    pub(crate) metadata_sent: bool,
    pub(crate) session_tags_applied: bool,
    pub(crate) last_screen_name: Option<String>,
    pub(crate) last_trigger_token: Option<TriggerToken>,
}

impl SessionState {
    pub fn status(&self) -> SdkStatus {
        self.status
    }

    pub fn is_initialized(&self) -> bool {
        self.status == SdkStatus::Initialized
    }

    /// Project identifier of the last successful bootstrap.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn applied_consent(&self) -> Option<bool> {
        self.applied_consent
    }

    pub fn metadata_sent(&self) -> bool {
        self.metadata_sent
    }

    pub fn session_tags_applied(&self) -> bool {
        self.session_tags_applied
    }

    pub fn last_screen_name(&self) -> Option<&str> {
        self.last_screen_name.as_deref()
    }

    pub fn last_trigger_token(&self) -> Option<&TriggerToken> {
        self.last_trigger_token.as_ref()
    }

    pub(crate) fn mark_initialized(&mut self, project_id: &str) {
        self.status = SdkStatus::Initialized;
        self.project_id = Some(project_id.to_string());
        self.failed_project_id = None;
    }

    pub(crate) fn mark_failed(&mut self, project_id: &str) {
        self.status = SdkStatus::Error;
        self.failed_project_id = Some(project_id.to_string());
    }
}
