pub(crate) const BRIDGE_LOGGER_NAME: &str = "SessionBridge";

pub(crate) const TAG_APP_NAME: &str = "appName";
pub(crate) const TAG_ENVIRONMENT: &str = "environment";
pub(crate) const TAG_USER_EMAIL: &str = "userEmail";

/// Hostname fragments mapped to environment labels, checked in order.
pub(crate) const ENVIRONMENT_HINTS: &[(&str, &str)] = &[
    ("dev", "DEV"),
    ("test", "TEST"),
    ("uat", "TEST"),
    ("prod", "PROD"),
];
