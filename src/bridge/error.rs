use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BridgeErrorCode {
    InvalidArgument,
    InvalidJson,
    SdkFailure,
    Unsupported,
}

impl BridgeErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeErrorCode::InvalidArgument => "bridge/invalid-argument",
            BridgeErrorCode::InvalidJson => "bridge/invalid-json",
            BridgeErrorCode::SdkFailure => "bridge/sdk-failure",
            BridgeErrorCode::Unsupported => "bridge/unsupported",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeError {
    pub code: BridgeErrorCode,
    message: String,
}

impl BridgeError {
    pub fn new(code: BridgeErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for BridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for BridgeError {}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        invalid_json(err.to_string())
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

pub fn invalid_argument(message: impl Into<String>) -> BridgeError {
    BridgeError::new(BridgeErrorCode::InvalidArgument, message)
}

pub fn invalid_json(message: impl Into<String>) -> BridgeError {
    BridgeError::new(BridgeErrorCode::InvalidJson, message)
}

pub fn sdk_failure(message: impl Into<String>) -> BridgeError {
    BridgeError::new(BridgeErrorCode::SdkFailure, message)
}

pub fn unsupported(message: impl Into<String>) -> BridgeError {
    BridgeError::new(BridgeErrorCode::Unsupported, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code() {
        let err = sdk_failure("init rejected");
        assert_eq!(err.to_string(), "init rejected (bridge/sdk-failure)");
        assert_eq!(err.message(), "init rejected");
    }

    #[test]
    fn serde_errors_map_to_invalid_json() {
        let err: BridgeError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.code, BridgeErrorCode::InvalidJson);
    }
}
