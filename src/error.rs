//! Error types for the A-Parser SDK

use std::time::Duration;
use thiserror::Error;

use crate::protocol::TaskUid;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Main error type for the SDK
///
/// Every failure the client can raise is one of these variants, so callers
/// can match a single kind or bubble the whole enum up with `?`.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Network failure or an HTTP status the API should not return
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with `success != 1`, or with data of the wrong shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Task stayed in an active state longer than the caller allowed
    #[error("Task {task_uid} timed out after {timeout:?}")]
    Timeout { task_uid: TaskUid, timeout: Duration },

    /// Task reached a terminal status other than `completed`
    #[error("Task {task_uid} finished with status '{status}'")]
    TaskFailed { task_uid: TaskUid, status: String },

    /// Payload rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SdkError {
    pub fn is_transport(&self) -> bool {
        matches!(self, SdkError::Transport(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, SdkError::Protocol(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SdkError::Timeout { .. })
    }

    pub fn is_task_failed(&self) -> bool {
        matches!(self, SdkError::TaskFailed { .. })
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        SdkError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Protocol(format!("JSON error: {}", e))
    }
}
