use serde::{Deserialize, Serialize};

use crate::forum::service::ForumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Success,
    Error,
}

/// JSON envelope wrapped around every API answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 200,
            message: message.into(),
            success: true,
            kind: ResponseKind::Success,
            data: Some(data),
        }
    }

    pub fn from_error(error: &ForumError) -> Self {
        let status = error.status();
        // Storage failures are logged, not echoed to clients.
        let message = if status >= 500 {
            log::error!("request failed: {error}");
            "Internal server error".to_string()
        } else {
            error.to_string()
        };
        Self {
            status,
            message,
            success: false,
            kind: ResponseKind::Error,
            data: None,
        }
    }
}

impl<T> From<Result<T, ForumError>> for ApiResponse<T> {
    fn from(result: Result<T, ForumError>) -> Self {
        match result {
            Ok(data) => Self::ok("OK", data),
            Err(error) => Self::from_error(&error),
        }
    }
}
