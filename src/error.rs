//! Errors are `anyhow::Error` throughout, with one exception: a request that Salesforce refused
//! (typically an expired password) is raised as a `RefusedRequest` so that the caller can
//! recognize it with `downcast_ref` and tell somebody about it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// One entry of the error list that the Salesforce REST API returns in the body of a failed
/// request, e.g. `[{"message": "The users password has expired...", "errorCode": "INVALID_OPERATION_WITH_EXPIRED_PASSWORD"}]`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessage {
    pub message: String,
    #[serde(default)]
    pub error_code: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code: String::new(),
        }
    }
}

/// The record source refused a request (HTTP 403). This carries every message from the
/// response body.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RefusedRequest {
    url: String,
    status: u16,
    errors: Vec<ApiMessage>,
}

impl RefusedRequest {
    pub fn new(url: impl Into<String>, status: u16, errors: Vec<ApiMessage>) -> Self {
        Self {
            url: url.into(),
            status,
            errors,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn errors(&self) -> &[ApiMessage] {
        &self.errors
    }
}

impl Display for RefusedRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(
            f,
            "Request to {} was refused with status {}: {}",
            self.url,
            self.status,
            messages.join("; ")
        )
    }
}

impl std::error::Error for RefusedRequest {}
