use axum::http::StatusCode;
use bytes::Bytes;
use serde::Serialize;

use super::client::{TransportError, TransportResponse};

pub const SUCCESS_MESSAGE: &str = "Submission successful!";
pub const SIMULATED_SUCCESS_MESSAGE: &str = "Submission successful (simulated)!";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: unable to reach the submission server. \
This is usually a connectivity or cross-origin (CORS) configuration issue.";
const UNREADABLE_BODY: &str = "Could not read error response body.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Delivered,
    Simulated,
    HttpError,
    Unreachable,
    Unknown,
}

/// The only thing that crosses the submission boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip)]
    pub kind: OutcomeKind,
    #[serde(skip)]
    pub status: Option<u16>,
}

impl SubmissionResult {
    pub fn delivered(status: StatusCode) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            kind: OutcomeKind::Delivered,
            status: Some(status.as_u16()),
        }
    }

    pub fn simulated() -> Self {
        Self {
            success: true,
            message: SIMULATED_SUCCESS_MESSAGE.to_string(),
            kind: OutcomeKind::Simulated,
            status: None,
        }
    }

    pub fn http_error(status: StatusCode) -> Self {
        Self {
            success: false,
            message: user_message_for_status(status),
            kind: OutcomeKind::HttpError,
            status: Some(status.as_u16()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            success: false,
            message: NETWORK_ERROR_MESSAGE.to_string(),
            kind: OutcomeKind::Unreachable,
            status: None,
        }
    }

    /// Anything that stopped the request before it was sent.
    pub fn unknown(reason: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            message: format!("Submission failed: {reason}"),
            kind: OutcomeKind::Unknown,
            status: None,
        }
    }
}

pub fn interpret(outcome: Result<TransportResponse, TransportError>) -> SubmissionResult {
    match outcome {
        Ok(response) => interpret_response(&response),
        Err(TransportError::Unreachable(detail)) => {
            tracing::error!(
                %detail,
                "webhook unreachable; check connectivity, CORS policy and mixed http/https content"
            );
            SubmissionResult::unreachable()
        }
        Err(TransportError::Request(reason)) => {
            tracing::error!(%reason, "submission failed before reaching the webhook");
            SubmissionResult::unknown(reason)
        }
    }
}

/// Body content never reaches the user; it is only logged.
pub fn interpret_response(response: &TransportResponse) -> SubmissionResult {
    let status = response.status;

    if status.is_success() {
        match response
            .body
            .as_ref()
            .and_then(|body| serde_json::from_slice::<serde_json::Value>(body).ok())
        {
            Some(payload) => tracing::debug!(%payload, "webhook accepted submission"),
            None => tracing::debug!("webhook accepted submission without a JSON body"),
        }
        return SubmissionResult::delivered(status);
    }

    let detail = error_detail(response.body.as_ref());
    tracing::error!(
        status = status.as_u16(),
        %detail,
        "webhook rejected submission"
    );
    SubmissionResult::http_error(status)
}

/// Fixed user-facing copy per status class.
pub fn user_message_for_status(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "There was a problem with your submission. Please double-check the form.".to_string(),
        401 | 403 => "Authentication failed. Please verify your credentials.".to_string(),
        404 => "The submission service could not be found. Please contact support.".to_string(),
        429 => "You are being rate limited. Please wait a moment and try again.".to_string(),
        500..=599 => "The server is currently unavailable. Please try again later.".to_string(),
        code => format!("An unexpected error occurred (status {code}). Please try again."),
    }
}

/// `message`, then `error`, then the JSON itself, then raw text.
pub fn error_detail(body: Option<&Bytes>) -> String {
    let Some(body) = body else {
        return UNREADABLE_BODY.to_string();
    };

    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        let field = ["message", "error"].into_iter().find_map(|key| {
            json.get(key).and_then(|value| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(text) => Some(text.clone()),
                other => Some(other.to_string()),
            })
        });
        return field.unwrap_or_else(|| json.to_string());
    }

    match std::str::from_utf8(body) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => UNREADABLE_BODY.to_string(),
    }
}
