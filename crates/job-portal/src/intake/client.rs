use std::future::Future;

use axum::http::StatusCode;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use super::transport::{FormPart, OutboundRequest, RequestBody};

pub static USER_AGENT: &str = concat!("job-portal/", env!("CARGO_PKG_VERSION"));

/// What came back from the webhook. `body` is `None` when it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Option<Bytes>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// DNS, connect, TLS or CORS-style failures: nothing was received.
    #[error("no response from webhook: {0}")]
    Unreachable(String),
    #[error("request could not be prepared: {0}")]
    Request(String),
}

/// Outbound hop for a single submission. One call, no retries.
pub trait WebhookTransport: Send + Sync + 'static {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl WebhookTransport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let OutboundRequest {
            url,
            method,
            headers,
            body,
        } = request;

        let builder = self.client.request(method, url.clone()).headers(headers);
        let builder = match body {
            RequestBody::Json(value) => {
                let bytes = serde_json::to_vec(&value)
                    .map_err(|err| TransportError::Request(err.to_string()))?;
                builder.body(bytes)
            }
            RequestBody::Multipart(parts) => builder.multipart(into_form(parts)?),
        };

        let response = builder.send().await.map_err(|err| {
            if err.is_builder() {
                TransportError::Request(err.to_string())
            } else {
                TransportError::Unreachable(error_chain(&err))
            }
        })?;

        let status = response.status();
        tracing::info!(%url, status = status.as_u16(), "webhook responded");

        let body = match response.bytes().await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::debug!(%url, error = %err, "webhook response body unreadable");
                None
            }
        };

        Ok(TransportResponse { status, body })
    }
}

fn into_form(parts: Vec<FormPart>) -> Result<Form, TransportError> {
    parts.into_iter().try_fold(Form::new(), |form, part| match part {
        FormPart::Text { name, value } => Ok(form.text(name, value)),
        FormPart::File {
            name,
            file_name,
            mime_type,
            content,
        } => {
            let file = Part::bytes(content.to_vec())
                .file_name(file_name)
                .mime_str(&mime_type)
                .map_err(|err| TransportError::Request(err.to_string()))?;
            Ok(form.part(name, file))
        }
    })
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
