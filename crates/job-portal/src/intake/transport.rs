//! Encoding negotiation for outbound submissions.
//!
//! A submission either travels as a plain JSON envelope `{type, data}` or, when an employee
//! attached a resume, through the file strategy chosen for the deployment. The builder is pure:
//! it produces an [`OutboundRequest`] that the transport turns into a wire request.

use std::fmt;
use std::str::FromStr;

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::Method;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

use super::domain::{Application, EmployeeApplication, FormKind, ResumeAttachment};

/// How a resume travels when one is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileEncoding {
    #[default]
    Multipart,
    Base64,
}

impl FileEncoding {
    pub const fn label(self) -> &'static str {
        match self {
            FileEncoding::Multipart => "multipart",
            FileEncoding::Base64 => "base64",
        }
    }
}

impl FromStr for FileEncoding {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "multipart" | "multipart/form-data" | "form-data" => Ok(FileEncoding::Multipart),
            "base64" | "json" => Ok(FileEncoding::Base64),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for FileEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared-secret header, sent verbatim (not a bearer scheme).
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub name: String,
    pub value: String,
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeader")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    pub url: Url,
    pub auth: Option<AuthHeader>,
}

impl WebhookTarget {
    pub fn new(url: Url) -> Self {
        Self { url, auth: None }
    }

    pub fn with_auth(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth = Some(AuthHeader {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// Encoding decided for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStrategy {
    Json,
    MultipartWithFile,
    JsonWithBase64File,
}

pub fn select_strategy(application: &Application, encoding: FileEncoding) -> TransportStrategy {
    match (application.resume(), encoding) {
        (None, _) => TransportStrategy::Json,
        (Some(_), FileEncoding::Multipart) => TransportStrategy::MultipartWithFile,
        (Some(_), FileEncoding::Base64) => TransportStrategy::JsonWithBase64File,
    }
}

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        mime_type: String,
        content: Bytes,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("auth header name '{0}' is not a valid HTTP header name")]
    InvalidHeaderName(String),
    #[error("auth header value for '{0}' contains characters not allowed in HTTP headers")]
    InvalidHeaderValue(String),
}

/// Build the single POST for `application`.
pub fn build_request(
    application: &Application,
    target: &WebhookTarget,
    encoding: FileEncoding,
) -> Result<OutboundRequest, BuildError> {
    let strategy = select_strategy(application, encoding);
    let mut headers = HeaderMap::new();

    let body = match (strategy, application) {
        (TransportStrategy::MultipartWithFile, Application::Employee(employee)) => {
            RequestBody::Multipart(multipart_parts(employee))
        }
        (TransportStrategy::JsonWithBase64File, Application::Employee(employee)) => {
            headers.insert(CONTENT_TYPE, json_content_type());
            RequestBody::Json(serde_json::to_value(Envelope {
                kind: FormKind::Employee,
                data: EmbeddedEmployee::new(employee),
            })?)
        }
        (_, Application::Employee(employee)) => {
            headers.insert(CONTENT_TYPE, json_content_type());
            RequestBody::Json(serde_json::to_value(Envelope {
                kind: FormKind::Employee,
                data: employee,
            })?)
        }
        (_, Application::Company(company)) => {
            headers.insert(CONTENT_TYPE, json_content_type());
            RequestBody::Json(serde_json::to_value(Envelope {
                kind: FormKind::Company,
                data: company,
            })?)
        }
    };

    if let Some(auth) = &target.auth {
        let name = HeaderName::from_bytes(auth.name.as_bytes())
            .map_err(|_| BuildError::InvalidHeaderName(auth.name.clone()))?;
        let value = HeaderValue::from_str(&auth.value)
            .map_err(|_| BuildError::InvalidHeaderValue(auth.name.clone()))?;
        headers.insert(name, value);
    }

    tracing::debug!(
        kind = %application.kind(),
        ?strategy,
        url = %target.url,
        header_names = ?headers.keys().map(HeaderName::as_str).collect::<Vec<_>>(),
        "built outbound submission request"
    );

    Ok(OutboundRequest {
        url: target.url.clone(),
        method: Method::POST,
        headers,
        body,
    })
}

fn json_content_type() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// One text part per attribute, then the resume. No content type is set here; the
/// HTTP client writes the boundary.
fn multipart_parts(employee: &EmployeeApplication) -> Vec<FormPart> {
    let mut parts = vec![
        FormPart::Text {
            name: "type",
            value: FormKind::Employee.label().to_string(),
        },
        FormPart::Text {
            name: "fullName",
            value: employee.full_name.clone(),
        },
        FormPart::Text {
            name: "email",
            value: employee.email.clone(),
        },
        FormPart::Text {
            name: "phone",
            value: employee.phone.clone(),
        },
        FormPart::Text {
            name: "skillLevel",
            value: employee.skill_level.label().to_string(),
        },
    ];

    if let Some(resume) = &employee.resume {
        parts.push(FormPart::File {
            name: "resume",
            file_name: resume.file_name.clone(),
            mime_type: resume.mime_type.clone(),
            content: resume.content.clone(),
        });
    }

    parts
}

#[derive(Serialize)]
struct Envelope<T> {
    #[serde(rename = "type")]
    kind: FormKind,
    data: T,
}

#[derive(Serialize)]
struct EmbeddedEmployee<'a> {
    #[serde(flatten)]
    applicant: &'a EmployeeApplication,
    resume: Option<EmbeddedResume>,
}

impl<'a> EmbeddedEmployee<'a> {
    fn new(applicant: &'a EmployeeApplication) -> Self {
        Self {
            applicant,
            resume: applicant.resume.as_ref().map(EmbeddedResume::encode),
        }
    }
}

/// Resume as it appears inside a base64 JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedResume {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub content: String,
}

impl EmbeddedResume {
    pub fn encode(resume: &ResumeAttachment) -> Self {
        Self {
            file_name: resume.file_name.clone(),
            mime_type: resume.mime_type.clone(),
            size: resume.size,
            content: STANDARD.encode(&resume.content),
        }
    }

    pub fn decode(self) -> Result<ResumeAttachment, DecodeError> {
        let content = STANDARD.decode(self.content.as_bytes())?;
        Ok(ResumeAttachment {
            file_name: self.file_name,
            mime_type: self.mime_type,
            size: self.size,
            content: Bytes::from(content),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("submission body has no embedded resume")]
    MissingResume,
    #[error("embedded resume is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("embedded resume content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Receiving side of the base64 strategy: recover the attachment from an envelope.
pub fn decode_embedded_resume(envelope: &serde_json::Value) -> Result<ResumeAttachment, DecodeError> {
    let raw = envelope
        .pointer("/data/resume")
        .filter(|value| !value.is_null())
        .ok_or(DecodeError::MissingResume)?;
    let embedded: EmbeddedResume = serde_json::from_value(raw.clone())?;
    embedded.decode()
}
