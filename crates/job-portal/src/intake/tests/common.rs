use std::sync::Mutex;

use axum::http::StatusCode;
use bytes::Bytes;
use url::Url;

use crate::intake::client::{TransportError, TransportResponse, WebhookTransport};
use crate::intake::domain::{
    CompanyApplication, EmployeeApplication, JobType, ResumeAttachment, SkillLevel,
};
use crate::intake::transport::{OutboundRequest, WebhookTarget};

pub(super) fn company() -> CompanyApplication {
    CompanyApplication {
        company_name: "Northwind Labs".to_string(),
        company_email: "talent@northwind.io".to_string(),
        role: "Platform Engineer".to_string(),
        skills: vec!["Rust".to_string(), "Kubernetes".to_string()],
        skill_level: SkillLevel::Advanced,
        education_level: "Bachelor's Degree".to_string(),
        country: "Canada".to_string(),
        job_type: JobType::Hybrid,
    }
}

pub(super) fn resume() -> ResumeAttachment {
    let content = Bytes::from_static(b"%PDF-1.7\n\x00\x01\x02binary resume body\xff");
    ResumeAttachment {
        file_name: "ada-lovelace-cv.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        size: content.len() as u64,
        content,
    }
}

pub(super) fn employee() -> EmployeeApplication {
    EmployeeApplication {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@analytical.engine".to_string(),
        phone: "(555) 123-4567".to_string(),
        skill_level: SkillLevel::Intermediate,
        resume: Some(resume()),
    }
}

pub(super) fn target() -> WebhookTarget {
    WebhookTarget::new(Url::parse("https://hooks.example.com/intake").expect("valid url"))
}

#[derive(Debug, Clone, Copy)]
pub(super) enum Reply {
    Status(StatusCode, &'static str),
    Unreachable,
}

/// Records every request and answers with a canned reply.
#[derive(Debug)]
pub(super) struct RecordingTransport {
    reply: Reply,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    pub(super) fn replying(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl WebhookTransport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().expect("lock").push(request);
        match self.reply {
            Reply::Status(status, body) => Ok(TransportResponse::new(status, body)),
            Reply::Unreachable => Err(TransportError::Unreachable(
                "tcp connect error: Connection refused (os error 111)".to_string(),
            )),
        }
    }
}
