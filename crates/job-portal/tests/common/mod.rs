//! In-process fake webhook shared by the integration scenarios.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use url::Url;

use job_portal::intake::{
    CompanyApplication, EmployeeApplication, JobType, ResumeAttachment, SkillLevel,
};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct Received {
    pub headers: HeaderMap,
    pub raw: Bytes,
    pub fields: BTreeMap<String, String>,
    pub files: BTreeMap<String, UploadedFile>,
}

impl Received {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.raw).expect("webhook received JSON")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Inbox {
    requests: Arc<Mutex<Vec<Received>>>,
}

impl Inbox {
    pub fn received(&self) -> Vec<Received> {
        self.requests.lock().expect("inbox mutex poisoned").clone()
    }

    fn push(&self, received: Received) {
        self.requests
            .lock()
            .expect("inbox mutex poisoned")
            .push(received);
    }
}

/// A running fake webhook.
///
/// `/raw` stores the body untouched, `/form` parses multipart, `/busy` answers 429 and
/// `/broken` answers 503 with a JSON error.
pub struct FakeWebhook {
    pub addr: SocketAddr,
    pub inbox: Inbox,
}

impl FakeWebhook {
    pub async fn start() -> Self {
        let inbox = Inbox::default();
        let app = Router::new()
            .route("/raw", post(accept_raw))
            .route("/form", post(accept_form))
            .route("/busy", post(rate_limited))
            .route("/broken", post(unavailable))
            .with_state(inbox.clone());
        let addr = serve(app).await;
        Self { addr, inbox }
    }

    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{path}", self.addr)).expect("valid url")
    }
}

pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake server runs");
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Url::parse(&format!("http://{addr}/intake")).expect("valid url")
}

async fn accept_raw(State(inbox): State<Inbox>, headers: HeaderMap, raw: Bytes) -> impl IntoResponse {
    inbox.push(Received {
        headers,
        raw,
        ..Received::default()
    });
    (StatusCode::OK, Json(json!({ "received": true })))
}

async fn accept_form(
    State(inbox): State<Inbox>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut received = Received {
        headers,
        ..Received::default()
    };

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let content = field.bytes().await.expect("field bytes");

        if file_name.is_some() {
            received.files.insert(
                name,
                UploadedFile {
                    file_name,
                    content_type,
                    content,
                },
            );
        } else {
            let value = String::from_utf8(content.to_vec()).expect("utf-8 text field");
            received.fields.insert(name, value);
        }
    }

    inbox.push(received);
    (StatusCode::OK, "ok")
}

async fn rate_limited() -> impl IntoResponse {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({ "error": "slow down" })),
    )
}

async fn unavailable() -> impl IntoResponse {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "message": "maintenance window" })),
    )
}

pub fn company() -> CompanyApplication {
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

pub fn resume() -> ResumeAttachment {
    let content = Bytes::from_static(b"%PDF-1.7\n\x00\x01\x02binary resume body\xff\xfe");
    ResumeAttachment {
        file_name: "ada-lovelace-cv.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        size: content.len() as u64,
        content,
    }
}

pub fn employee() -> EmployeeApplication {
    EmployeeApplication {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@analytical.engine".to_string(),
        phone: "(555) 123-4567".to_string(),
        skill_level: SkillLevel::Intermediate,
        resume: Some(resume()),
    }
}
