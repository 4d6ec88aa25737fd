//! The `/submit` relay sitting between a browser-style client and the real webhook.

mod common;

use std::sync::Arc;

use common::{closed_url, serve, FakeWebhook};
use job_portal::intake::AuthHeader;
use job_portal::proxy::{proxy_router, WebhookProxy, SUBMIT_PATH};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;

async fn start_proxy(destination: Url) -> String {
    let auth = AuthHeader {
        name: "X-Intake-Key".to_string(),
        value: "server-side-secret".to_string(),
    };
    let proxy = WebhookProxy::new(Some(destination), Some(auth), reqwest::Client::new());
    let addr = serve(proxy_router(Arc::new(proxy))).await;
    format!("http://{addr}{SUBMIT_PATH}")
}

#[tokio::test]
async fn json_body_is_relayed_with_secret_appended() {
    let webhook = FakeWebhook::start().await;
    let proxy_url = start_proxy(webhook.url("/raw")).await;
    let payload = json!({ "type": "company", "data": { "companyName": "Northwind Labs" } });

    let response = reqwest::Client::new()
        .post(&proxy_url)
        .json(&payload)
        .send()
        .await
        .expect("proxy answers");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body: Value = response.json().await.expect("json reply");
    assert_eq!(body, json!({ "received": true }));

    let received = webhook.inbox.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].headers["x-intake-key"], "server-side-secret");
    assert_eq!(received[0].headers["content-type"], "application/json");
    assert_eq!(received[0].json(), payload);
}

#[tokio::test]
async fn multipart_boundary_survives_the_hop() {
    let webhook = FakeWebhook::start().await;
    let proxy_url = start_proxy(webhook.url("/form")).await;
    let resume: Vec<u8> = (0..=255u8).cycle().take(256 * 1024).collect();
    let form = Form::new().text("type", "employee").part(
        "resume",
        Part::bytes(resume.clone())
            .file_name("cv.pdf")
            .mime_str("application/pdf")
            .expect("valid mime"),
    );

    let response = reqwest::Client::new()
        .post(&proxy_url)
        .multipart(form)
        .send()
        .await
        .expect("proxy answers");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("text reply"), "ok");

    let received = webhook.inbox.received();
    let request = &received[0];
    assert_eq!(request.fields["type"], "employee");
    let file = &request.files["resume"];
    assert_eq!(file.file_name.as_deref(), Some("cv.pdf"));
    assert_eq!(file.content.as_ref(), resume.as_slice());
}

#[tokio::test]
async fn destination_errors_pass_through_unchanged() {
    let webhook = FakeWebhook::start().await;
    let proxy_url = start_proxy(webhook.url("/broken")).await;

    let response = reqwest::Client::new()
        .post(&proxy_url)
        .json(&json!({ "type": "company", "data": {} }))
        .send()
        .await
        .expect("proxy answers");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.expect("json reply");
    assert_eq!(body, json!({ "message": "maintenance window" }));
}

#[tokio::test]
async fn unreachable_destination_is_a_generic_server_error() {
    let proxy_url = start_proxy(closed_url().await).await;

    let response = reqwest::Client::new()
        .post(&proxy_url)
        .json(&json!({ "type": "company", "data": {} }))
        .send()
        .await
        .expect("proxy answers");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("json reply");
    assert_eq!(
        body,
        json!({ "message": "An internal server error occurred while processing the request." })
    );
}

#[tokio::test]
async fn only_post_is_accepted() {
    let webhook = FakeWebhook::start().await;
    let proxy_url = start_proxy(webhook.url("/raw")).await;

    let response = reqwest::Client::new()
        .get(&proxy_url)
        .send()
        .await
        .expect("proxy answers");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "POST");
    assert!(webhook.inbox.received().is_empty());
}
