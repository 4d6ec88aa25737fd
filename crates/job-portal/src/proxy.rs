//! Same-origin relay that keeps the webhook secret server-side.
//!
//! `POST /submit` streams the caller's body to the configured destination, appends the auth
//! header and hands back whatever the destination answered unchanged.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use url::Url;

use crate::config::WebhookConfig;
use crate::intake::client::USER_AGENT;
use crate::intake::transport::AuthHeader;

pub const SUBMIT_PATH: &str = "/submit";
const BODY_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
pub struct WebhookProxy {
    destination: Option<Url>,
    auth: Option<AuthHeader>,
    client: reqwest::Client,
}

impl WebhookProxy {
    pub fn new(destination: Option<Url>, auth: Option<AuthHeader>, client: reqwest::Client) -> Self {
        Self {
            destination,
            auth,
            client,
        }
    }

    pub fn from_config(config: &WebhookConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::new(config.url.clone(), config.proxy_auth_header(), client))
    }

    pub fn is_configured(&self) -> bool {
        self.destination.is_some()
    }

    /// Relay one request. The body is streamed through without buffering.
    pub async fn forward(&self, headers: &HeaderMap, body: Body) -> Response {
        let Some(destination) = &self.destination else {
            tracing::error!("WEBHOOK_URL is not set; refusing to forward submission");
            return message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Webhook URL is not configured on the server.",
            );
        };

        let mut outbound = reqwest::header::HeaderMap::new();
        // The multipart boundary lives in the content type, so it must survive the hop.
        if let Some(content_type) = headers.get(CONTENT_TYPE) {
            outbound.insert(CONTENT_TYPE, content_type.clone());
        }
        if let Some(auth) = &self.auth {
            match auth_header(auth) {
                Some((name, value)) => {
                    outbound.insert(name, value);
                }
                None => {
                    tracing::error!(header = %auth.name, "configured auth header is not valid HTTP");
                    return internal_error();
                }
            }
        }

        let upstream = self
            .client
            .post(destination.clone())
            .headers(outbound)
            .body(streaming_body(body))
            .send()
            .await;

        match upstream {
            Ok(response) => {
                let status = response.status();
                tracing::info!(status = status.as_u16(), "webhook relayed response");
                relay_response(response)
            }
            Err(err) => {
                tracing::error!(error = %err, destination = %destination, "error in webhook proxy");
                internal_error()
            }
        }
    }
}

pub fn proxy_router(proxy: Arc<WebhookProxy>) -> Router {
    Router::new()
        .route(
            SUBMIT_PATH,
            post(forward_handler).fallback(method_not_allowed),
        )
        .with_state(proxy)
}

async fn forward_handler(
    State(proxy): State<Arc<WebhookProxy>>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    proxy.forward(&headers, body).await
}

async fn method_not_allowed() -> Response {
    let mut response = message(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("POST"));
    response
}

fn auth_header(auth: &AuthHeader) -> Option<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(auth.name.as_bytes()).ok()?;
    let value = HeaderValue::from_str(&auth.value).ok()?;
    Some((name, value))
}

/// axum bodies are not `Sync`, so chunks are pumped through a channel into reqwest.
fn streaming_body(body: Body) -> reqwest::Body {
    let (mut sender, receiver) = futures::channel::mpsc::channel(BODY_CHANNEL_CAPACITY);
    let mut incoming = body.into_data_stream();
    tokio::spawn(async move {
        while let Some(chunk) = incoming.next().await {
            if sender.send(chunk).await.is_err() {
                break;
            }
        }
    });
    reqwest::Body::wrap_stream(receiver)
}

fn relay_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}

fn internal_error() -> Response {
    message(
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal server error occurred while processing the request.",
    )
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn unconfigured() -> Arc<WebhookProxy> {
        Arc::new(WebhookProxy::new(None, None, reqwest::Client::new()))
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn non_post_methods_are_refused() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let response = proxy_router(unconfigured())
                .oneshot(
                    Request::builder()
                        .method(method.clone())
                        .uri(SUBMIT_PATH)
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("router responds");

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(
                response.headers().get(ALLOW).map(HeaderValue::as_bytes),
                Some(&b"POST"[..])
            );
            assert_eq!(
                json_body(response).await,
                json!({ "message": "Method Not Allowed" })
            );
        }
    }

    #[tokio::test]
    async fn missing_destination_is_a_server_error() {
        let response = proxy_router(unconfigured())
            .oneshot(
                Request::post(SUBMIT_PATH)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"type":"company","data":{}}"#))
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "Webhook URL is not configured on the server." })
        );
    }

    #[tokio::test]
    async fn unusable_auth_header_never_leaves_the_server() {
        let destination = Url::parse("http://127.0.0.1:9/intake").expect("url");
        let auth = AuthHeader {
            name: "bad header".to_string(),
            value: "secret".to_string(),
        };
        let proxy = WebhookProxy::new(Some(destination), Some(auth), reqwest::Client::new());

        let response = proxy.forward(&HeaderMap::new(), Body::empty()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "An internal server error occurred while processing the request." })
        );
    }

    #[test]
    fn secret_is_relayed_only_under_a_configured_header_name() {
        let mut config = WebhookConfig {
            url: Some(Url::parse("https://hooks.example.com/intake").expect("url")),
            header_name: None,
            header_value: Some("s3cret".to_string()),
            file_encoding: crate::intake::FileEncoding::Multipart,
            simulation_delay: std::time::Duration::ZERO,
        };
        let proxy = WebhookProxy::from_config(&config).expect("client builds");
        assert!(proxy.is_configured());
        assert!(proxy.auth.is_none());

        config.header_name = Some("X-Intake-Key".to_string());
        let proxy = WebhookProxy::from_config(&config).expect("client builds");
        let auth = proxy.auth.expect("header configured");
        assert_eq!(auth.name, "X-Intake-Key");
        assert_eq!(auth.value, "s3cret");
    }
}
