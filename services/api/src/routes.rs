use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use job_portal::intake::countries;
use job_portal::proxy::{proxy_router, WebhookProxy};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CountryQuery {
    #[serde(default)]
    pub(crate) q: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CountryListResponse {
    pub(crate) countries: Vec<&'static str>,
}

pub(crate) fn with_portal_routes(proxy: Arc<WebhookProxy>) -> axum::Router {
    proxy_router(proxy)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/countries", axum::routing::get(countries_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Backs the searchable country picker.
pub(crate) async fn countries_endpoint(
    Query(query): Query<CountryQuery>,
) -> Json<CountryListResponse> {
    Json(CountryListResponse {
        countries: countries::search(&query.q),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use job_portal::config::WebhookConfig;
    use job_portal::intake::FileEncoding;
    use job_portal::proxy::SUBMIT_PATH;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        };
        let webhook = WebhookConfig {
            url: None,
            header_name: None,
            header_value: None,
            file_encoding: FileEncoding::default(),
            simulation_delay: Duration::ZERO,
        };
        let proxy = Arc::new(WebhookProxy::from_config(&webhook).expect("client builds"));
        with_portal_routes(proxy).layer(Extension(state))
    }

    async fn send(app: axum::Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = send(app(false), Method::GET, "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "status": "initializing" }));

        let (status, body) = send(app(true), Method::GET, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ready" }));
    }

    #[tokio::test]
    async fn submit_route_is_mounted_alongside_health() {
        let (status, body) = send(app(true), Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        let (status, body) = send(app(true), Method::GET, SUBMIT_PATH).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "message": "Method Not Allowed" }));

        let (status, body) = send(app(true), Method::POST, SUBMIT_PATH).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "message": "Webhook URL is not configured on the server." })
        );
    }

    #[tokio::test]
    async fn country_search_is_case_insensitive() {
        let (status, body) = send(app(true), Method::GET, "/api/v1/countries?q=zeal").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "countries": ["New Zealand"] }));
    }
}
