//! Read-only HTTP API over one loaded dataset.

mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use std::io;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::localized::TimezoneData;
pub use state::AppState;

pub fn build_router(data: TimezoneData) -> Router {
    let state = Arc::new(AppState { data });

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/locales", get(handlers::locales))
        .route("/api/timezones", get(handlers::timezones))
        .route("/api/timezone", get(handlers::timezone))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(data: TimezoneData, host: &str, port: u16) -> io::Result<()> {
    let regions = data.len();
    let app = build_router(data);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(regions, "tz-locale server listening on http://{}", addr);
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn dataset() -> TimezoneData {
        serde_json::from_str(
            r#"{
                "Europe": {
                    "en": {"Europe/Rome": ["Rome", "CET", "CEST"]},
                    "it": {"Europe/Rome": ["Roma", "CET", "CEST"]}
                },
                "Oceania": {
                    "en": {"Pacific/Auckland": ["Auckland", "NZST", "NZDT"]}
                }
            }"#,
        )
        .unwrap()
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = build_router(dataset()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn locale_keys(body: &Value, region: &str) -> Vec<String> {
        body[region].as_object().unwrap().keys().cloned().collect()
    }

    #[tokio::test]
    async fn test_router_multi_locale_query() {
        let (status, body) = get_json("/api/timezones?locales=it,de").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(locale_keys(&body, "Europe"), vec!["it"]);
        assert_eq!(locale_keys(&body, "Oceania"), vec!["en"]);
    }

    #[tokio::test]
    async fn test_router_single_locale_query() {
        let (status, body) = get_json("/api/timezones?locale=de&fallback=en").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(locale_keys(&body, "Europe"), vec!["en"]);
        assert_eq!(body["Europe"]["en"]["Europe/Rome"][0], "Rome");
    }

    #[tokio::test]
    async fn test_router_timezone_lookup() {
        let (status, body) = get_json("/api/timezone?city=Europe%2FRome&locale=it").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Roma");
        assert_eq!(body["standard_time"], "CET");
    }

    #[tokio::test]
    async fn test_router_timezone_not_found() {
        let (status, body) = get_json("/api/timezone?city=Mars%2FOlympus").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_router_locales() {
        let (status, body) = get_json("/api/locales").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(["en", "it"]));
    }
}
