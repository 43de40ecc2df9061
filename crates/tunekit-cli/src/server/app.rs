//! Axum application setup.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/catalog", get(handlers::get_catalog))
        .route("/classify/:id", post(handlers::classify_item))
        // Selection
        .route("/selection", get(handlers::get_selection))
        .route("/selection/toggle/:id", post(handlers::toggle_item))
        .route("/selection/add/:id", post(handlers::add_item))
        .route("/selection/clear", post(handlers::clear_selection))
        .route("/selection/:id", axum::routing::delete(handlers::remove_item))
        // Batch cleaning
        .route("/batch", get(handlers::get_batch).post(handlers::run_batch))
        .route("/batch/progress", get(handlers::get_progress))
        // Output
        .route("/export", get(handlers::export_dataset))
        .route("/stats", get(handlers::get_stats))
        .route(
            "/assistant",
            get(handlers::get_conversation)
                .post(handlers::ask_assistant)
                .delete(handlers::clear_conversation),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;
    use tunekit::cleaning::BatchConfig;
    use tunekit::{Catalog, CurationSession, MockProvider, ServiceError, StudioConfig};

    use super::*;

    fn router_with(provider: MockProvider) -> Router {
        let config = StudioConfig {
            batch: BatchConfig::immediate(),
            ..StudioConfig::default()
        };
        let session = CurationSession::with_config(Catalog::demo(), Arc::new(provider), &config);
        create_router(AppState::new(session))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_catalog_lists_demo_items() {
        let app = router_with(MockProvider::new());
        let (status, body) = send(&app, "GET", "/api/catalog", None).await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["items"].as_array().unwrap().len(), 8);
        assert_eq!(body["items"][0]["selected"], false);
        assert_eq!(body["provider"], "mock");
    }

    #[tokio::test]
    async fn test_selection_round_trip() {
        let app = router_with(MockProvider::new());

        let (status, body) = send(&app, "POST", "/api/selection/toggle/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["selected"], true);

        send(&app, "POST", "/api/selection/add/1", None).await;
        let (_, body) = send(&app, "POST", "/api/selection/add/3", None).await;
        assert_eq!(json(&body)["changed"], false);

        let (_, body) = send(&app, "GET", "/api/selection", None).await;
        let ids: Vec<u64> = json(&body)["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 1]);

        let (_, body) = send(&app, "DELETE", "/api/selection/3", None).await;
        assert_eq!(json(&body)["count"], 1);

        let (status, body) = send(&app, "POST", "/api/selection/clear", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json(&body)["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let app = router_with(MockProvider::new());
        let (status, body) = send(&app, "POST", "/api/selection/add/999", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["error"], "not_found");
    }

    #[tokio::test]
    async fn test_batch_then_export_attachment() {
        let app = router_with(MockProvider::new().with_clean_score("SQL Query Optimization", 90));
        send(&app, "POST", "/api/selection/add/5", None).await;

        let (status, body) = send(&app, "POST", "/api/batch", Some(serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["summary"]["avgQualityScore"], 90);

        let (_, body) = send(&app, "GET", "/api/batch/progress", None).await;
        assert_eq!(json(&body)["progress"], 100);

        let request = Request::builder()
            .uri("/api/export?format=alpaca&name=demo")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"demo.json\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let records = json(&body);
        assert_eq!(records[0]["output"], "cleaned: SQL Query Optimization");
    }

    #[tokio::test]
    async fn test_batch_rate_limit_maps_to_429() {
        let app = router_with(
            MockProvider::new().with_clean_failure("SQL Query Optimization", ServiceError::RateLimited),
        );
        send(&app, "POST", "/api/selection/add/5", None).await;

        let (status, body) = send(&app, "POST", "/api/batch", Some(serde_json::json!({}))).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert!(json(&body)["hint"].as_str().unwrap().contains("try again later"));
        let (_, body) = send(&app, "GET", "/api/batch", None).await;
        assert!(json(&body)["run"].is_null());
    }

    #[tokio::test]
    async fn test_export_rejects_empty_selection_and_bad_format() {
        let app = router_with(MockProvider::new());

        let (status, body) = send(&app, "GET", "/api/export", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "no_data");

        let (status, _) = send(&app, "GET", "/api/export?format=csv", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_assistant_chat_and_stats() {
        let app = router_with(MockProvider::new());
        send(&app, "POST", "/api/selection/add/1", None).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/assistant",
            Some(serde_json::json!({"action": "chat", "message": "what now?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["reply"], "You asked: what now?");
        assert_eq!(body["conversation"]["messages"].as_array().unwrap().len(), 2);

        send(&app, "POST", "/api/classify/1", None).await;
        let (_, body) = send(&app, "GET", "/api/stats", None).await;
        let stats = json(&body);
        assert_eq!(stats["totalItems"], 1);
        assert_eq!(stats["scored"], 1);
    }
}
