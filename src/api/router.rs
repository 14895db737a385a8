//! API router configuration
//!
//! Defines all API routes and middleware. The route set is a fixed table
//! built at startup; `ENDPOINTS` names the discoverable collection roots
//! served by the index handler.

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Discoverable collection endpoints, name to URL
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("vlans", "/vlan/"),
    ("hosts", "/host/"),
    ("find", "/query/"),
];

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Discovery
        .route("/", get(index))
        .route("/version/", get(version))
        // VLANs
        .route("/vlan/", get(handlers::list_vlans))
        .route("/vlan/", post(handlers::create_vlan))
        .route("/vlan/:ident/", get(handlers::vlan_info))
        .route("/vlan/:ident/", delete(handlers::delete_vlan))
        // Hosts
        .route("/host/", get(handlers::list_hosts))
        .route("/host/", post(handlers::create_host))
        .route("/host/:name/", get(handlers::host_info))
        .route("/host/:name/", delete(handlers::delete_host))
        // Queries
        .route("/query/", get(handlers::resolve))
        // Stats
        .route("/stats/", get(handlers::get_stats))
        // Health check
        .route("/health", get(health_check))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Endpoint discovery: name to lookup URL for each collection
async fn index() -> Json<serde_json::Value> {
    let endpoints: serde_json::Map<String, serde_json::Value> = ENDPOINTS
        .iter()
        .map(|(name, url)| ((*name).to_string(), serde_json::json!({ "url": url })))
        .collect();
    Json(serde_json::Value::Object(endpoints))
}

/// Crate version
async fn version() -> Json<&'static str> {
    Json(env!("CARGO_PKG_VERSION"))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ApiServerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(Arc::new(AppState::new()))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_vlan(app: &Router, number: u16, name: &str, mask: &str) -> Value {
        let response = app
            .clone()
            .oneshot(post_json(
                "/vlan/",
                json!({ "number": number, "name": name, "mask": mask }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    async fn create_host(app: &Router, name: &str, vlans: &[u16]) -> Value {
        let response = app
            .clone()
            .oneshot(post_json("/host/", json!({ "name": name, "vlans": vlans })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let response = app().oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["vlans"]["url"], "/vlan/");
        assert_eq!(body["hosts"]["url"], "/host/");
        assert_eq!(body["find"]["url"], "/query/");
    }

    #[tokio::test]
    async fn test_version() {
        let response = app().oneshot(get_request("/version/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_list_vlans_empty() {
        let response = app().oneshot(get_request("/vlan/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_vlan_and_list() {
        let app = app();
        let vlan = create_vlan(&app, 35, "test", "100.110.120.0/24").await;
        assert_eq!(vlan["number"], 35);
        assert_eq!(vlan["range"], "100.110.120.0/24");
        assert_eq!(vlan["url"], "/vlan/test/");

        let response = app.oneshot(get_request("/vlan/")).await.unwrap();
        let vlans = body_json(response).await;
        assert_eq!(vlans.as_array().unwrap().len(), 1);
        assert_eq!(vlans[0]["number"], 35);
    }

    #[tokio::test]
    async fn test_create_vlan_conflict() {
        let app = app();
        create_vlan(&app, 42, "foo", "10.11.12.0/24").await;

        // Same number, different name
        let response = app
            .clone()
            .oneshot(post_json(
                "/vlan/",
                json!({ "number": 42, "name": "bar", "mask": "10.11.13.0/24" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Same name, different number
        let response = app
            .oneshot(post_json(
                "/vlan/",
                json!({ "number": 43, "name": "foo", "mask": "10.11.13.0/24" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_vlan_malformed_mask() {
        let response = app()
            .oneshot(post_json(
                "/vlan/",
                json!({ "number": 1, "name": "bad", "mask": "10.0.0.0/40" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_vlan_info_by_number_and_name() {
        let app = app();
        create_vlan(&app, 20, "office", "10.11.12.0/24").await;

        let response = app.clone().oneshot(get_request("/vlan/20/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let by_number = body_json(response).await;

        let response = app
            .clone()
            .oneshot(get_request("/vlan/office/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let by_name = body_json(response).await;

        assert_eq!(by_number, by_name);
        assert_eq!(by_name["hosts"], json!([]));

        let response = app.oneshot(get_request("/vlan/21/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_vlan_cascades() {
        let app = app();
        let vlan = create_vlan(&app, 20, "office", "100.110.120.0/24").await;
        let host = create_host(&app, "worker", &[20]).await;
        assert_eq!(host["vlans"], json!([20]));

        let response = app
            .clone()
            .oneshot(delete_request(vlan["url"].as_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app.clone().oneshot(get_request("/vlan/")).await.unwrap();
        assert_eq!(body_json(response).await, json!([]));

        // The host survives with no addresses
        let response = app
            .oneshot(get_request(host["url"].as_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ips"], json!({}));
    }

    #[tokio::test]
    async fn test_delete_missing_vlan() {
        let response = app().oneshot(delete_request("/vlan/ghost/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_host_with_vlans() {
        let app = app();
        for number in 0..4u16 {
            create_vlan(
                &app,
                number,
                &format!("vlan{}", number),
                &format!("10.0.{}.0/24", number),
            )
            .await;
        }

        let host = create_host(&app, "worker", &[0, 1, 2, 3]).await;
        assert_eq!(host["vlans"], json!([0, 1, 2, 3]));

        let response = app
            .oneshot(get_request(host["url"].as_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let full = body_json(response).await;
        assert_eq!(full["ips"].as_object().unwrap().len(), 4);
        assert_eq!(full["ips"]["2"], "10.0.2.0");
    }

    #[tokio::test]
    async fn test_create_host_conflict() {
        let app = app();
        create_host(&app, "conflict_test", &[]).await;

        let response = app
            .oneshot(post_json("/host/", json!({ "name": "conflict_test" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_host_unknown_vlan() {
        let app = app();
        create_vlan(&app, 1, "known", "10.0.1.0/24").await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/host/",
                json!({ "name": "partial", "vlans": [1, 99] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Rolled back entirely
        let response = app.oneshot(get_request("/host/")).await.unwrap();
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_host_exhausted_vlan() {
        let app = app();
        let vlan = create_vlan(&app, 31, "tiny", "10.10.10.126/31").await;
        let number = vlan["number"].as_u64().unwrap() as u16;

        create_host(&app, "host0", &[number]).await;
        create_host(&app, "host1", &[number]).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/host/",
                json!({ "name": "fullhost", "vlans": [number] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);

        let response = app.oneshot(get_request("/host/")).await.unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_host() {
        let app = app();
        create_vlan(&app, 7, "vlan7", "10.0.7.0/24").await;
        let host = create_host(&app, "worker", &[7]).await;

        let response = app
            .clone()
            .oneshot(delete_request(host["url"].as_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app.clone().oneshot(get_request("/host/")).await.unwrap();
        assert_eq!(body_json(response).await, json!([]));

        let response = app.oneshot(delete_request("/host/worker/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_by_ip() {
        let app = app();
        create_vlan(&app, 15, "vlan15", "10.0.15.0/24").await;
        create_host(&app, "test", &[15]).await;

        let response = app
            .clone()
            .oneshot(get_request("/query/?ip=10.0.15.0"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, "test_vlan15_ip");

        // Well-formed but unallocated
        let response = app
            .clone()
            .oneshot(get_request("/query/?ip=10.0.15.77"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Malformed
        let response = app
            .clone()
            .oneshot(get_request("/query/?ip=notanip"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Out-of-range octets are rejected, not wrapped
        let response = app
            .oneshot(get_request("/query/?ip=256.256.256.256"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_query_by_hostname() {
        let app = app();
        create_vlan(&app, 15, "vlan15", "10.0.15.0/24").await;
        for i in 0..4 {
            create_host(&app, &format!("test{}", i), &[]).await;
        }
        create_host(&app, "single", &[15]).await;

        // Multiple matches render the simple listing
        let response = app
            .clone()
            .oneshot(get_request("/query/?hostname=test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let hosts = body_json(response).await;
        assert_eq!(hosts.as_array().unwrap().len(), 4);
        assert_eq!(hosts[0]["name"], "test0");

        // A unique match renders the full record
        let response = app
            .clone()
            .oneshot(get_request("/query/?hostname=single"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let host = body_json(response).await;
        assert_eq!(host["ips"]["15"], "10.0.15.0");

        // No match
        let response = app
            .clone()
            .oneshot(get_request("/query/?hostname=missing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Neither parameter
        let response = app.oneshot(get_request("/query/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stats() {
        let app = app();
        create_vlan(&app, 20, "office", "10.11.12.0/24").await;
        create_host(&app, "worker", &[20]).await;

        let response = app.oneshot(get_request("/stats/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "vlans": 1, "hosts": 1, "addresses": 1 })
        );
    }

    #[test]
    fn test_api_config_default() {
        let config = ApiServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}
