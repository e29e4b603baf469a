//! Shared helpers for HTTP-level tests
//!
//! Each test gets its own context over a throwaway database and drives the
//! router directly with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use mokai_api::{router, AppContext};
use mokai_domain::{Config, DatabaseConfig};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    _temp_dir: TempDir,
}

/// Build an app over a fresh temporary database.
pub fn spawn_app() -> TestApp {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config = Config {
        database: DatabaseConfig {
            path: temp_dir.path().join("mokai.db").to_string_lossy().to_string(),
            pool_size: 4,
        },
        ..Config::default()
    };
    let ctx = Arc::new(AppContext::new_with_config(config).expect("create context"));
    TestApp { router: router(ctx), _temp_dir: temp_dir }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).expect("build request");
        split(self.router.clone().oneshot(request).await.expect("send request")).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request");
        split(self.router.clone().oneshot(request).await.expect("send request")).await
    }

    pub async fn send_json_from(
        &self,
        method: &str,
        uri: &str,
        body: &serde_json::Value,
        forwarded_for: &str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-forwarded-for", forwarded_for)
            .body(Body::from(body.to_string()))
            .expect("build request");
        split(self.router.clone().oneshot(request).await.expect("send request")).await
    }

    /// Create an organization and return its JSON (with the controls array).
    pub async fn create_organization(&self, name: &str, abn: &str) -> serde_json::Value {
        let (status, body) = self
            .send_json(
                "POST",
                "/api/organizations",
                &serde_json::json!({ "name": name, "abn": abn }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create organization failed: {body}");
        body
    }
}

async fn split(response: Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
