use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use days_to_hire_stats::{Server, database::DatabaseManager, test_utils::TestServerBuilder};
use serde_json::Value;
use tower::ServiceExt;

/// Server plus router over in-memory SQLite
pub struct TestHarness {
    pub server: Server,
    pub app: Router,
}

impl TestHarness {
    pub async fn new() -> Self {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();
        Self { server, app }
    }

    #[allow(dead_code)]
    pub fn database(&self) -> &dyn DatabaseManager {
        self.server.database.as_ref()
    }

    /// GET `uri` and decode the JSON body
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
