use crate::{error::AppError, server::Server};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct HealthCheckQuery {
    /// `all`, or the name of one registered check (e.g. `database`)
    #[serde(default)]
    pub check: Option<String>,
}

/// Create health check routes
pub fn create_health_routes() -> Router<Server> {
    Router::new().route("/health", get(health_check))
}

/// Service liveness, optionally running component checks
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    params(HealthCheckQuery),
    responses(
        (status = 200, description = "Service is up; component results are in `checks`")
    )
)]
pub async fn health_check(
    State(server): State<Server>,
    Query(params): Query<HealthCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let health_response = server
        .health_service
        .check_health(params.check.as_deref())
        .await;

    let response_json = serde_json::to_value(&health_response)
        .map_err(|e| AppError::Internal(format!("Failed to serialize health response: {}", e)))?;

    Ok(Json(response_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestServerBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn get_health(uri: &str) -> (StatusCode, Value) {
        let server = TestServerBuilder::new().build().await;
        let app = create_health_routes().with_state(server);

        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_check_basic() {
        let (status, body) = get_health("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "days-to-hire-statistics-api");
        assert_eq!(body["summary"]["total_checks"], 0);
    }

    #[tokio::test]
    async fn test_health_check_with_all_query() {
        let (status, body) = get_health("/health?check=all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["database"]["status"], "healthy");
        // Nothing has been recomputed in a fresh database
        assert_eq!(body["checks"]["statistics"]["status"], "degraded");
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["summary"]["total_checks"], 2);
    }

    #[tokio::test]
    async fn test_health_check_with_unknown_query() {
        let (status, body) = get_health("/health?check=unknown").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["total_checks"], 0);
    }
}
