use crate::{error::AppError, server::Server};
use axum::{Json, Router, http::header, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Days to Hire Statistics API",
        version = "1.0.0",
        description = "Outlier-trimmed days-to-hire statistics per standard job and country"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::statistics::get_statistics,
        crate::routes::statistics::get_available_jobs,
        crate::routes::statistics::get_available_countries,
    ),
    components(
        schemas(
            crate::routes::ApiErrorResponse,
            crate::routes::health::HealthCheckQuery,
            crate::routes::statistics::StatisticsQuery,
            crate::routes::statistics::AvailableCountriesQuery,
            crate::routes::statistics::StatisticsResponse,
            crate::routes::statistics::AvailableJobsResponse,
            crate::routes::statistics::AvailableCountriesResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Statistics", description = "Days-to-hire statistics lookups"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn create_docs_routes() -> Router<Server> {
    Router::new()
        .route("/docs/openapi.json", get(openapi_json))
        .route("/docs/openapi.yaml", get(openapi_yaml))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Serve OpenAPI specification as YAML
async fn openapi_yaml() -> Result<([(header::HeaderName, &'static str); 1], String), AppError> {
    let spec = ApiDoc::openapi();
    let yaml = serde_yaml_ng::to_string(&spec).map_err(|e| {
        AppError::Internal(format!("Failed to serialize OpenAPI spec to YAML: {e}"))
    })?;

    Ok(([(header::CONTENT_TYPE, "application/yaml")], yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_openapi_json() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let app = create_docs_routes().with_state(server);

        let request = Request::builder()
            .uri("/docs/openapi.json")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("application/json"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let spec: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(spec["paths"]["/statistics"].is_object());
        assert!(spec["paths"]["/statistics/available-countries"].is_object());
    }

    #[tokio::test]
    async fn test_openapi_yaml() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let app = create_docs_routes().with_state(server);

        let request = Request::builder()
            .uri("/docs/openapi.yaml")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("application/yaml"));
    }
}
