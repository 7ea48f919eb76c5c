use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};
use tracing::info;

/// Install the Prometheus recorder; the handle renders the scrape output
pub fn init_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error + Send + Sync>> {
    let handle = PrometheusBuilder::new()
        .add_global_label("service", "days_to_hire_stats")
        .install_recorder()?;

    info!("Metrics recorder installed, exposed at /metrics");
    Ok(handle)
}

/// Middleware to collect HTTP request metrics
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.as_str().to_string()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.as_str().to_string()
    )
    .record(duration.as_secs_f64());

    gauge!("http_requests_active").decrement(1.0);

    if status.is_server_error() {
        counter!("http_errors_total", "method" => method, "path" => path).increment(1);
    }

    response
}

/// Track one statistics recompute run
pub fn track_statistics_recompute(success: bool, records_written: u64, duration: Duration) {
    let result = if success { "success" } else { "failure" };
    counter!("statistics_recompute_runs_total", "result" => result).increment(1);
    histogram!("statistics_recompute_duration_seconds", "result" => result)
        .record(duration.as_secs_f64());

    if success {
        gauge!("statistics_records").set(records_written as f64);
    }
}

/// Metrics endpoint handler
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_statistics_recompute() {
        track_statistics_recompute(true, 42, Duration::from_millis(120));
        track_statistics_recompute(false, 0, Duration::from_millis(5));
        // No panics, metrics recorded
    }
}
