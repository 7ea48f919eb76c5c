use crate::{
    database::entities::StatisticsRecord,
    error::AppError,
    routes::ApiErrorResponse,
    server::Server,
    statistics::service::MISSING_JOB_ID_MESSAGE,
};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct StatisticsQuery {
    /// Standard job id to look up
    pub standard_job_id: Option<String>,
    /// Two-letter country code; omit for the global statistics
    pub country_code: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AvailableCountriesQuery {
    pub standard_job_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatisticsResponse {
    pub standard_job_id: String,
    /// `null` for the global row
    pub country_code: Option<String>,
    pub min_days: f64,
    pub avg_days: f64,
    pub max_days: f64,
    pub job_postings_number: i32,
}

impl From<StatisticsRecord> for StatisticsResponse {
    fn from(record: StatisticsRecord) -> Self {
        Self {
            standard_job_id: record.standard_job_id,
            country_code: record.country_code,
            min_days: record.min_days,
            avg_days: record.avg_days,
            max_days: record.max_days,
            job_postings_number: record.job_postings_number,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailableJobsResponse {
    pub available_jobs: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailableCountriesResponse {
    pub standard_job_id: String,
    pub available_countries: Vec<String>,
    pub count: usize,
}

/// Create days-to-hire statistics routes
pub fn create_statistics_routes() -> Router<Server> {
    Router::new()
        .route("/statistics", get(get_statistics))
        .route("/statistics/available-jobs", get(get_available_jobs))
        .route("/statistics/available-countries", get(get_available_countries))
}

/// Get days-to-hire statistics for a job, per country or globally
#[utoipa::path(
    get,
    path = "/statistics",
    tag = "Statistics",
    params(StatisticsQuery),
    responses(
        (status = 200, description = "Statistics found", body = StatisticsResponse),
        (status = 400, description = "Missing or empty standard_job_id", body = ApiErrorResponse),
        (status = 404, description = "No statistics for this key", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn get_statistics(
    State(server): State<Server>,
    Query(params): Query<StatisticsQuery>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let standard_job_id = params
        .standard_job_id
        .ok_or_else(|| AppError::BadRequest(MISSING_JOB_ID_MESSAGE.to_string()))?;

    let record = server
        .statistics_service
        .get_statistics(&standard_job_id, params.country_code.as_deref())
        .await?;

    Ok(Json(record.into()))
}

/// List job ids that have statistics
#[utoipa::path(
    get,
    path = "/statistics/available-jobs",
    tag = "Statistics",
    responses(
        (status = 200, description = "Sorted job ids", body = AvailableJobsResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn get_available_jobs(
    State(server): State<Server>,
) -> Result<Json<AvailableJobsResponse>, AppError> {
    let available_jobs = server.statistics_service.list_available_jobs().await?;

    Ok(Json(AvailableJobsResponse {
        count: available_jobs.len(),
        available_jobs,
    }))
}

/// List country codes with statistics for a job
#[utoipa::path(
    get,
    path = "/statistics/available-countries",
    tag = "Statistics",
    params(AvailableCountriesQuery),
    responses(
        (status = 200, description = "Sorted country codes", body = AvailableCountriesResponse),
        (status = 400, description = "Missing standard_job_id", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    )
)]
pub async fn get_available_countries(
    State(server): State<Server>,
    Query(params): Query<AvailableCountriesQuery>,
) -> Result<Json<AvailableCountriesResponse>, AppError> {
    let standard_job_id = params
        .standard_job_id
        .ok_or_else(|| AppError::BadRequest(MISSING_JOB_ID_MESSAGE.to_string()))?;

    let available_countries = server
        .statistics_service
        .list_available_countries(&standard_job_id)
        .await?;

    Ok(Json(AvailableCountriesResponse {
        standard_job_id,
        count: available_countries.len(),
        available_countries,
    }))
}
