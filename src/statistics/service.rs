use crate::database::entities::StatisticsRecord;
use crate::database::{DatabaseError, DatabaseManager};
use crate::error::AppError;
use crate::health::{HealthCheckResult, HealthChecker};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

pub const MISSING_JOB_ID_MESSAGE: &str =
    "standard_job_id parameter is required and cannot be empty";

/// Read-only queries over the days-to-hire summary table
pub struct StatisticsService {
    database: Arc<dyn DatabaseManager>,
}

impl StatisticsService {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }

    /// Exact-key lookup. An absent or empty `country_code` selects the global row.
    pub async fn get_statistics(
        &self,
        standard_job_id: &str,
        country_code: Option<&str>,
    ) -> Result<StatisticsRecord, AppError> {
        if standard_job_id.trim().is_empty() {
            return Err(AppError::BadRequest(MISSING_JOB_ID_MESSAGE.to_string()));
        }

        let country_code = country_code.filter(|code| !code.is_empty());

        let record = self
            .database
            .statistics()
            .find(standard_job_id, country_code)
            .await
            .map_err(|e| internal_error("Error retrieving statistics", e))?;

        record.ok_or_else(|| match country_code {
            Some(country_code) => AppError::NotFound(format!(
                "No statistics found for standard_job_id '{standard_job_id}' and country_code '{country_code}'"
            )),
            None => AppError::NotFound(format!(
                "No global statistics found for standard_job_id '{standard_job_id}'"
            )),
        })
    }

    /// Distinct job ids with at least one statistics row, ascending
    pub async fn list_available_jobs(&self) -> Result<Vec<String>, AppError> {
        self.database
            .statistics()
            .get_job_ids()
            .await
            .map_err(|e| internal_error("Error retrieving available jobs", e))
    }

    /// Distinct non-null country codes recorded for a job, ascending
    pub async fn list_available_countries(
        &self,
        standard_job_id: &str,
    ) -> Result<Vec<String>, AppError> {
        self.database
            .statistics()
            .get_country_codes(standard_job_id)
            .await
            .map_err(|e| internal_error("Error retrieving available countries", e))
    }
}

/// Degraded until a recompute has produced at least one row
#[async_trait]
impl HealthChecker for StatisticsService {
    fn name(&self) -> &str {
        "statistics"
    }

    async fn check(&self) -> HealthCheckResult {
        match self.database.statistics().get_job_ids().await {
            Ok(job_ids) if job_ids.is_empty() => {
                HealthCheckResult::degraded("No statistics computed yet".to_string())
            }
            Ok(job_ids) => HealthCheckResult::healthy_with_details(serde_json::json!({
                "jobs_with_statistics": job_ids.len(),
            })),
            Err(e) => HealthCheckResult::unhealthy(format!("Statistics table unavailable: {e}")),
        }
    }
}

fn internal_error(context: &str, err: DatabaseError) -> AppError {
    error!("{}: {}", context, err);
    AppError::Internal(context.to_string())
}
