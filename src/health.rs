use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

pub const SERVICE_NAME: &str = "days-to-hire-statistics-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub duration_ms: Option<u64>,
}

impl HealthCheckResult {
    fn new(status: HealthStatus, message: Option<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            status,
            message,
            details,
            duration_ms: None,
        }
    }

    pub fn healthy() -> Self {
        Self::new(HealthStatus::Healthy, None, None)
    }

    pub fn healthy_with_details(details: serde_json::Value) -> Self {
        Self::new(HealthStatus::Healthy, None, Some(details))
    }

    pub fn degraded(message: String) -> Self {
        Self::new(HealthStatus::Degraded, Some(message), None)
    }

    pub fn unhealthy(message: String) -> Self {
        Self::new(HealthStatus::Unhealthy, Some(message), None)
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[async_trait]
pub trait HealthChecker: Send + Sync {
    /// Name used in `?check=<name>` and as the key in the response
    fn name(&self) -> &str;

    async fn check(&self) -> HealthCheckResult;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallHealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub checks: BTreeMap<String, HealthCheckResult>,
    pub summary: HealthSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total_checks: usize,
    pub healthy_count: usize,
    pub degraded_count: usize,
    pub unhealthy_count: usize,
    pub total_duration_ms: u64,
}

impl HealthSummary {
    fn from_results(results: &BTreeMap<String, HealthCheckResult>) -> Self {
        let mut summary = Self {
            total_checks: results.len(),
            ..Self::default()
        };
        for result in results.values() {
            match result.status {
                HealthStatus::Healthy => summary.healthy_count += 1,
                HealthStatus::Degraded => summary.degraded_count += 1,
                HealthStatus::Unhealthy => summary.unhealthy_count += 1,
            }
            summary.total_duration_ms += result.duration_ms.unwrap_or_default();
        }
        summary
    }

    /// Worst status wins; no checks means healthy
    fn overall_status(&self) -> HealthStatus {
        if self.unhealthy_count > 0 {
            HealthStatus::Unhealthy
        } else if self.degraded_count > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}

/// Registry of component health checks
pub struct HealthService {
    checkers: RwLock<BTreeMap<String, Arc<dyn HealthChecker>>>,
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            checkers: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn register(&self, checker: Arc<dyn HealthChecker>) {
        let name = checker.name().to_string();
        self.checkers.write().await.insert(name, checker);
    }

    /// Run checks selected by `filter`: `None` runs nothing, `"all"` runs every
    /// registered check, anything else runs the check of that name if present.
    pub async fn check_health(&self, filter: Option<&str>) -> OverallHealthResponse {
        let selected: Vec<(String, Arc<dyn HealthChecker>)> = {
            let checkers = self.checkers.read().await;
            checkers
                .iter()
                .filter(|(name, _)| match filter {
                    Some("all") => true,
                    Some(specific) => name.as_str() == specific,
                    None => false,
                })
                .map(|(name, checker)| (name.clone(), checker.clone()))
                .collect()
        };

        let mut results = BTreeMap::new();
        for (name, checker) in selected {
            let start = Instant::now();
            let result = checker.check().await;
            results.insert(name, result.with_duration(start.elapsed().as_millis() as u64));
        }

        let summary = HealthSummary::from_results(&results);

        OverallHealthResponse {
            status: summary.overall_status(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks: results,
            summary,
        }
    }

    pub async fn get_registered_checkers(&self) -> Vec<String> {
        self.checkers.read().await.keys().cloned().collect()
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}
