pub mod recompute;
pub mod scheduler;

use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use recompute::StatisticsRecomputeJob;
pub use scheduler::JobScheduler;

/// Configuration for the job system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Enable/disable internal job scheduler
    pub enabled: bool,

    /// Statistics recompute job configuration
    #[serde(default)]
    pub statistics_recompute: StatisticsRecomputeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsRecomputeConfig {
    /// Cron schedule expression (sec min hour day month dow)
    pub schedule: String,
}

impl Default for StatisticsRecomputeConfig {
    fn default() -> Self {
        Self {
            schedule: "0 0 3 * * *".to_string(), // Daily at 3 AM
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            statistics_recompute: StatisticsRecomputeConfig::default(),
        }
    }
}

/// Result of job execution
#[derive(Debug, Clone)]
pub struct JobResult {
    pub message: String,
    pub items_processed: u64,
}

impl JobResult {
    pub fn success_with_count(count: u64) -> Self {
        Self {
            message: format!("Successfully processed {count} items"),
            items_processed: count,
        }
    }
}

/// Trait for executable jobs
#[async_trait]
pub trait Job: Send + Sync {
    /// Get the job name for logging and identification
    fn name(&self) -> &str;

    /// Execute the job; failures surface as `Err`
    async fn execute(&self) -> Result<JobResult, AppError>;
}
