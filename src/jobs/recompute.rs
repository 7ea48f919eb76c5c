use super::{Job, JobResult};
use crate::{error::AppError, statistics::StatisticsAggregator};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Job for rebuilding the days-to-hire statistics table
pub struct StatisticsRecomputeJob {
    aggregator: Arc<StatisticsAggregator>,
    min_postings: u32,
}

impl StatisticsRecomputeJob {
    pub fn new(aggregator: Arc<StatisticsAggregator>, min_postings: u32) -> Self {
        Self {
            aggregator,
            min_postings,
        }
    }
}

#[async_trait]
impl Job for StatisticsRecomputeJob {
    fn name(&self) -> &str {
        "statistics_recompute"
    }

    async fn execute(&self) -> Result<JobResult, AppError> {
        let summary = self.aggregator.recompute(self.min_postings).await?;

        info!(
            "Recomputed statistics from {} postings ({} groups below threshold)",
            summary.postings_considered, summary.below_threshold
        );

        Ok(JobResult::success_with_count(summary.records_written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_database, job_posting};

    #[tokio::test]
    async fn test_recompute_job_reports_rows_written() {
        let database = create_test_database().await;
        let postings: Vec<_> = (1..=6)
            .map(|i| job_posting(&format!("p{i}"), "job-1", Some("US"), Some(i * 2)))
            .collect();
        database
            .job_postings()
            .insert_many(&postings, false)
            .await
            .unwrap();

        let job = StatisticsRecomputeJob::new(
            Arc::new(StatisticsAggregator::new(database.clone())),
            5,
        );
        assert_eq!(job.name(), "statistics_recompute");

        let result = job.execute().await.unwrap();
        assert_eq!(result.message, "Successfully processed 2 items");
        assert_eq!(result.items_processed, 2);
    }
}
