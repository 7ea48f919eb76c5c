use super::trimming::trimmed_statistics;
use crate::database::entities::StatisticsRecord;
use crate::database::{DatabaseManager, DatabaseResult, DaysToHireSample};
use crate::metrics;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Partition key; `country_code == None` is the job's global partition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PartitionKey {
    standard_job_id: String,
    country_code: Option<String>,
}

/// Output of one pass over the postings, before anything is written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStatistics {
    /// One row per (job, country) partition that met the threshold
    pub country: Vec<StatisticsRecord>,
    /// One row per job that met the threshold across all countries
    pub global: Vec<StatisticsRecord>,
    /// Partitions dropped for having fewer than `min_postings` rows
    pub below_threshold: usize,
    /// Partitions dropped because trimming left nothing to average
    pub empty_after_trim: usize,
}

impl ComputedStatistics {
    /// Country rows first, then global rows
    pub fn into_records(self) -> Vec<StatisticsRecord> {
        let mut records = self.country;
        records.extend(self.global);
        records
    }
}

/// What a completed recompute did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecomputeSummary {
    pub postings_considered: usize,
    pub country_records: usize,
    pub global_records: usize,
    pub records_written: u64,
    pub below_threshold: usize,
    pub empty_after_trim: usize,
}

/// Compute every statistics row from the given samples.
///
/// Country partitions only take postings with a country code; the global
/// partition of a job takes all of its postings.
pub fn compute_statistics(samples: &[DaysToHireSample], min_postings: u32) -> ComputedStatistics {
    let mut country_partitions: BTreeMap<PartitionKey, Vec<i32>> = BTreeMap::new();
    let mut global_partitions: BTreeMap<PartitionKey, Vec<i32>> = BTreeMap::new();

    for sample in samples {
        if let Some(country_code) = &sample.country_code {
            country_partitions
                .entry(PartitionKey {
                    standard_job_id: sample.standard_job_id.clone(),
                    country_code: Some(country_code.clone()),
                })
                .or_default()
                .push(sample.days_to_hire);
        }

        global_partitions
            .entry(PartitionKey {
                standard_job_id: sample.standard_job_id.clone(),
                country_code: None,
            })
            .or_default()
            .push(sample.days_to_hire);
    }

    let mut computed = ComputedStatistics::default();
    let country = summarize_partitions(country_partitions, min_postings, &mut computed);
    let global = summarize_partitions(global_partitions, min_postings, &mut computed);
    computed.country = country;
    computed.global = global;
    computed
}

fn summarize_partitions(
    partitions: BTreeMap<PartitionKey, Vec<i32>>,
    min_postings: u32,
    computed: &mut ComputedStatistics,
) -> Vec<StatisticsRecord> {
    let mut records = Vec::with_capacity(partitions.len());

    for (key, values) in partitions {
        if values.len() < min_postings as usize {
            computed.below_threshold += 1;
            continue;
        }

        let Some(stats) = trimmed_statistics(values) else {
            continue;
        };

        let Some(avg_days) = stats.avg_days else {
            warn!(
                "Skipping statistics for job '{}' country {:?}: {} postings leave nothing after trimming",
                key.standard_job_id, key.country_code, stats.total_count
            );
            computed.empty_after_trim += 1;
            continue;
        };

        records.push(StatisticsRecord {
            id: 0,
            standard_job_id: key.standard_job_id,
            country_code: key.country_code,
            min_days: stats.min_days,
            avg_days,
            max_days: stats.max_days,
            job_postings_number: i32::try_from(stats.total_count).unwrap_or(i32::MAX),
        });
    }

    records
}

/// Rebuilds the days-to-hire summary table from raw postings
pub struct StatisticsAggregator {
    database: Arc<dyn DatabaseManager>,
    /// Serializes runs within this process
    run_lock: Mutex<()>,
}

impl StatisticsAggregator {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self {
            database,
            run_lock: Mutex::new(()),
        }
    }

    /// Recompute all statistics and atomically replace the summary table.
    ///
    /// On error the previous table contents stay visible.
    pub async fn recompute(&self, min_postings: u32) -> DatabaseResult<RecomputeSummary> {
        let _guard = self.run_lock.lock().await;
        let started = Instant::now();

        info!(
            "Starting days-to-hire statistics calculation (minimum {} postings per group)",
            min_postings
        );

        let result = self.run(min_postings).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(summary) => {
                metrics::track_statistics_recompute(true, summary.records_written, elapsed);
                info!(
                    "Statistics calculation completed in {:?}: {} country rows, {} global rows",
                    elapsed, summary.country_records, summary.global_records
                );
            }
            Err(e) => {
                metrics::track_statistics_recompute(false, 0, elapsed);
                error!("Statistics calculation failed, previous statistics kept: {}", e);
            }
        }

        result
    }

    async fn run(&self, min_postings: u32) -> DatabaseResult<RecomputeSummary> {
        let samples = self.database.job_postings().get_days_to_hire_samples().await?;
        info!("Loaded {} job postings with days to hire", samples.len());

        let computed = compute_statistics(&samples, min_postings);
        let country_records = computed.country.len();
        let global_records = computed.global.len();
        let below_threshold = computed.below_threshold;
        let empty_after_trim = computed.empty_after_trim;

        if below_threshold > 0 {
            info!(
                "{} groups had fewer than {} postings and were skipped",
                below_threshold, min_postings
            );
        }

        let records = computed.into_records();
        let records_written = self.database.statistics().replace_all(&records).await?;

        Ok(RecomputeSummary {
            postings_considered: samples.len(),
            country_records,
            global_records,
            records_written,
            below_threshold,
            empty_after_trim,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_database, job_posting};

    fn sample(job: &str, country: Option<&str>, days: i32) -> DaysToHireSample {
        DaysToHireSample {
            standard_job_id: job.to_string(),
            country_code: country.map(str::to_string),
            days_to_hire: days,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_compute_country_and_global_rows() {
        let mut samples: Vec<_> = (1..=10).map(|i| sample("job-1", Some("US"), i * 10)).collect();
        samples.extend((1..=5).map(|i| sample("job-1", Some("DE"), i)));

        let computed = compute_statistics(&samples, 5);

        assert_eq!(computed.country.len(), 2);
        assert_eq!(computed.global.len(), 1);

        let de = &computed.country[0];
        assert_eq!(de.country_code.as_deref(), Some("DE"));
        assert_eq!(de.job_postings_number, 5);

        let us = &computed.country[1];
        assert_eq!(us.country_code.as_deref(), Some("US"));
        assert_close(us.min_days, 19.0);
        assert_close(us.avg_days, 55.0);
        assert_close(us.max_days, 91.0);
        assert_eq!(us.job_postings_number, 10);

        let global = &computed.global[0];
        assert_eq!(global.country_code, None);
        assert_eq!(global.job_postings_number, 15);
    }

    #[test]
    fn test_compute_applies_threshold_per_partition() {
        let mut samples: Vec<_> = (0..3).map(|i| sample("job-1", Some("US"), 10 + i)).collect();
        samples.extend((0..3).map(|i| sample("job-1", Some("FR"), 20 + i)));

        let computed = compute_statistics(&samples, 5);

        // Neither country qualifies, but the job as a whole does
        assert!(computed.country.is_empty());
        assert_eq!(computed.global.len(), 1);
        assert_eq!(computed.global[0].job_postings_number, 6);
        assert_eq!(computed.below_threshold, 2);
    }

    #[test]
    fn test_compute_null_country_counts_only_globally() {
        let mut samples: Vec<_> = (0..5).map(|i| sample("job-1", None, 30 + i)).collect();
        samples.extend((0..5).map(|i| sample("job-1", Some("US"), 40 + i)));

        let computed = compute_statistics(&samples, 5);

        assert_eq!(computed.country.len(), 1);
        assert_eq!(computed.country[0].country_code.as_deref(), Some("US"));
        assert_eq!(computed.global.len(), 1);
        assert_eq!(computed.global[0].job_postings_number, 10);
    }

    #[test]
    fn test_compute_skips_partitions_empty_after_trim() {
        let samples = vec![sample("job-1", Some("US"), 3), sample("job-1", Some("US"), 9)];

        let computed = compute_statistics(&samples, 1);

        assert!(computed.country.is_empty());
        assert!(computed.global.is_empty());
        assert_eq!(computed.empty_after_trim, 2);
    }

    #[test]
    fn test_compute_threshold_zero_and_one_behave_alike() {
        let samples: Vec<_> = (0..3).map(|i| sample("job-1", Some("US"), i)).collect();
        assert_eq!(compute_statistics(&samples, 0), compute_statistics(&samples, 1));
    }

    #[test]
    fn test_compute_is_order_independent() {
        let mut samples: Vec<_> = (1..=12)
            .map(|i| sample(if i % 2 == 0 { "a" } else { "b" }, Some("US"), i * 3))
            .collect();
        let forward = compute_statistics(&samples, 2);
        samples.reverse();
        assert_eq!(forward, compute_statistics(&samples, 2));
    }

    #[tokio::test]
    async fn test_recompute_replaces_table() {
        let database = create_test_database().await;
        let postings: Vec<_> = (1..=10)
            .map(|i| job_posting(&format!("p{i}"), "job-1", Some("US"), Some(i * 10)))
            .collect();
        database
            .job_postings()
            .insert_many(&postings, false)
            .await
            .unwrap();

        let aggregator = StatisticsAggregator::new(database.clone());
        let summary = aggregator.recompute(5).await.unwrap();

        assert_eq!(summary.postings_considered, 10);
        assert_eq!(summary.country_records, 1);
        assert_eq!(summary.global_records, 1);
        assert_eq!(summary.records_written, 2);

        // Fewer qualifying groups on the second run leave no stale rows
        let summary = aggregator.recompute(11).await.unwrap();
        assert_eq!(summary.records_written, 0);
        assert!(database.statistics().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recompute_ignores_postings_without_days() {
        let database = create_test_database().await;
        let mut postings: Vec<_> = (1..=5)
            .map(|i| job_posting(&format!("p{i}"), "job-1", Some("US"), Some(i)))
            .collect();
        postings.push(job_posting("p6", "job-1", Some("US"), None));
        database
            .job_postings()
            .insert_many(&postings, false)
            .await
            .unwrap();

        let summary = StatisticsAggregator::new(database.clone())
            .recompute(5)
            .await
            .unwrap();

        assert_eq!(summary.postings_considered, 5);
        let global = database
            .statistics()
            .find("job-1", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(global.job_postings_number, 5);
    }
}
