use crate::{
    Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    statistics::StatisticsAggregator,
};
use std::sync::Arc;
use tracing::info;

/// One-shot batch run; the process exit code reports the outcome
pub async fn handle_recompute_command(
    min_postings: Option<u32>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database = Arc::new(DatabaseManagerImpl::new_from_config(config).await?);
    if config.database.migration_on_startup {
        database.migrate().await?;
    }

    let min_postings = min_postings.unwrap_or(config.aggregation.min_postings);
    let summary = StatisticsAggregator::new(database).recompute(min_postings).await?;

    info!(
        "Stored {} statistics rows ({} per-country, {} global)",
        summary.records_written, summary.country_records, summary.global_records
    );
    println!(
        "Days to hire statistics recomputed: {} rows written",
        summary.records_written
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recompute_command_on_empty_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("stats.db").display()
        );

        handle_recompute_command(Some(5), &config).await.unwrap();
    }
}
