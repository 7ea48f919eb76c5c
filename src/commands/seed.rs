use crate::{
    Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    seed::seed_job_postings,
};
use std::path::Path;

pub async fn handle_seed_command(
    file: &Path,
    replace: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database = DatabaseManagerImpl::new_from_config(config).await?;
    if config.database.migration_on_startup {
        database.migrate().await?;
    }

    let summary = seed_job_postings(&database, file, replace).await?;
    println!(
        "Loaded {} job postings from {} ({} rows skipped)",
        summary.inserted,
        file.display(),
        summary.skipped
    );

    Ok(())
}
