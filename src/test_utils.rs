use crate::{
    config::Config,
    database::{
        DatabaseManager, DatabaseManagerImpl,
        entities::{JobPosting, StatisticsRecord},
    },
    server::Server,
};
use std::sync::Arc;

/// Test server builder backed by in-memory SQLite
pub struct TestServerBuilder {
    config: Config,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Build the server and apply migrations
    pub async fn build(self) -> Server {
        let mut config = self.config;

        config.database.url = "sqlite::memory:".to_string();
        config.metrics.enabled = false;
        config.jobs.enabled = false;

        let server = Server::new(config)
            .await
            .expect("Failed to create test server");
        server
            .database
            .migrate()
            .await
            .expect("Failed to run migrations");
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Migrated in-memory database without the rest of the server
pub async fn create_test_database() -> Arc<dyn DatabaseManager> {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();

    let database = DatabaseManagerImpl::new_from_config(&config)
        .await
        .expect("Failed to create test database");
    database.migrate().await.expect("Failed to run migrations");
    Arc::new(database)
}

pub fn job_posting(
    id: &str,
    standard_job_id: &str,
    country_code: Option<&str>,
    days_to_hire: Option<i32>,
) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        title: format!("Posting {id}"),
        standard_job_id: standard_job_id.to_string(),
        country_code: country_code.map(str::to_string),
        days_to_hire,
    }
}

/// Postings with the given values, ids prefixed by job and country
pub fn job_postings_with_days(
    standard_job_id: &str,
    country_code: Option<&str>,
    days: &[i32],
) -> Vec<JobPosting> {
    days.iter()
        .enumerate()
        .map(|(i, &value)| {
            let id = format!(
                "{}-{}-{}",
                standard_job_id,
                country_code.unwrap_or("global"),
                i
            );
            job_posting(&id, standard_job_id, country_code, Some(value))
        })
        .collect()
}

pub fn statistics_record(
    standard_job_id: &str,
    country_code: Option<&str>,
    min_days: f64,
    avg_days: f64,
    max_days: f64,
    job_postings_number: i32,
) -> StatisticsRecord {
    StatisticsRecord {
        id: 0,
        standard_job_id: standard_job_id.to_string(),
        country_code: country_code.map(str::to_string),
        min_days,
        avg_days,
        max_days,
        job_postings_number,
    }
}
