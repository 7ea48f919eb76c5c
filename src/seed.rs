//! Load job postings from a CSV export.
//!
//! Expected header: `id,title,standard_job_id,country_code,days_to_hire`.
//! Rows missing an id, title or standard job id are skipped. A blank or
//! non-integer `days_to_hire` and a blank `country_code` are stored as NULL.

use crate::database::{DatabaseError, DatabaseManager, entities::JobPosting};
use serde::Deserialize;
use std::{io, path::Path};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to open {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvJobPosting {
    id: Option<String>,
    title: Option<String>,
    standard_job_id: Option<String>,
    country_code: Option<String>,
    days_to_hire: Option<String>,
}

/// Postings parsed from a CSV source
#[derive(Debug, Default)]
pub struct ParsedPostings {
    pub postings: Vec<JobPosting>,
    pub skipped: usize,
}

/// Outcome of a seed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: u64,
    pub skipped: usize,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl CsvJobPosting {
    fn into_posting(self) -> Option<JobPosting> {
        let days_to_hire = non_blank(self.days_to_hire).and_then(|v| v.parse::<i32>().ok());

        Some(JobPosting {
            id: non_blank(self.id)?,
            title: non_blank(self.title)?,
            standard_job_id: non_blank(self.standard_job_id)?,
            country_code: non_blank(self.country_code),
            days_to_hire,
        })
    }
}

/// Parse postings from any CSV reader
pub fn read_job_postings<R: io::Read>(reader: R) -> Result<ParsedPostings, SeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = ParsedPostings::default();
    for (line, row) in csv_reader.deserialize::<CsvJobPosting>().enumerate() {
        match row?.into_posting() {
            Some(posting) => parsed.postings.push(posting),
            None => {
                // +2: header line and 1-based numbering
                warn!("Skipping CSV row {}: missing id, title or standard_job_id", line + 2);
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Load a CSV file into `job_posting` in one transaction.
///
/// With `replace`, existing postings are deleted in the same transaction.
pub async fn seed_job_postings(
    database: &dyn DatabaseManager,
    path: &Path,
    replace: bool,
) -> Result<SeedSummary, SeedError> {
    let file = std::fs::File::open(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let parsed = read_job_postings(file)?;
    info!(
        "Parsed {} job postings from {} ({} rows skipped)",
        parsed.postings.len(),
        path.display(),
        parsed.skipped
    );

    let inserted = database
        .job_postings()
        .insert_many(&parsed.postings, replace)
        .await?;

    Ok(SeedSummary {
        inserted,
        skipped: parsed.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_database, job_posting};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CSV: &str = "\
id,title,standard_job_id,country_code,days_to_hire
p1,Backend Engineer,job-1,US,30
p2, Data Analyst ,job-1, ,45
p3,Nurse,job-2,DE,
p4,Driver,job-2,DE,soon
,No Id,job-3,US,10
p6,,job-3,US,10
p7,No Job,,US,10
";

    #[test]
    fn test_read_job_postings_normalizes_values() {
        let parsed = read_job_postings(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(parsed.skipped, 3);
        assert_eq!(parsed.postings.len(), 4);

        assert_eq!(parsed.postings[0].country_code.as_deref(), Some("US"));
        assert_eq!(parsed.postings[0].days_to_hire, Some(30));

        assert_eq!(parsed.postings[1].title, "Data Analyst");
        assert_eq!(parsed.postings[1].country_code, None);
        assert_eq!(parsed.postings[1].days_to_hire, Some(45));

        assert_eq!(parsed.postings[2].days_to_hire, None);
        assert_eq!(parsed.postings[3].days_to_hire, None);
    }

    #[test]
    fn test_read_job_postings_short_rows() {
        let csv = "id,title,standard_job_id,country_code,days_to_hire\np1,Welder,job-9\n";
        let parsed = read_job_postings(csv.as_bytes()).unwrap();

        assert_eq!(parsed.postings.len(), 1);
        assert_eq!(parsed.postings[0].country_code, None);
        assert_eq!(parsed.postings[0].days_to_hire, None);
    }

    #[tokio::test]
    async fn test_seed_job_postings_from_file() {
        let database = create_test_database().await;
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        let summary = seed_job_postings(database.as_ref(), file.path(), false)
            .await
            .unwrap();

        assert_eq!(summary, SeedSummary { inserted: 4, skipped: 3 });
        assert_eq!(database.job_postings().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_seed_replace_clears_existing_rows() {
        let database = create_test_database().await;
        database
            .job_postings()
            .insert_many(&[job_posting("old", "job-0", None, Some(3))], false)
            .await
            .unwrap();

        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        seed_job_postings(database.as_ref(), file.path(), true)
            .await
            .unwrap();
        assert_eq!(database.job_postings().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_seed_duplicate_ids_roll_back() {
        let database = create_test_database().await;
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(
            b"id,title,standard_job_id,country_code,days_to_hire\np1,A,job-1,US,1\np1,B,job-1,US,2\n",
        )
        .unwrap();

        let result = seed_job_postings(database.as_ref(), file.path(), false).await;
        assert!(matches!(result, Err(SeedError::Database(_))));
        assert_eq!(database.job_postings().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_missing_file() {
        let database = create_test_database().await;
        let result =
            seed_job_postings(database.as_ref(), Path::new("/nonexistent/postings.csv"), false)
                .await;
        assert!(matches!(result, Err(SeedError::Io { .. })));
    }
}
