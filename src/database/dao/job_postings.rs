use crate::database::entities::{JobPosting, job_postings};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// Rows per multi-row INSERT; keeps bound parameters well under SQLite's limit.
const INSERT_BATCH_SIZE: usize = 200;

/// The slice of a posting the aggregation needs
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct DaysToHireSample {
    pub standard_job_id: String,
    pub country_code: Option<String>,
    pub days_to_hire: i32,
}

/// Job postings DAO for database operations
pub struct JobPostingsDao {
    db: DatabaseConnection,
}

impl JobPostingsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every posting with a known days-to-hire value, ordered by grouping key and value
    pub async fn get_days_to_hire_samples(&self) -> DatabaseResult<Vec<DaysToHireSample>> {
        let samples = job_postings::Entity::find()
            .select_only()
            .column(job_postings::Column::StandardJobId)
            .column(job_postings::Column::CountryCode)
            .column(job_postings::Column::DaysToHire)
            .filter(job_postings::Column::DaysToHire.is_not_null())
            .order_by_asc(job_postings::Column::StandardJobId)
            .order_by_asc(job_postings::Column::CountryCode)
            .order_by_asc(job_postings::Column::DaysToHire)
            .into_model::<DaysToHireSample>()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(samples)
    }

    /// Insert postings in one transaction, optionally wiping the table first
    pub async fn insert_many(&self, postings: &[JobPosting], replace: bool) -> DatabaseResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        if replace {
            let deleted = job_postings::Entity::delete_many()
                .exec(&txn)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
            tracing::info!("Removed {} existing job postings", deleted.rows_affected);
        }

        let mut inserted = 0;
        for chunk in postings.chunks(INSERT_BATCH_SIZE) {
            let models = chunk.iter().map(|posting| job_postings::ActiveModel {
                id: Set(posting.id.clone()),
                title: Set(posting.title.clone()),
                standard_job_id: Set(posting.standard_job_id.clone()),
                country_code: Set(posting.country_code.clone()),
                days_to_hire: Set(posting.days_to_hire),
            });

            inserted += job_postings::Entity::insert_many(models)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| DatabaseError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted)
    }

    pub async fn count(&self) -> DatabaseResult<u64> {
        job_postings::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }
}
