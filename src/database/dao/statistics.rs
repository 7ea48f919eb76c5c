use crate::database::entities::{StatisticsRecord, days_to_hire_statistics};
use crate::database::{DatabaseError, DatabaseResult};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};

/// Rows per multi-row INSERT; keeps bound parameters well under SQLite's limit.
const INSERT_BATCH_SIZE: usize = 100;

/// Advisory lock key taken by `replace_all` on PostgreSQL ("dthstats" in ASCII).
const REPLACE_LOCK_KEY: i64 = 0x6474_6873_7461_7473;

/// Days-to-hire statistics DAO for database operations
pub struct StatisticsDao {
    db: DatabaseConnection,
}

impl StatisticsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Exact-key lookup. `None` matches only the global (NULL country) row.
    pub async fn find(
        &self,
        standard_job_id: &str,
        country_code: Option<&str>,
    ) -> DatabaseResult<Option<StatisticsRecord>> {
        let mut select = days_to_hire_statistics::Entity::find()
            .filter(days_to_hire_statistics::Column::StandardJobId.eq(standard_job_id));

        select = match country_code {
            Some(country_code) => {
                select.filter(days_to_hire_statistics::Column::CountryCode.eq(country_code))
            }
            None => select.filter(days_to_hire_statistics::Column::CountryCode.is_null()),
        };

        let record = select
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(record)
    }

    /// Distinct job ids present in the summary table
    pub async fn get_job_ids(&self) -> DatabaseResult<Vec<String>> {
        let mut job_ids: Vec<String> = days_to_hire_statistics::Entity::find()
            .select_only()
            .column(days_to_hire_statistics::Column::StandardJobId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        // Byte order regardless of the server collation
        job_ids.sort();
        Ok(job_ids)
    }

    /// Distinct non-null country codes recorded for a job
    pub async fn get_country_codes(&self, standard_job_id: &str) -> DatabaseResult<Vec<String>> {
        let mut country_codes: Vec<String> = days_to_hire_statistics::Entity::find()
            .select_only()
            .column(days_to_hire_statistics::Column::CountryCode)
            .filter(days_to_hire_statistics::Column::StandardJobId.eq(standard_job_id))
            .filter(days_to_hire_statistics::Column::CountryCode.is_not_null())
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        // Byte order regardless of the server collation
        country_codes.sort();
        Ok(country_codes)
    }

    /// Whole table ordered by job id, then country code
    pub async fn get_all(&self) -> DatabaseResult<Vec<StatisticsRecord>> {
        let records = days_to_hire_statistics::Entity::find()
            .order_by_asc(days_to_hire_statistics::Column::StandardJobId)
            .order_by_asc(days_to_hire_statistics::Column::CountryCode)
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records)
    }

    /// Store a single statistics row as-is
    pub async fn store(&self, record: &StatisticsRecord) -> DatabaseResult<()> {
        days_to_hire_statistics::Entity::insert(Self::to_active_model(record))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(())
    }

    /// Replace the whole table with `records` in a single transaction.
    ///
    /// Nothing becomes visible until commit; any error drops the transaction, which
    /// rolls back and leaves the previous snapshot in place.
    pub async fn replace_all(&self, records: &[StatisticsRecord]) -> DatabaseResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        if txn.get_database_backend() == DbBackend::Postgres {
            txn.execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT pg_advisory_xact_lock($1)",
                [REPLACE_LOCK_KEY.into()],
            ))
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;
        }

        let deleted = days_to_hire_statistics::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;
        tracing::debug!("Cleared {} existing statistics rows", deleted.rows_affected);

        let mut inserted = 0;
        for chunk in records.chunks(INSERT_BATCH_SIZE) {
            inserted += days_to_hire_statistics::Entity::insert_many(
                chunk.iter().map(Self::to_active_model),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted)
    }

    fn to_active_model(record: &StatisticsRecord) -> days_to_hire_statistics::ActiveModel {
        days_to_hire_statistics::ActiveModel {
            id: ActiveValue::NotSet,
            standard_job_id: Set(record.standard_job_id.clone()),
            country_code: Set(record.country_code.clone()),
            min_days: Set(record.min_days),
            avg_days: Set(record.avg_days),
            max_days: Set(record.max_days),
            job_postings_number: Set(record.job_postings_number),
        }
    }
}
