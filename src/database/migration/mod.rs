use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250313_100642_create_job_posting_table;
mod m20250628_180030_create_days_to_hire_statistics_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250313_100642_create_job_posting_table::Migration),
            Box::new(m20250628_180030_create_days_to_hire_statistics_table::Migration),
        ]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum JobPosting {
    Table,
    Id,
    Title,
    StandardJobId,
    CountryCode,
    DaysToHire,
}

#[derive(Iden)]
pub enum DaysToHireStatistics {
    Table,
    Id,
    StandardJobId,
    CountryCode,
    MinDays,
    AvgDays,
    MaxDays,
    JobPostingsNumber,
}
