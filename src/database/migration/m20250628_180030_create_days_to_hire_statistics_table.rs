use super::DaysToHireStatistics;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DaysToHireStatistics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DaysToHireStatistics::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DaysToHireStatistics::StandardJobId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DaysToHireStatistics::CountryCode)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DaysToHireStatistics::MinDays)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DaysToHireStatistics::AvgDays)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DaysToHireStatistics::MaxDays)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DaysToHireStatistics::JobPostingsNumber)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup path for (job, country) and (job, NULL). Not unique: NULLs never collide
        // in a unique index, so one-row-per-key is kept by the aggregator instead.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_days_to_hire_statistics_job_country")
                    .table(DaysToHireStatistics::Table)
                    .col(DaysToHireStatistics::StandardJobId)
                    .col(DaysToHireStatistics::CountryCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DaysToHireStatistics::Table).to_owned())
            .await
    }
}
