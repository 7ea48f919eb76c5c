use super::JobPosting;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobPosting::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobPosting::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobPosting::Title).string().not_null())
                    .col(ColumnDef::new(JobPosting::StandardJobId).string().not_null())
                    .col(ColumnDef::new(JobPosting::CountryCode).string().null())
                    .col(ColumnDef::new(JobPosting::DaysToHire).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_job_posting_standard_job_id")
                    .table(JobPosting::Table)
                    .col(JobPosting::StandardJobId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobPosting::Table).to_owned())
            .await
    }
}
