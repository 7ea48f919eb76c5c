use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One trimmed statistics row. `country_code = None` is the global row for the job.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "days_to_hire_statistics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub standard_job_id: String,
    pub country_code: Option<String>,
    pub min_days: f64,
    pub avg_days: f64,
    pub max_days: f64,
    pub job_postings_number: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
