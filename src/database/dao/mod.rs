pub mod job_postings;
pub mod statistics;

pub use job_postings::{DaysToHireSample, JobPostingsDao};
pub use statistics::StatisticsDao;
