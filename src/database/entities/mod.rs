pub mod days_to_hire_statistics;
pub mod job_postings;

pub use days_to_hire_statistics::Entity as DaysToHireStatistics;
pub use job_postings::Entity as JobPostings;

// Type aliases
pub type JobPosting = job_postings::Model;
pub type StatisticsRecord = days_to_hire_statistics::Model;
