//! Days-to-hire statistics
//!
//! `aggregator` rebuilds the summary table from raw postings, `service` serves
//! read-only lookups over it, and `trimming` holds the per-partition math.

pub mod aggregator;
pub mod config;
pub mod service;
pub mod trimming;

pub use aggregator::{ComputedStatistics, RecomputeSummary, StatisticsAggregator, compute_statistics};
pub use config::AggregationConfig;
pub use service::StatisticsService;
pub use trimming::{TrimmedStatistics, trimmed_statistics};
