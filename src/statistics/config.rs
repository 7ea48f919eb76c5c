use serde::{Deserialize, Serialize};

/// Aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Groups with fewer postings than this produce no statistics row
    #[serde(default = "default_min_postings")]
    pub min_postings: u32,
}

fn default_min_postings() -> u32 {
    5
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            min_postings: default_min_postings(),
        }
    }
}
