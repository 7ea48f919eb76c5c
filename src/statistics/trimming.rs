//! Decile trimming over a single partition of days-to-hire values.
//!
//! Bucketing follows SQL `NTILE(10)`: buckets are equal-frequency by rank, the
//! first `n % 10` buckets hold one extra row, and equal values may land in
//! different buckets. Percentiles follow `percentile_cont`, interpolating
//! linearly between the two order statistics around `fraction * (n - 1)`.

/// Number of equal-frequency buckets a partition is split into
pub const DECILES: usize = 10;

/// Percentile reported as `min_days`
pub const LOWER_PERCENTILE: f64 = 0.1;

/// Percentile reported as `max_days`
pub const UPPER_PERCENTILE: f64 = 0.9;

/// Statistics for one partition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimmedStatistics {
    /// 10th percentile of the full partition
    pub min_days: f64,
    /// Mean of the values outside both extreme deciles, `None` when nothing is left
    pub avg_days: Option<f64>,
    /// 90th percentile of the full partition
    pub max_days: f64,
    /// Partition size before trimming
    pub total_count: usize,
    /// Values that contributed to `avg_days`
    pub kept_count: usize,
}

/// 1-based bucket of the row at 0-based `rank` when `total` rows are split into `buckets`.
pub fn ntile(rank: usize, total: usize, buckets: usize) -> usize {
    debug_assert!(buckets > 0 && rank < total);

    let base = total / buckets;
    let remainder = total % buckets;
    let rows_in_large_buckets = remainder * (base + 1);

    if rank < rows_in_large_buckets {
        rank / (base + 1) + 1
    } else {
        // Only reachable when base > 0
        remainder + (rank - rows_in_large_buckets) / base + 1
    }
}

/// Continuous percentile of an ascending slice; `None` for an empty slice.
pub fn percentile_cont(sorted: &[i32], fraction: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = fraction.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = (position.ceil() as usize).min(last);

    let lower_value = f64::from(sorted[lower]);
    let upper_value = f64::from(sorted[upper]);
    Some(lower_value + (position - lower as f64) * (upper_value - lower_value))
}

/// Trim the lowest and highest decile and summarize what remains.
///
/// Returns `None` for an empty partition.
pub fn trimmed_statistics(mut values: Vec<i32>) -> Option<TrimmedStatistics> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let total = values.len();
    let mut kept_sum = 0i64;
    let mut kept_count = 0usize;

    for (rank, &value) in values.iter().enumerate() {
        let ascending_decile = ntile(rank, total, DECILES);
        let descending_decile = ntile(total - 1 - rank, total, DECILES);
        if ascending_decile > 1 && descending_decile > 1 {
            kept_sum += i64::from(value);
            kept_count += 1;
        }
    }

    let avg_days = (kept_count > 0).then(|| kept_sum as f64 / kept_count as f64);

    Some(TrimmedStatistics {
        min_days: percentile_cont(&values, LOWER_PERCENTILE)?,
        avg_days,
        max_days: percentile_cont(&values, UPPER_PERCENTILE)?,
        total_count: total,
        kept_count,
    })
}
