// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Lead time statistics
//!
//! Pure aggregation over lead-time samples in hours. Every function returns
//! `0.0` for an empty sample set.

use serde::{Deserialize, Serialize};

/// Lead times below this many hours are fast
pub const FAST_THRESHOLD_HOURS: f64 = 24.0;

/// Lead times at or above this many hours are slow
pub const SLOW_THRESHOLD_HOURS: f64 = 72.0;

fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut values = samples.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

/// Arithmetic mean
#[must_use]
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Middle value; the average of the two middle values for even counts
#[must_use]
pub fn median(samples: &[f64]) -> f64 {
    let values = sorted(samples);
    let n = values.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => values[n / 2],
        _ => (values[n / 2 - 1] + values[n / 2]) / 2.0,
    }
}

/// Nearest-rank percentile, `pct` in `(0, 100]`
///
/// The rank is `ceil(pct / 100 * n)`, clamped to the sample range.
#[must_use]
pub fn percentile(samples: &[f64], pct: u32) -> f64 {
    let values = sorted(samples);
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let rank = (n * pct.min(100) as usize).div_ceil(100);
    values[rank.clamp(1, n) - 1]
}

/// 90th percentile (nearest rank)
#[must_use]
pub fn p90(samples: &[f64]) -> f64 {
    percentile(samples, 90)
}

/// Smallest sample
#[must_use]
pub fn min(samples: &[f64]) -> f64 {
    samples.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Largest sample
#[must_use]
pub fn max(samples: &[f64]) -> f64 {
    samples.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Lead time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Under a day
    Fast,
    /// One to three days
    Medium,
    /// Three days or more
    Slow,
}

impl Bucket {
    /// Bucket for a lead time in hours
    #[must_use]
    pub fn of(hours: f64) -> Self {
        if hours < FAST_THRESHOLD_HOURS {
            Self::Fast
        } else if hours < SLOW_THRESHOLD_HOURS {
            Self::Medium
        } else {
            Self::Slow
        }
    }

    /// Human-readable range
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fast => "< 24h",
            Self::Medium => "24h - 72h",
            Self::Slow => ">= 72h",
        }
    }
}

/// Count and share of samples in one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketShare {
    /// Samples in the bucket
    pub count: usize,
    /// Percentage of all samples
    pub percent: f64,
}

/// Fast/medium/slow distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Under 24 hours
    pub fast: BucketShare,
    /// 24 to 72 hours
    pub medium: BucketShare,
    /// 72 hours or more
    pub slow: BucketShare,
}

impl Distribution {
    /// Bucket every sample
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Self {
        let (mut fast, mut medium, mut slow) = (0, 0, 0);
        for &hours in samples {
            match Bucket::of(hours) {
                Bucket::Fast => fast += 1,
                Bucket::Medium => medium += 1,
                Bucket::Slow => slow += 1,
            }
        }

        let total = samples.len();
        let share = |count: usize| BucketShare {
            count,
            percent: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
        };

        Self {
            fast: share(fast),
            medium: share(medium),
            slow: share(slow),
        }
    }

    /// Share for one bucket
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> BucketShare {
        match bucket {
            Bucket::Fast => self.fast,
            Bucket::Medium => self.medium,
            Bucket::Slow => self.slow,
        }
    }

    /// Number of samples bucketed
    #[must_use]
    pub fn total(&self) -> usize {
        self.fast.count + self.medium.count + self.slow.count
    }
}

/// Point estimates over one sample set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadTimeSummary {
    /// Number of samples
    pub count: usize,
    /// Mean hours
    pub mean: f64,
    /// Median hours
    pub median: f64,
    /// 90th percentile hours
    pub p90: f64,
    /// Shortest lead time
    pub min: f64,
    /// Longest lead time
    pub max: f64,
}

impl LeadTimeSummary {
    /// Compute every estimate
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Self {
        Self {
            count: samples.len(),
            mean: mean(samples),
            median: median(samples),
            p90: p90(samples),
            min: min(samples),
            max: max(samples),
        }
    }
}
