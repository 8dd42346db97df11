
use std::num::NonZeroUsize;

use anyhow::{Result, bail};

use crate::classify;

/// Combined source + destination pixel count above which splitting pays off.
/// Tuned empirically, not derived.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1_000_000;

/// Upper bound on concurrent splits per resize.
// SAFETY: non-zero constant
pub const DEFAULT_MAX_SPLITS: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(8) };

/// Bands thinner than this are not worth a thread of their own.
// SAFETY: non-zero constant
pub const DEFAULT_MIN_ROWS_PER_SPLIT: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(8) };

/// Tunables for deciding when and how wide to parallelize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeConfig {
    parallel_threshold: usize,
    max_splits: NonZeroUsize,
    min_rows_per_split: NonZeroUsize,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            max_splits: DEFAULT_MAX_SPLITS,
            min_rows_per_split: DEFAULT_MIN_ROWS_PER_SPLIT,
        }
    }
}

impl ResizeConfig {
    /// Builds a config, falling back to the defaults for every `None`.
    pub fn new(
        parallel_threshold: Option<i64>,
        max_splits: Option<i64>,
        min_rows_per_split: Option<i64>,
    ) -> Result<Self> {
        let defaults = Self::default();

        let parallel_threshold = match parallel_threshold {
            None => defaults.parallel_threshold,
            Some(val) => match usize::try_from(val) {
                Ok(val) => val,
                Err(_) => bail!("Invalid value for 'parallel_threshold', must be >= 0, got {val}."),
            },
        };
        let max_splits = match max_splits {
            None => defaults.max_splits,
            Some(val) => positive(val, "max_splits")?,
        };
        let min_rows_per_split = match min_rows_per_split {
            None => defaults.min_rows_per_split,
            Some(val) => positive(val, "min_rows_per_split")?,
        };

        Ok(Self {
            parallel_threshold,
            max_splits,
            min_rows_per_split,
        })
    }

    #[must_use]
    pub const fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    #[must_use]
    pub const fn max_splits(&self) -> NonZeroUsize {
        self.max_splits
    }

    #[must_use]
    pub const fn min_rows_per_split(&self) -> NonZeroUsize {
        self.min_rows_per_split
    }

    /// Number of splits to request: hardware concurrency capped by `max_splits`.
    #[must_use]
    pub fn split_count(&self) -> NonZeroUsize {
        let detected = i64::try_from(classify::hardware_concurrency()).unwrap_or(i64::MAX);
        classify::clamp_split_count(detected, self.max_splits)
    }
}

fn positive(val: i64, name: &str) -> Result<NonZeroUsize> {
    match usize::try_from(val).ok().and_then(NonZeroUsize::new) {
        Some(val) => Ok(val),
        None => bail!("Invalid value for '{name}', must be >= 1, got {val}."),
    }
}
