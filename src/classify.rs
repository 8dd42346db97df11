
use std::{num::NonZeroUsize, sync::OnceLock, thread};

use crate::config::ResizeConfig;

static HARDWARE_CONCURRENCY: OnceLock<usize> = OnceLock::new();

/// Whether a resize is big enough for the split path to beat the single-shot path.
///
/// Thread creation and per-split setup dominate below
/// [`ResizeConfig::parallel_threshold`] combined pixels.
#[must_use]
pub fn should_parallelize(src_pixels: usize, dst_pixels: usize, config: &ResizeConfig) -> bool {
    src_pixels.saturating_add(dst_pixels) > config.parallel_threshold()
}

/// Hardware threads reported by the OS, or 0 if it could not tell.
///
/// Detected once per process; concurrent first callers wait for that result.
pub fn hardware_concurrency() -> usize {
    *HARDWARE_CONCURRENCY.get_or_init(|| {
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(0)
    })
}

/// Clamps a requested split count into `1..=cap`.
#[must_use]
pub fn clamp_split_count(requested: i64, cap: NonZeroUsize) -> NonZeroUsize {
    let requested = usize::try_from(requested).unwrap_or(0);
    NonZeroUsize::new(requested.min(cap.get())).unwrap_or(NonZeroUsize::MIN)
}

/// Hardware concurrency clamped to `1..=8`, the split count of a default config.
#[must_use]
pub fn optimal_split_count() -> NonZeroUsize {
    ResizeConfig::default().split_count()
}
