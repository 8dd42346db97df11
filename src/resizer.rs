use tracing::{debug, warn};

use crate::{
    buffer::{ImageView, ImageViewMut},
    classify,
    config::ResizeConfig,
    direct,
    error::ResizeError,
    executor,
    filter::FilterKind,
    request::ResizeRequest,
    sampler::ResizeJob,
    surface::{Surface, SurfaceMut},
};

/// Entry point for resizing, holding the tunables that pick the execution path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resizer {
    config: ResizeConfig,
}

impl Resizer {
    #[must_use]
    pub const fn new(config: ResizeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ResizeConfig {
        &self.config
    }

    /// Resamples `src` into `dst` with clamp-to-edge boundaries.
    ///
    /// Small resizes run on the calling thread. Large ones are split into row
    /// bands computed on separate threads; the result is the same either way.
    /// On error the destination contents are unspecified.
    pub fn resize(
        &self,
        src: ImageView<'_>,
        dst: ImageViewMut<'_>,
        filter: FilterKind,
    ) -> Result<(), ResizeError> {
        let mut request = ResizeRequest::new(src, dst, filter)?;

        if !classify::should_parallelize(request.src_pixels(), request.dst_pixels(), &self.config)
        {
            return direct::resize_direct(&mut request);
        }

        let mut job =
            ResizeJob::build(&request)?.with_min_rows_per_split(self.config.min_rows_per_split());
        let requested = self.config.split_count().get();
        if let Err(err) = job.partition(requested) {
            warn!(error = %err, "could not partition, resizing on the calling thread");
            drop(job);
            return direct::resize_direct(&mut request);
        }

        let run = executor::run_splits(&job, &mut request.dst);
        debug!(
            splits = run.results.len(),
            threads = run.threads_spawned,
            "splits joined"
        );
        let outcome = executor::aggregate(run.results);
        drop(job);
        outcome
    }

    /// Locks both surfaces, resizes, and unlocks them again.
    ///
    /// The source is locked first and released last, so a failed destination
    /// lock still releases the source before this returns.
    pub fn resize_surfaces<S, D>(
        &self,
        src: &S,
        dst: &mut D,
        filter: FilterKind,
    ) -> Result<(), ResizeError>
    where
        S: Surface,
        D: SurfaceMut,
    {
        src.lock_pixels(|src| dst.lock_pixels_mut(|dst| self.resize(src, dst, filter)))??
    }

    /// Resizes `sources[i]` into `destinations[i]` for every `i`.
    ///
    /// Returns how many pairs succeeded. A failing pair is logged and skipped.
    /// Mismatched lengths are rejected before any pair is touched.
    pub fn resize_batch<S, D>(
        &self,
        sources: &[S],
        destinations: &mut [D],
        filter: FilterKind,
    ) -> Result<usize, ResizeError>
    where
        S: Surface,
        D: SurfaceMut,
    {
        if sources.len() != destinations.len() {
            return Err(ResizeError::BatchLengthMismatch {
                sources: sources.len(),
                destinations: destinations.len(),
            });
        }

        let mut succeeded = 0;
        for (index, (src, dst)) in sources.iter().zip(destinations.iter_mut()).enumerate() {
            match self.resize_surfaces(src, dst, filter) {
                Ok(()) => succeeded += 1,
                Err(err) => warn!(index, error = %err, "batch resize failed"),
            }
        }

        debug!(succeeded, total = sources.len(), "batch finished");
        Ok(succeeded)
    }
}
