
use std::thread;

use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace, warn};

use crate::{
    buffer::ImageViewMut,
    error::{BufferRole, ResizeError},
    resample,
    sampler::ResizeJob,
};

pub type SplitResults = SmallVec<[Result<(), ResizeError>; 8]>;

/// Per-split outcomes of [`run_splits`].
#[derive(Debug)]
pub struct SplitRun {
    /// One entry per split, in split order.
    pub results: SplitResults,
    /// Threads started for this run. Zero when the job ran on the caller's thread.
    pub threads_spawned: usize,
}

/// Computes the rows owned by split `index` into `band`.
///
/// `band` must start at the split's first destination row. Only the source
/// and the job's immutable tables are read.
pub fn execute_split(job: &ResizeJob<'_>, index: usize, band: &mut [u8]) -> Result<(), ResizeError> {
    let split = job.splits().get(index).ok_or(ResizeError::UnknownSplit {
        index,
        count: job.split_count(),
    })?;
    trace!(
        index,
        rows = ?split.rows,
        source_rows = ?split.source_rows,
        "executing split"
    );
    resample::resample_rows(job, split.rows.clone(), band)
}

/// Runs every split of `job` against `dst` and waits for all of them.
///
/// With more than one split each split gets its own thread, created for this
/// call and joined before it returns. A failing split does not stop the
/// others. With a single split the work happens on the calling thread.
pub fn run_splits(job: &ResizeJob<'_>, dst: &mut ImageViewMut<'_>) -> SplitRun {
    run_splits_with(job, dst, execute_split)
}

/// [`run_splits`] with `work` computing each split's band.
fn run_splits_with<F>(job: &ResizeJob<'_>, dst: &mut ImageViewMut<'_>, work: F) -> SplitRun
where
    F: Fn(&ResizeJob<'_>, usize, &mut [u8]) -> Result<(), ResizeError> + Sync,
{
    let expected = job.destination();
    let actual = dst.geometry();
    if expected.width != actual.width || expected.height != actual.height {
        return SplitRun::single(Err(ResizeError::DimensionMismatch {
            expected_width: expected.width.get(),
            expected_height: expected.height.get(),
            actual_width: actual.width.get(),
            actual_height: actual.height.get(),
        }));
    }
    if expected.stride != actual.stride {
        return SplitRun::single(Err(ResizeError::InvalidGeometry {
            role: BufferRole::Destination,
            reason: "stride differs from the one the job was built for",
        }));
    }

    if job.split_count() <= 1 {
        return SplitRun::single(work(job, 0, dst.data_mut()));
    }

    let bands = match dst.row_bands_mut(job.splits().iter().map(|split| split.rows.clone())) {
        Ok(bands) => bands,
        Err(err) => return SplitRun::single(Err(err)),
    };

    let work = &work;
    thread::scope(|scope| {
        let handles: Vec<_> = bands
            .into_iter()
            .enumerate()
            .map(|(index, band)| {
                thread::Builder::new()
                    .name(format!("resize-split-{index}"))
                    .spawn_scoped(scope, move || work(job, index, band))
                    .map_err(|source| ResizeError::SpawnFailed { index, source })
            })
            .collect();
        let threads_spawned = handles.iter().filter(|handle| handle.is_ok()).count();
        debug!(splits = handles.len(), threads_spawned, "dispatched splits");

        let results = handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| {
                handle.and_then(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(ResizeError::SplitPanicked(index)))
                })
            })
            .collect();

        SplitRun {
            results,
            threads_spawned,
        }
    })
}

impl SplitRun {
    fn single(result: Result<(), ResizeError>) -> Self {
        Self {
            results: smallvec![result],
            threads_spawned: 0,
        }
    }
}

/// Folds per-split results into one outcome.
///
/// Succeeds only if every split succeeded. A lone failed split is returned
/// as is; failures among several splits are reported together.
pub fn aggregate<I>(results: I) -> Result<(), ResizeError>
where
    I: IntoIterator<Item = Result<(), ResizeError>>,
{
    let mut total = 0;
    let mut failed = 0;
    let mut first = None;

    for (index, result) in results.into_iter().enumerate() {
        total += 1;
        if let Err(err) = result {
            warn!(index, error = %err, "split failed");
            failed += 1;
            first.get_or_insert(err);
        }
    }

    match first {
        None if total == 0 => Err(ResizeError::UnknownSplit { index: 0, count: 0 }),
        None => Ok(()),
        Some(err) if total == 1 => Err(err),
        Some(err) => Err(ResizeError::PartialFailure {
            failed,
            total,
            first: Box::new(err),
        }),
    }
}
