use tracing::debug;

use crate::{error::ResizeError, request::ResizeRequest, resample, sampler::ResizeJob};

/// Resizes in one pass on the calling thread, without a split plan.
///
/// Produces the same bytes as the split path for any number of splits.
pub fn resize_direct(request: &mut ResizeRequest<'_, '_>) -> Result<(), ResizeError> {
    let job = ResizeJob::build(request)?;
    let rows = 0..request.dst.height();
    debug!(rows = rows.len(), "resizing on the calling thread");
    resample::resample_rows(&job, rows, request.dst.data_mut())
}
