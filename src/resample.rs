
use std::ops::Range;

use crate::{
    buffer::{BYTES_PER_PIXEL, ImageView},
    error::{BufferRole, ResizeError},
    sampler::{AxisSampler, ResizeJob},
};

/// Computes destination `rows` of `job` into `band`.
///
/// `band` starts at the first byte of `rows.start` and uses the destination
/// stride. Every row is computed from the source and the job's tables alone,
/// so the output of a row does not depend on how the rows were grouped.
pub fn resample_rows(
    job: &ResizeJob<'_>,
    rows: Range<usize>,
    band: &mut [u8],
) -> Result<(), ResizeError> {
    let src = job.source();
    let dst = job.destination();

    if rows.end > dst.height.get() || band.len() < dst.band_len(rows.len()) {
        return Err(ResizeError::InvalidGeometry {
            role: BufferRole::Destination,
            reason: "band is shorter than its rows",
        });
    }

    let scratch_len = src.width() * BYTES_PER_PIXEL;
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(scratch_len)
        .map_err(|_| ResizeError::Allocation("scratch row"))?;
    scratch.resize(scratch_len, 0.0f32);

    let row_bytes = dst.row_bytes();
    for (i, y) in rows.enumerate() {
        let (first, weights) = job.vertical().taps(y);
        vertical_pass(&src, first, weights, job.alpha_weighted(), &mut scratch);

        let start = i * dst.stride;
        horizontal_pass(
            job.horizontal(),
            &scratch,
            job.alpha_weighted(),
            &mut band[start..start + row_bytes],
        );
    }

    Ok(())
}

/// Blends source rows `first..first + weights.len()` into `scratch`.
fn vertical_pass(
    src: &ImageView<'_>,
    first: usize,
    weights: &[f32],
    alpha_weighted: bool,
    scratch: &mut [f32],
) {
    scratch.fill(0.0);

    for (k, &weight) in weights.iter().enumerate() {
        let row = src.row(first + k);
        for (acc, px) in scratch
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(row.chunks_exact(BYTES_PER_PIXEL))
        {
            let alpha = f32::from(px[3]);
            let cover = if alpha_weighted { alpha / 255.0 } else { 1.0 };
            acc[0] += f32::from(px[0]) * cover * weight;
            acc[1] += f32::from(px[1]) * cover * weight;
            acc[2] += f32::from(px[2]) * cover * weight;
            acc[3] += alpha * weight;
        }
    }
}

/// Applies the horizontal taps to one intermediate row and stores the result.
fn horizontal_pass(sampler: &AxisSampler, scratch: &[f32], alpha_weighted: bool, out: &mut [u8]) {
    for (x, px) in out.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let (first, weights) = sampler.taps(x);
        let mut acc = [0.0f32; 4];
        for (k, &weight) in weights.iter().enumerate() {
            let start = (first + k) * BYTES_PER_PIXEL;
            let sample = &scratch[start..start + BYTES_PER_PIXEL];
            for c in 0..BYTES_PER_PIXEL {
                acc[c] += sample[c] * weight;
            }
        }

        if alpha_weighted {
            unweight(&mut acc);
        }
        for c in 0..BYTES_PER_PIXEL {
            px[c] = to_u8(acc[c]);
        }
    }
}

/// Divides colour by the filtered alpha. Colour of invisible pixels is zeroed.
fn unweight(acc: &mut [f32; 4]) {
    let alpha = acc[3];
    if alpha < 0.5 {
        acc[..3].fill(0.0);
    } else {
        let inv = 255.0 / alpha;
        for c in &mut acc[..3] {
            *c *= inv;
        }
    }
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
