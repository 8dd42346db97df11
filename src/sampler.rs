#[cfg(test)]
mod tests;

use std::{num::NonZeroUsize, ops::Range};

use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace};

use crate::{
    buffer::{Geometry, ImageView, PixelLayout},
    config::DEFAULT_MIN_ROWS_PER_SPLIT,
    error::ResizeError,
    filter::{self, FilterKind},
    request::{EdgeMode, ResizeRequest},
};

/// The source pixels feeding one destination coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contributor {
    /// First source index with a non-zero weight.
    pub first: usize,
    offset: usize,
    len: usize,
}

/// Weight table for one axis: one [`Contributor`] per destination coordinate.
///
/// Source indices are already clamped to the edge, so every tap is in bounds.
/// Weights of each contributor sum to one.
#[derive(Debug, Clone)]
pub struct AxisSampler {
    filter: FilterKind,
    contributors: Vec<Contributor>,
    coefficients: Vec<f32>,
}

impl AxisSampler {
    /// Builds the weight table mapping `src_len` samples onto `dst_len` samples.
    ///
    /// The kernel is widened by the scale factor when downsampling so that
    /// every source sample contributes. Box weights are the overlap of each
    /// source pixel with the box footprint. Taps falling outside the source
    /// fold their weight onto the nearest edge sample.
    pub fn build(
        axis: &'static str,
        src_len: NonZeroUsize,
        dst_len: NonZeroUsize,
        filter: FilterKind,
    ) -> Result<Self, ResizeError> {
        let scale = src_len.get() as f64 / dst_len.get() as f64;
        let filter = filter.resolve(scale);
        let last = src_len.get() - 1;

        let mut contributors = Vec::new();
        contributors
            .try_reserve_exact(dst_len.get())
            .map_err(|_| ResizeError::Allocation("sampler contributors"))?;
        let mut coefficients = Vec::new();

        if filter == FilterKind::PointSample {
            coefficients
                .try_reserve_exact(dst_len.get())
                .map_err(|_| ResizeError::Allocation("sampler coefficients"))?;
            for d in 0..dst_len.get() {
                let first = (((d as f64 + 0.5) * scale).floor() as usize).min(last);
                contributors.push(Contributor {
                    first,
                    offset: d,
                    len: 1,
                });
                coefficients.push(1.0);
            }
            return Ok(Self {
                filter,
                contributors,
                coefficients,
            });
        }

        let filter_scale = scale.max(1.0);
        let radius = filter.support() * filter_scale;
        let max_taps = ((2.0 * radius).ceil() as usize + 2).min(src_len.get());
        coefficients
            .try_reserve_exact(dst_len.get().saturating_mul(max_taps))
            .map_err(|_| ResizeError::Allocation("sampler coefficients"))?;

        let clamp = |i: i64| -> usize { usize::try_from(i).unwrap_or(0).min(last) };
        let mut window: SmallVec<[f64; 16]> = SmallVec::new();

        for d in 0..dst_len.get() {
            let centre = (d as f64 + 0.5) * scale - 0.5;
            let lo = (centre - radius).floor() as i64;
            let hi = (centre + radius).ceil() as i64;
            let base = clamp(lo);

            window.clear();
            window.resize(clamp(hi) - base + 1, 0.0);
            for i in lo..=hi {
                let weight = if filter == FilterKind::Box {
                    filter::box_coverage(i as f64 - centre, radius)
                } else {
                    filter.weight((i as f64 - centre) / filter_scale)
                };
                if weight != 0.0 {
                    window[clamp(i) - base] += weight;
                }
            }

            let fail = |reason| ResizeError::SamplerConstruction {
                axis,
                coordinate: d,
                reason,
            };
            let start = window
                .iter()
                .position(|&w| w != 0.0)
                .ok_or_else(|| fail("no source sample has weight"))?;
            let end = window.iter().rposition(|&w| w != 0.0).unwrap_or(start) + 1;
            let sum: f64 = window[start..end].iter().sum();
            if sum.abs() < f64::EPSILON {
                return Err(fail("weights cancel out"));
            }

            let offset = coefficients.len();
            coefficients.extend(window[start..end].iter().map(|&w| (w / sum) as f32));
            contributors.push(Contributor {
                first: base + start,
                offset,
                len: end - start,
            });
        }

        Ok(Self {
            filter,
            contributors,
            coefficients,
        })
    }

    /// The kernel actually used, with `Default` resolved.
    #[must_use]
    pub const fn filter(&self) -> FilterKind {
        self.filter
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    /// First source index and weights for destination coordinate `d`.
    #[must_use]
    pub fn taps(&self, d: usize) -> (usize, &[f32]) {
        let c = self.contributors[d];
        (c.first, &self.coefficients[c.offset..c.offset + c.len])
    }

    /// Source indices read by the destination coordinates in `dst`.
    #[must_use]
    pub fn source_span(&self, dst: Range<usize>) -> Range<usize> {
        self.contributors[dst]
            .iter()
            .fold(usize::MAX..0, |span, c| {
                span.start.min(c.first)..span.end.max(c.first + c.len)
            })
    }
}

/// A band of destination rows that can be computed on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Destination rows written by this split.
    pub rows: Range<usize>,
    /// Source rows read by this split.
    pub source_rows: Range<usize>,
}

/// Precomputed state for one resize: both weight tables and the split plan.
///
/// A freshly built job has a single split covering every destination row.
/// The tables are immutable once built, so `&ResizeJob` can be shared by all
/// split threads.
#[derive(Debug)]
pub struct ResizeJob<'s> {
    src: ImageView<'s>,
    dst: Geometry,
    horizontal: AxisSampler,
    vertical: AxisSampler,
    alpha_weighted: bool,
    min_rows_per_split: NonZeroUsize,
    splits: SmallVec<[Split; 8]>,
}

impl<'s> ResizeJob<'s> {
    pub fn build(request: &ResizeRequest<'s, '_>) -> Result<Self, ResizeError> {
        let src = request.src;
        let dst = request.dst.geometry();
        let (horizontal, vertical) = match request.edge {
            EdgeMode::Clamp => (
                AxisSampler::build("horizontal", src.geometry().width, dst.width, request.filter)?,
                AxisSampler::build("vertical", src.geometry().height, dst.height, request.filter)?,
            ),
        };

        // Point sampling copies pixels verbatim, transparent ones included.
        let alpha_weighted = src.format().layout == PixelLayout::Rgba
            && request.filter != FilterKind::PointSample;

        let rows = 0..dst.height.get();
        let whole = Split {
            source_rows: vertical.source_span(rows.clone()),
            rows,
        };

        debug!(
            src_width = src.width(),
            src_height = src.height(),
            dst_width = dst.width.get(),
            dst_height = dst.height.get(),
            horizontal_filter = ?horizontal.filter(),
            vertical_filter = ?vertical.filter(),
            alpha_weighted,
            "built sampler tables"
        );

        Ok(Self {
            src,
            dst,
            horizontal,
            vertical,
            alpha_weighted,
            min_rows_per_split: DEFAULT_MIN_ROWS_PER_SPLIT,
            splits: smallvec![whole],
        })
    }

    #[must_use]
    pub fn with_min_rows_per_split(mut self, min_rows_per_split: NonZeroUsize) -> Self {
        self.min_rows_per_split = min_rows_per_split;
        self
    }

    /// Divides the destination rows into at most `requested` contiguous bands.
    ///
    /// Returns the number of bands actually planned, which is lower than
    /// `requested` when the image is too short to give every band
    /// `min_rows_per_split` rows. An error leaves the previous plan in place.
    pub fn partition(&mut self, requested: usize) -> Result<usize, ResizeError> {
        let height = self.dst.height.get();
        let most = (height / self.min_rows_per_split.get()).max(1);
        let count = requested.clamp(1, most);

        let mut plan: SmallVec<[Split; 8]> = SmallVec::new();
        plan.try_reserve_exact(count)
            .map_err(|_| ResizeError::Allocation("split plan"))?;

        let base = height / count;
        let extra = height % count;
        let mut start = 0;
        for i in 0..count {
            let end = start + base + usize::from(i < extra);
            plan.push(Split {
                source_rows: self.vertical.source_span(start..end),
                rows: start..end,
            });
            start = end;
        }

        debug!(requested, actual = count, height, "partitioned destination rows");
        self.splits = plan;
        Ok(count)
    }

    #[must_use]
    pub fn split_count(&self) -> usize {
        self.splits.len()
    }

    #[must_use]
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    #[must_use]
    pub const fn source(&self) -> ImageView<'s> {
        self.src
    }

    #[must_use]
    pub const fn destination(&self) -> Geometry {
        self.dst
    }

    #[must_use]
    pub const fn horizontal(&self) -> &AxisSampler {
        &self.horizontal
    }

    #[must_use]
    pub const fn vertical(&self) -> &AxisSampler {
        &self.vertical
    }

    #[must_use]
    pub const fn alpha_weighted(&self) -> bool {
        self.alpha_weighted
    }
}

impl Drop for ResizeJob<'_> {
    fn drop(&mut self) {
        trace!(
            splits = self.splits.len(),
            coefficients = self.horizontal.coefficients.len() + self.vertical.coefficients.len(),
            "releasing sampler tables"
        );
    }
}
