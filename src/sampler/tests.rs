#![allow(clippy::unwrap_used, reason = "allow in test files")]

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

use super::*;
use crate::{
    buffer::{BYTES_PER_PIXEL, ImageViewMut},
    error::ErrorKind,
};

fn nz(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap()
}

fn job_for<'s>(
    src: &'s [u8],
    src_size: (usize, usize),
    dst: &mut [u8],
    dst_size: (usize, usize),
    filter: FilterKind,
) -> ResizeJob<'s> {
    let (sw, sh) = src_size;
    let (dw, dh) = dst_size;
    let src = ImageView::new(src, sw, sh, sw * BYTES_PER_PIXEL, PixelLayout::Rgba).unwrap();
    let dst = ImageViewMut::new(dst, dw, dh, dw * BYTES_PER_PIXEL, PixelLayout::Rgba).unwrap();
    ResizeJob::build(&ResizeRequest::new(src, dst, filter).unwrap()).unwrap()
}

#[test]
fn weights_sum_to_one() {
    for filter in FilterKind::ALL {
        for (src_len, dst_len) in [(1, 7), (7, 1), (10, 20), (20, 10), (33, 33), (640, 97)] {
            let sampler = AxisSampler::build("test", nz(src_len), nz(dst_len), filter).unwrap();
            assert_eq!(sampler.len(), dst_len);
            for d in 0..dst_len {
                let (first, weights) = sampler.taps(d);
                assert!(!weights.is_empty());
                assert!(first + weights.len() <= src_len, "{filter:?} {src_len}->{dst_len}");
                let sum: f32 = weights.iter().sum();
                assert!(
                    (sum - 1.0).abs() < 1e-4,
                    "{filter:?} {src_len}->{dst_len} at {d}: {sum}"
                );
            }
        }
    }
}

#[test]
fn interpolating_filters_are_identity_at_the_same_size() {
    for filter in [
        FilterKind::PointSample,
        FilterKind::Box,
        FilterKind::Triangle,
        FilterKind::CatmullRom,
    ] {
        let sampler = AxisSampler::build("test", nz(16), nz(16), filter).unwrap();
        for d in 0..16 {
            let (first, weights) = sampler.taps(d);
            assert_eq!(first, d, "{filter:?}");
            assert_eq!(weights, &[1.0], "{filter:?}");
        }
    }
}

#[test]
fn taps_past_the_edge_fold_onto_it() {
    let sampler = AxisSampler::build("test", nz(8), nz(8), FilterKind::Mitchell).unwrap();

    let (first, weights) = sampler.taps(0);
    assert_eq!(first, 0);
    // Taps left of 0 landed on 0; the one at +2 has zero weight and is trimmed.
    assert_eq!(weights.len(), 2);
    assert!(weights[0] > weights[1]);

    let (first, weights) = sampler.taps(7);
    assert_eq!(first + weights.len(), 8);
}

#[test]
fn point_sample_picks_the_covering_pixel() {
    let down = AxisSampler::build("test", nz(4), nz(2), FilterKind::PointSample).unwrap();
    assert_eq!(down.taps(0).0, 1);
    assert_eq!(down.taps(1).0, 3);

    let up = AxisSampler::build("test", nz(2), nz(4), FilterKind::PointSample).unwrap();
    let picked: Vec<_> = (0..4).map(|d| up.taps(d).0).collect();
    assert_eq!(picked, [0, 0, 1, 1]);
}

#[test]
fn default_filter_is_resolved_per_axis() {
    let down = AxisSampler::build("test", nz(100), nz(10), FilterKind::Default).unwrap();
    assert_eq!(down.filter(), FilterKind::Mitchell);
    let up = AxisSampler::build("test", nz(10), nz(100), FilterKind::Default).unwrap();
    assert_eq!(up.filter(), FilterKind::CatmullRom);
}

#[test]
fn downsampling_widens_the_kernel() {
    let same = AxisSampler::build("test", nz(100), nz(100), FilterKind::Triangle).unwrap();
    let down = AxisSampler::build("test", nz(100), nz(25), FilterKind::Triangle).unwrap();
    assert!(down.taps(12).1.len() > same.taps(50).1.len());
}

#[test]
fn oversized_tables_fail_to_allocate() {
    let err = AxisSampler::build("test", nz(2), nz(usize::MAX), FilterKind::Box).unwrap_err();
    assert!(matches!(err, ResizeError::Allocation(_)));
    assert_eq!(err.kind(), ErrorKind::ResourceAcquisition);
}

#[test]
fn source_span_covers_every_tap() {
    let sampler = AxisSampler::build("test", nz(50), nz(20), FilterKind::CatmullRom).unwrap();
    let span = sampler.source_span(5..9);
    for d in 5..9 {
        let (first, weights) = sampler.taps(d);
        assert!(span.start <= first);
        assert!(first + weights.len() <= span.end);
    }
}

#[test]
fn fresh_job_has_one_whole_split() {
    let src = vec![0u8; 4 * 4 * BYTES_PER_PIXEL];
    let mut dst = vec![0u8; 8 * 8 * BYTES_PER_PIXEL];
    let job = job_for(&src, (4, 4), &mut dst, (8, 8), FilterKind::Triangle);
    assert_eq!(job.split_count(), 1);
    assert_eq!(job.splits()[0].rows, 0..8);
    assert_eq!(job.splits()[0].source_rows, 0..4);
}

#[test]
fn point_sampling_is_not_alpha_weighted() {
    let src = vec![0u8; 4 * BYTES_PER_PIXEL];
    let mut dst = vec![0u8; 4 * BYTES_PER_PIXEL];
    let job = job_for(&src, (2, 2), &mut dst, (2, 2), FilterKind::PointSample);
    assert!(!job.alpha_weighted());
    let job = job_for(&src, (2, 2), &mut dst, (2, 2), FilterKind::Box);
    assert!(job.alpha_weighted());

    let src_view = ImageView::new(&src, 2, 2, 8, PixelLayout::RgbaPremultiplied).unwrap();
    let dst_view = ImageViewMut::new(&mut dst, 2, 2, 8, PixelLayout::RgbaPremultiplied).unwrap();
    let request = ResizeRequest::new(src_view, dst_view, FilterKind::Box).unwrap();
    assert!(!ResizeJob::build(&request).unwrap().alpha_weighted());
}

#[test]
fn partition_spreads_the_remainder_over_the_first_bands() {
    let src = vec![0u8; 10 * BYTES_PER_PIXEL];
    let mut dst = vec![0u8; 10 * BYTES_PER_PIXEL];
    let mut job =
        job_for(&src, (1, 10), &mut dst, (1, 10), FilterKind::Box).with_min_rows_per_split(nz(1));
    assert_eq!(job.partition(3).unwrap(), 3);
    let rows: Vec<_> = job.splits().iter().map(|split| split.rows.clone()).collect();
    assert_eq!(rows, [0..4, 4..7, 7..10]);
}

#[test]
fn partition_respects_min_rows_per_split() {
    let src = vec![0u8; 20 * BYTES_PER_PIXEL];
    let mut dst = vec![0u8; 20 * BYTES_PER_PIXEL];
    let mut job = job_for(&src, (1, 20), &mut dst, (1, 20), FilterKind::Box);
    assert_eq!(job.partition(8).unwrap(), 2);

    let mut dst = vec![0u8; 5 * BYTES_PER_PIXEL];
    let mut job = job_for(&src, (1, 20), &mut dst, (1, 5), FilterKind::Box);
    assert_eq!(job.partition(8).unwrap(), 1);
    assert_eq!(job.splits()[0].rows, 0..5);
}

#[test]
fn partition_of_zero_plans_one_split() {
    let src = vec![0u8; 64 * BYTES_PER_PIXEL];
    let mut dst = vec![0u8; 64 * BYTES_PER_PIXEL];
    let mut job = job_for(&src, (1, 64), &mut dst, (1, 64), FilterKind::Box);
    assert_eq!(job.partition(0).unwrap(), 1);
}

#[quickcheck]
fn partition_covers_every_row_once(height: u16, requested: u8, min_rows: u8) -> TestResult {
    let height = usize::from(height % 2048) + 1;
    let Some(min_rows) = NonZeroUsize::new(usize::from(min_rows)) else {
        return TestResult::discard();
    };

    let src = vec![0u8; 37 * BYTES_PER_PIXEL];
    let mut dst = vec![0u8; height * BYTES_PER_PIXEL];
    let mut job = job_for(&src, (1, 37), &mut dst, (1, height), FilterKind::Mitchell)
        .with_min_rows_per_split(min_rows);
    let count = job.partition(usize::from(requested)).unwrap();

    let splits = job.splits();
    if count != splits.len() || count == 0 || count > usize::from(requested).max(1) {
        return TestResult::failed();
    }
    if count > 1 && splits.iter().any(|split| split.rows.len() < min_rows.get()) {
        return TestResult::failed();
    }

    let mut next = 0;
    for split in splits {
        if split.rows.start != next || split.rows.is_empty() || split.source_rows.end > 37 {
            return TestResult::failed();
        }
        next = split.rows.end;
    }
    TestResult::from_bool(next == height)
}

#[test]
fn box_weights_follow_pixel_coverage() {
    let sampler = AxisSampler::build("test", nz(3), nz(2), FilterKind::Box).unwrap();

    let (first, weights) = sampler.taps(0);
    assert_eq!(first, 0);
    assert_eq!(weights.len(), 2);
    assert!((weights[0] - 2.0 / 3.0).abs() < 1e-6);
    assert!((weights[1] - 1.0 / 3.0).abs() < 1e-6);

    let (first, weights) = sampler.taps(1);
    assert_eq!(first, 1);
    assert!((weights[0] - 1.0 / 3.0).abs() < 1e-6);
    assert!((weights[1] - 2.0 / 3.0).abs() < 1e-6);
}

#[test]
fn clamped_request_builds_in_bounds_tables() {
    let src = vec![0u8; 9 * 7 * BYTES_PER_PIXEL];
    let mut dst = vec![0u8; 20 * 3 * BYTES_PER_PIXEL];
    let src_view = ImageView::new(&src, 9, 7, 9 * BYTES_PER_PIXEL, PixelLayout::Rgba).unwrap();
    let dst_view =
        ImageViewMut::new(&mut dst, 20, 3, 20 * BYTES_PER_PIXEL, PixelLayout::Rgba).unwrap();
    let request = ResizeRequest::new(src_view, dst_view, FilterKind::CatmullRom).unwrap();
    assert_eq!(request.edge, EdgeMode::Clamp);

    let job = ResizeJob::build(&request).unwrap();
    for d in 0..20 {
        let (first, weights) = job.horizontal().taps(d);
        assert!(first + weights.len() <= 9);
    }
    for d in 0..3 {
        let (first, weights) = job.vertical().taps(d);
        assert!(first + weights.len() <= 7);
    }
}
