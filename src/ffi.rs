//! C ABI for hosts that own and lock the pixel memory themselves.

use core::slice;

use tracing::warn;

use crate::{
    buffer::{ImageView, ImageViewMut, PixelLayout},
    error::{BufferRole, ResizeError},
    filter::FilterKind,
    resizer::Resizer,
    surface::{Surface, SurfaceMut},
};

/// An RGBA8 buffer locked by the host.
///
/// A null `pixels` pointer means the host failed to lock the buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawImage {
    pub pixels: *mut u8,
    pub width: u32,
    pub height: u32,
    /// Bytes per row.
    pub stride: u32,
}

/// A [`RawImage`] whose validity was promised by an `unsafe` caller.
struct Pinned(RawImage);

impl Surface for Pinned {
    fn lock_pixels<R>(&self, f: impl FnOnce(ImageView<'_>) -> R) -> Result<R, ResizeError> {
        let RawImage {
            pixels,
            width,
            height,
            stride,
        } = self.0;
        if pixels.is_null() {
            return Err(ResizeError::LockFailed(BufferRole::Source));
        }
        // SAFETY: `Pinned` is only built by the extern functions below, whose
        // callers guarantee the pointer covers the described image.
        let view = unsafe {
            ImageView::from_raw_parts(
                pixels,
                width as usize,
                height as usize,
                stride as usize,
                PixelLayout::Rgba,
            )
        }?;
        Ok(f(view))
    }
}

impl SurfaceMut for Pinned {
    fn lock_pixels_mut<R>(
        &mut self,
        f: impl FnOnce(ImageViewMut<'_>) -> R,
    ) -> Result<R, ResizeError> {
        let RawImage {
            pixels,
            width,
            height,
            stride,
        } = self.0;
        if pixels.is_null() {
            return Err(ResizeError::LockFailed(BufferRole::Destination));
        }
        // SAFETY: as above, and the caller guarantees nothing else touches
        // the destination during the call.
        let view = unsafe {
            ImageViewMut::from_raw_parts(
                pixels,
                width as usize,
                height as usize,
                stride as usize,
                PixelLayout::Rgba,
            )
        }?;
        Ok(f(view))
    }
}

fn parse_filter(filter: i32) -> Option<FilterKind> {
    FilterKind::try_from(filter)
        .inspect_err(|err| warn!("{err:#}"))
        .ok()
}

/// Resizes `src` into `dst`. Returns `false` on any failure.
///
/// # Safety
/// Each non-null `pixels` must point to at least
/// `(height - 1) * stride + width * 4` bytes that stay valid for the call.
/// `dst` must not overlap `src` and must not be accessed by anyone else
/// until this returns.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rgba_resize(src: RawImage, dst: RawImage, filter: i32) -> bool {
    let Some(filter) = parse_filter(filter) else {
        return false;
    };

    match Resizer::default().resize_surfaces(&Pinned(src), &mut Pinned(dst), filter) {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "resize failed");
            false
        }
    }
}

/// Resizes `sources[i]` into `destinations[i]` for every `i`.
///
/// Returns how many pairs succeeded, or -1 if the counts differ, an array
/// pointer is null, or `filter` is unknown. Nothing is resized in that case.
///
/// # Safety
/// `sources` and `destinations` must point to `source_count` and
/// `destination_count` images respectively, each meeting the requirements of
/// [`rgba_resize`]. No destination may overlap any other buffer in the batch.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rgba_resize_batch(
    sources: *const RawImage,
    source_count: usize,
    destinations: *const RawImage,
    destination_count: usize,
    filter: i32,
) -> i64 {
    if source_count != destination_count {
        warn!(source_count, destination_count, "batch lengths differ");
        return -1;
    }
    let Some(filter) = parse_filter(filter) else {
        return -1;
    };
    if source_count == 0 {
        return 0;
    }
    if sources.is_null() || destinations.is_null() {
        warn!("batch array pointer is null");
        return -1;
    }

    // SAFETY: the caller guarantees both arrays hold `source_count` images
    let (sources, destinations) = unsafe {
        (
            slice::from_raw_parts(sources, source_count),
            slice::from_raw_parts(destinations, destination_count),
        )
    };
    let sources: Vec<Pinned> = sources.iter().copied().map(Pinned).collect();
    let mut destinations: Vec<Pinned> = destinations.iter().copied().map(Pinned).collect();

    match Resizer::default().resize_batch(&sources, &mut destinations, filter) {
        Ok(succeeded) => i64::try_from(succeeded).unwrap_or(i64::MAX),
        Err(err) => {
            warn!(error = %err, "batch resize failed");
            -1
        }
    }
}
