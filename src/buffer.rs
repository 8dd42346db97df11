
use core::slice;
use std::{fmt, num::NonZeroUsize, ops::Range};

use smallvec::SmallVec;

use crate::error::{BufferRole, ResizeError};

/// Bytes per pixel of every supported format.
pub const BYTES_PER_PIXEL: usize = 4;

/// Channel arrangement of a pixel. Both variants are R, G, B, A in byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelLayout {
    /// Straight alpha. Colour is weighted by alpha while filtering.
    #[default]
    Rgba,
    /// Colour already multiplied by alpha. Channels are filtered independently.
    RgbaPremultiplied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    U8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelFormat {
    pub layout: PixelLayout,
    pub data_type: DataType,
}

impl PixelFormat {
    #[must_use]
    pub const fn new(layout: PixelLayout) -> Self {
        Self {
            layout,
            data_type: DataType::U8,
        }
    }
}

/// Width, height and stride of a strided pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: NonZeroUsize,
    pub height: NonZeroUsize,
    /// Bytes from the start of one row to the start of the next.
    pub stride: usize,
}

impl Geometry {
    fn validate(
        role: BufferRole,
        width: usize,
        height: usize,
        stride: usize,
        len: usize,
    ) -> Result<Self, ResizeError> {
        let invalid = |reason| ResizeError::InvalidGeometry { role, reason };

        let width = NonZeroUsize::new(width).ok_or_else(|| invalid("width is zero"))?;
        let height = NonZeroUsize::new(height).ok_or_else(|| invalid("height is zero"))?;
        let row_bytes = width
            .get()
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| invalid("row size overflows"))?;
        if stride < row_bytes {
            return Err(invalid("stride is shorter than a row"));
        }
        let required = Self::span(height.get(), stride, row_bytes)
            .ok_or_else(|| invalid("buffer size overflows"))?;
        if len < required {
            return Err(invalid("buffer is shorter than height * stride"));
        }

        Ok(Self {
            width,
            height,
            stride,
        })
    }

    /// Bytes covered by `rows` rows. The last row needs no trailing padding.
    fn span(rows: usize, stride: usize, row_bytes: usize) -> Option<usize> {
        (rows - 1).checked_mul(stride)?.checked_add(row_bytes)
    }

    #[must_use]
    pub const fn row_bytes(&self) -> usize {
        self.width.get() * BYTES_PER_PIXEL
    }

    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        self.width.get().saturating_mul(self.height.get())
    }

    /// Bytes a band of `rows` rows must hold.
    #[must_use]
    pub fn band_len(&self, rows: usize) -> usize {
        if rows == 0 {
            0
        } else {
            (rows - 1) * self.stride + self.row_bytes()
        }
    }
}

/// Read-only view over externally owned RGBA8 pixels.
///
/// The view does not own, lock or pin the memory. Whoever creates it must
/// keep the pixels valid and unmoved for as long as the view lives.
#[derive(Clone, Copy)]
pub struct ImageView<'a> {
    data: &'a [u8],
    geometry: Geometry,
    format: PixelFormat,
}

impl<'a> ImageView<'a> {
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        layout: PixelLayout,
    ) -> Result<Self, ResizeError> {
        let geometry = Geometry::validate(BufferRole::Source, width, height, stride, data.len())?;
        Ok(Self {
            data,
            geometry,
            format: PixelFormat::new(layout),
        })
    }

    /// Builds a view from a raw pointer handed over by a foreign caller.
    ///
    /// # Safety
    /// `data` must be non-null and point to at least
    /// `(height - 1) * stride + width * 4` readable bytes that stay valid and
    /// unmodified for `'a`. Locking the memory is the caller's job.
    pub unsafe fn from_raw_parts(
        data: *const u8,
        width: usize,
        height: usize,
        stride: usize,
        layout: PixelLayout,
    ) -> Result<Self, ResizeError> {
        let len = required_len(BufferRole::Source, width, height, stride)?;
        // SAFETY: the caller guarantees `len` readable bytes behind `data`
        let data = unsafe { slice::from_raw_parts(data, len) };
        Self::new(data, width, height, stride, layout)
    }

    #[must_use]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.geometry.width.get()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.geometry.height.get()
    }

    #[must_use]
    pub const fn stride(&self) -> usize {
        self.geometry.stride
    }

    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        self.geometry.pixel_count()
    }

    /// Pixel bytes of row `y`, without padding.
    #[must_use]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.geometry.stride;
        &self.data[start..start + self.geometry.row_bytes()]
    }
}

/// Writable view over externally owned RGBA8 pixels.
///
/// Same contract as [`ImageView`]: the memory is borrowed, never locked here.
pub struct ImageViewMut<'a> {
    data: &'a mut [u8],
    geometry: Geometry,
    format: PixelFormat,
}

impl<'a> ImageViewMut<'a> {
    pub fn new(
        data: &'a mut [u8],
        width: usize,
        height: usize,
        stride: usize,
        layout: PixelLayout,
    ) -> Result<Self, ResizeError> {
        let geometry =
            Geometry::validate(BufferRole::Destination, width, height, stride, data.len())?;
        Ok(Self {
            data,
            geometry,
            format: PixelFormat::new(layout),
        })
    }

    /// Builds a writable view from a raw pointer handed over by a foreign caller.
    ///
    /// # Safety
    /// `data` must be non-null and point to at least
    /// `(height - 1) * stride + width * 4` writable bytes that nothing else
    /// reads or writes for `'a`. Locking the memory is the caller's job.
    pub unsafe fn from_raw_parts(
        data: *mut u8,
        width: usize,
        height: usize,
        stride: usize,
        layout: PixelLayout,
    ) -> Result<Self, ResizeError> {
        let len = required_len(BufferRole::Destination, width, height, stride)?;
        // SAFETY: the caller guarantees exclusive access to `len` bytes behind `data`
        let data = unsafe { slice::from_raw_parts_mut(data, len) };
        Self::new(data, width, height, stride, layout)
    }

    #[must_use]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.geometry.width.get()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.geometry.height.get()
    }

    #[must_use]
    pub const fn stride(&self) -> usize {
        self.geometry.stride
    }

    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        self.geometry.pixel_count()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    /// A shorter-lived view of the same pixels.
    pub fn reborrow(&mut self) -> ImageViewMut<'_> {
        ImageViewMut {
            data: &mut *self.data,
            geometry: self.geometry,
            format: self.format,
        }
    }

    /// Splits the buffer into one mutable slice per row band.
    ///
    /// `bands` must be contiguous, in order, and cover `0..height` exactly.
    /// Each returned slice starts at the first byte of its band's first row.
    pub fn row_bands_mut<I>(&mut self, bands: I) -> Result<SmallVec<[&mut [u8]; 8]>, ResizeError>
    where
        I: IntoIterator<Item = Range<usize>>,
    {
        let invalid = |reason| ResizeError::InvalidGeometry {
            role: BufferRole::Destination,
            reason,
        };

        let height = self.height();
        let stride = self.stride();
        let mut remaining: &mut [u8] = &mut *self.data;
        let mut next_row = 0;
        let mut out = SmallVec::new();

        for band in bands {
            if band.start != next_row || band.end <= band.start || band.end > height {
                return Err(invalid("row bands are not contiguous"));
            }
            if band.end == height {
                out.push(std::mem::take(&mut remaining));
            } else {
                let (head, tail) = std::mem::take(&mut remaining).split_at_mut(band.len() * stride);
                out.push(head);
                remaining = tail;
            }
            next_row = band.end;
        }

        if next_row != height {
            return Err(invalid("row bands do not cover every row"));
        }
        Ok(out)
    }
}

impl fmt::Debug for ImageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageView")
            .field("geometry", &self.geometry)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ImageViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageViewMut")
            .field("geometry", &self.geometry)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

fn required_len(
    role: BufferRole,
    width: usize,
    height: usize,
    stride: usize,
) -> Result<usize, ResizeError> {
    let geometry = Geometry::validate(role, width, height, stride, usize::MAX)?;
    Ok(geometry.band_len(geometry.height.get()))
}

/// Target size for resizing by `percentage` percent, rounding down.
///
/// Returns `None` when either side would collapse to zero.
#[must_use]
pub fn scaled_dimensions(
    width: NonZeroUsize,
    height: NonZeroUsize,
    percentage: u32,
) -> Option<(NonZeroUsize, NonZeroUsize)> {
    let scale = |side: NonZeroUsize| {
        side.get()
            .checked_mul(percentage as usize)
            .map(|v| v / 100)
            .and_then(NonZeroUsize::new)
    };
    Some((scale(width)?, scale(height)?))
}
