use crate::{
    buffer::{ImageView, ImageViewMut},
    error::ResizeError,
    filter::FilterKind,
};

/// How source coordinates outside the image are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Use the nearest edge pixel.
    #[default]
    Clamp,
}

/// One resize: where to read, where to write, and how to filter.
#[derive(Debug)]
pub struct ResizeRequest<'s, 'd> {
    pub src: ImageView<'s>,
    pub dst: ImageViewMut<'d>,
    pub filter: FilterKind,
    pub edge: EdgeMode,
}

impl<'s, 'd> ResizeRequest<'s, 'd> {
    /// Pairs two buffers for resizing. Their pixel formats must match.
    pub fn new(
        src: ImageView<'s>,
        dst: ImageViewMut<'d>,
        filter: FilterKind,
    ) -> Result<Self, ResizeError> {
        if src.format() != dst.format() {
            return Err(ResizeError::FormatMismatch {
                src: src.format(),
                dst: dst.format(),
            });
        }

        Ok(Self {
            src,
            dst,
            filter,
            edge: EdgeMode::Clamp,
        })
    }

    #[must_use]
    pub const fn src_pixels(&self) -> usize {
        self.src.pixel_count()
    }

    #[must_use]
    pub const fn dst_pixels(&self) -> usize {
        self.dst.pixel_count()
    }
}
