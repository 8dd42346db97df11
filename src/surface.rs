use crate::{
    buffer::{ImageView, ImageViewMut},
    error::ResizeError,
};

/// Pixel memory that has to be locked before it can be read.
///
/// The lock is held only while `f` runs: implementations pin the pixels,
/// pass a view to `f`, and release the pin before returning, including when
/// `f` reports a failure. A pin that cannot be taken is a
/// [`ResizeError::LockFailed`] and `f` is not called.
pub trait Surface {
    fn lock_pixels<R>(&self, f: impl FnOnce(ImageView<'_>) -> R) -> Result<R, ResizeError>;
}

/// Pixel memory that has to be locked before it can be written.
///
/// Same contract as [`Surface`], for exclusive access.
pub trait SurfaceMut {
    fn lock_pixels_mut<R>(
        &mut self,
        f: impl FnOnce(ImageViewMut<'_>) -> R,
    ) -> Result<R, ResizeError>;
}

// Views are already pinned by whoever created them.
impl Surface for ImageView<'_> {
    fn lock_pixels<R>(&self, f: impl FnOnce(ImageView<'_>) -> R) -> Result<R, ResizeError> {
        Ok(f(*self))
    }
}

impl SurfaceMut for ImageViewMut<'_> {
    fn lock_pixels_mut<R>(
        &mut self,
        f: impl FnOnce(ImageViewMut<'_>) -> R,
    ) -> Result<R, ResizeError> {
        Ok(f(self.reborrow()))
    }
}
