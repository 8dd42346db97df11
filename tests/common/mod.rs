#![allow(dead_code, reason = "not every test binary uses every helper")]
#![allow(clippy::unwrap_used, reason = "allow in test files")]

use std::{cell::RefCell, rc::Rc};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;
use rgba_resize::{
    BufferRole, ImageView, ImageViewMut, PixelLayout, ResizeError, Surface, SurfaceMut,
};

pub const BPP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockEvent {
    Locked(&'static str),
    Unlocked(&'static str),
    Refused(&'static str),
}

pub type LockLog = Rc<RefCell<Vec<LockEvent>>>;

/// An owned RGBA8 bitmap that records every lock taken on it.
#[derive(Debug)]
pub struct TestBitmap {
    pub name: &'static str,
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub stride: usize,
    pub layout: PixelLayout,
    pub lockable: bool,
    pub log: LockLog,
}

impl TestBitmap {
    pub fn blank(name: &'static str, width: usize, height: usize) -> Self {
        Self::padded(name, width, height, width * BPP)
    }

    pub fn padded(name: &'static str, width: usize, height: usize, stride: usize) -> Self {
        Self {
            name,
            pixels: vec![0; stride * height],
            width,
            height,
            stride,
            layout: PixelLayout::Rgba,
            lockable: true,
            log: LockLog::default(),
        }
    }

    pub fn random(name: &'static str, width: usize, height: usize) -> Self {
        let mut bitmap = Self::blank(name, width, height);
        let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
        rng.fill(bitmap.pixels.as_mut_slice());
        bitmap
    }

    pub fn solid(name: &'static str, width: usize, height: usize, pixel: [u8; 4]) -> Self {
        let mut bitmap = Self::blank(name, width, height);
        bitmap.pixels = pixel.repeat(width * height);
        bitmap
    }

    pub fn unlockable(mut self) -> Self {
        self.lockable = false;
        self
    }

    pub fn logging_to(mut self, log: &LockLog) -> Self {
        self.log = Rc::clone(log);
        self
    }

    pub fn view(&self) -> ImageView<'_> {
        ImageView::new(
            &self.pixels,
            self.width,
            self.height,
            self.stride,
            self.layout,
        )
        .unwrap()
    }

    pub fn view_mut(&mut self) -> ImageViewMut<'_> {
        ImageViewMut::new(
            &mut self.pixels,
            self.width,
            self.height,
            self.stride,
            self.layout,
        )
        .unwrap()
    }

    /// Pixel bytes without row padding.
    pub fn tight(&self) -> Vec<u8> {
        (0..self.height)
            .flat_map(|y| {
                let start = y * self.stride;
                &self.pixels[start..start + self.width * BPP]
            })
            .copied()
            .collect()
    }

    fn record(&self, event: LockEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl Surface for TestBitmap {
    fn lock_pixels<R>(&self, f: impl FnOnce(ImageView<'_>) -> R) -> Result<R, ResizeError> {
        if !self.lockable {
            self.record(LockEvent::Refused(self.name));
            return Err(ResizeError::LockFailed(BufferRole::Source));
        }
        self.record(LockEvent::Locked(self.name));
        let result = ImageView::new(
            &self.pixels,
            self.width,
            self.height,
            self.stride,
            self.layout,
        )
        .map(f);
        self.record(LockEvent::Unlocked(self.name));
        result
    }
}

impl SurfaceMut for TestBitmap {
    fn lock_pixels_mut<R>(
        &mut self,
        f: impl FnOnce(ImageViewMut<'_>) -> R,
    ) -> Result<R, ResizeError> {
        if !self.lockable {
            self.record(LockEvent::Refused(self.name));
            return Err(ResizeError::LockFailed(BufferRole::Destination));
        }
        self.record(LockEvent::Locked(self.name));
        let result = ImageViewMut::new(
            &mut self.pixels,
            self.width,
            self.height,
            self.stride,
            self.layout,
        )
        .map(f);
        self.record(LockEvent::Unlocked(self.name));
        result
    }
}
