use std::fmt;
use std::sync::Arc;

use glam::UVec2;
use image::{Rgba, RgbaImage};

/// Decoded RGBA image shared between the texture registry, blocks, and the
/// surfaces that draw it. Cloning only bumps a reference count.
///
/// Equality is identity: two handles are equal when they point at the same
/// decoded image, not when their pixels happen to match.
#[derive(Clone)]
pub struct ImageHandle(Arc<RgbaImage>);

impl ImageHandle {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Single-colour image, handy for placeholder and debug textures.
    pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self::new(RgbaImage::from_pixel(width.max(1), height.max(1), color))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.0.width(), self.0.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({}x{})", self.width(), self.height())
    }
}
