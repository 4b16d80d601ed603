//! Drawable surface contract.
//!
//! Modelled after a 2D canvas context: path-based line drawing, image blits at
//! pixel coordinates, text, and a little bit of style state. The size is fixed
//! when the surface is created.

use glam::UVec2;
use image::Rgba;

use crate::handle::ImageHandle;

pub trait Surface {
    fn size(&self) -> UVec2;

    /// Wipe the whole surface back to its background.
    fn clear(&mut self);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f32, y: f32);

    fn line_to(&mut self, x: f32, y: f32);

    /// Stroke the current path with the stroke style.
    fn stroke(&mut self);

    /// Draw `image` scaled to `width` x `height` with its top-left corner at (`x`, `y`).
    fn draw_image(&mut self, image: &ImageHandle, x: i32, y: i32, width: u32, height: u32);

    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    fn set_fill_style(&mut self, color: Rgba<u8>);

    fn set_stroke_style(&mut self, color: Rgba<u8>);

    fn set_font(&mut self, font: &str);
}
