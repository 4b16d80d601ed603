use std::path::Path;

use glam::{UVec2, Vec2};
use image::{Rgba, RgbaImage};

use crate::handle::ImageHandle;
use crate::surface::Surface;

/// Text drawn onto a [`RasterSurface`]. Glyph rasterization is out of scope,
/// so labels are kept alongside the pixels instead.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: Vec2,
    pub color: Rgba<u8>,
    pub font: String,
}

/// CPU-side RGBA canvas.
///
/// Blits are nearest-neighbour scaled, alpha blended over the existing
/// pixels, and clipped to the canvas. Strokes are one pixel wide.
pub struct RasterSurface {
    canvas: RgbaImage,
    background: Rgba<u8>,
    fill_style: Rgba<u8>,
    stroke_style: Rgba<u8>,
    font: String,
    path: Vec<(Vec2, Vec2)>,
    cursor: Option<Vec2>,
    labels: Vec<TextLabel>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let background = Rgba([0, 0, 0, 0]);
        Self {
            canvas: RgbaImage::from_pixel(width, height, background),
            background,
            fill_style: Rgba([0, 0, 0, 255]),
            stroke_style: Rgba([0, 0, 0, 255]),
            font: "10px sans-serif".to_string(),
            path: Vec::new(),
            cursor: None,
            labels: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        for pixel in self.canvas.pixels_mut() {
            *pixel = background;
        }
        self
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.canvas.width() && y < self.canvas.height() {
            Some(*self.canvas.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn save_png(&self, path: &Path) -> Result<(), String> {
        self.canvas
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))
    }

    fn blend(&mut self, x: i64, y: i64, src: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.canvas.width() as i64 || y >= self.canvas.height() as i64 {
            return;
        }
        let dst = self.canvas.get_pixel_mut(x as u32, y as u32);
        *dst = blend_over(*dst, src);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgba<u8>) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            self.blend(p.x.floor() as i64, p.y.floor() as i64, color);
        }
    }
}

fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    if sa >= 1.0 {
        return src;
    }
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = src[c] as f32 / 255.0;
        let d = dst[c] as f32 / 255.0;
        let v = (s * sa + d * da * (1.0 - sa)) / out_a;
        out[c] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}

impl Surface for RasterSurface {
    fn size(&self) -> UVec2 {
        UVec2::new(self.canvas.width(), self.canvas.height())
    }

    fn clear(&mut self) {
        let background = self.background;
        for pixel in self.canvas.pixels_mut() {
            *pixel = background;
        }
        self.labels.clear();
        self.path.clear();
        self.cursor = None;
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.cursor = None;
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.cursor = Some(Vec2::new(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let to = Vec2::new(x, y);
        if let Some(from) = self.cursor {
            self.path.push((from, to));
        }
        self.cursor = Some(to);
    }

    fn stroke(&mut self) {
        let color = self.stroke_style;
        let segments = self.path.clone();
        for (from, to) in segments {
            self.draw_line(from, to, color);
        }
    }

    fn draw_image(&mut self, image: &ImageHandle, x: i32, y: i32, width: u32, height: u32) {
        let src = image.pixels();
        if width == 0 || height == 0 || src.width() == 0 || src.height() == 0 {
            return;
        }
        for dy in 0..height {
            let ty = y as i64 + dy as i64;
            if ty < 0 || ty >= self.canvas.height() as i64 {
                continue;
            }
            let sy = (dy as u64 * src.height() as u64 / height as u64) as u32;
            for dx in 0..width {
                let tx = x as i64 + dx as i64;
                if tx < 0 || tx >= self.canvas.width() as i64 {
                    continue;
                }
                let sx = (dx as u64 * src.width() as u64 / width as u64) as u32;
                let color = *src.get_pixel(sx, sy);
                self.blend(tx, ty, color);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            position: Vec2::new(x, y),
            color: self.fill_style,
            font: self.font.clone(),
        });
    }

    fn set_fill_style(&mut self, color: Rgba<u8>) {
        self.fill_style = color;
    }

    fn set_stroke_style(&mut self, color: Rgba<u8>) {
        self.stroke_style = color;
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }
}
