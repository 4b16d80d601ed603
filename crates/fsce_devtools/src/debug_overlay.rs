//! Debug overlay drawn on top of the scene.
//!
//! The overlay is a cell grid at the current item size plus a resolution
//! label in the top-left corner. It only draws while `visible` is set; the
//! engine flips that flag when debug mode changes.

use fsce_render::{Rgba, Surface};
use glam::UVec2;

pub const GRID_COLOR: Rgba<u8> = Rgba([0, 255, 0, 96]);
pub const LABEL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const LABEL_FONT: &str = "12px monospace";

#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.set_visible(!self.visible);
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            log::info!("Debug overlay: {}", if visible { "ON" } else { "OFF" });
        }
        self.visible = visible;
    }

    pub fn label(resolution: UVec2, item_size: u32) -> String {
        format!(
            "{}x{} @ {}x{}",
            resolution.x, resolution.y, item_size, item_size
        )
    }

    /// Draw the grid and label. Does nothing when hidden or when `item_size` is 0.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, resolution: UVec2, item_size: u32) {
        if !self.visible || item_size == 0 {
            return;
        }
        let width = resolution.x as f32;
        let height = resolution.y as f32;

        surface.set_stroke_style(GRID_COLOR);
        surface.begin_path();
        for x in (0..=resolution.x).step_by(item_size as usize) {
            surface.move_to(x as f32, 0.0);
            surface.line_to(x as f32, height);
        }
        for y in (0..=resolution.y).step_by(item_size as usize) {
            surface.move_to(0.0, y as f32);
            surface.line_to(width, y as f32);
        }
        surface.stroke();

        surface.set_fill_style(LABEL_COLOR);
        surface.set_font(LABEL_FONT);
        surface.fill_text(&Self::label(resolution, item_size), 4.0, 14.0);
    }
}
