//! Draws one frame of a [`GameState`] onto a [`Surface`].

use fsce_core::{EngineError, EngineResult};
use fsce_devtools::DebugOverlay;
use fsce_render::Surface;

use crate::state::GameState;

/// What a single frame did. Handy for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub layers: usize,
    pub blits: usize,
    pub hidden: usize,
    /// Visible blocks skipped because their cell lies outside pixel space.
    pub out_of_range: usize,
    pub debug_overlay: bool,
}

impl FrameReport {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
pub struct FrameRenderer {
    overlay: DebugOverlay,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.overlay.set_visible(enabled);
    }

    pub fn debug_enabled(&self) -> bool {
        self.overlay.visible
    }

    pub fn render<T: Surface + ?Sized>(
        &self,
        state: Option<&GameState>,
        surface: &mut T,
    ) -> EngineResult<FrameReport> {
        let Some(state) = state else {
            if self.overlay.visible {
                return Err(EngineError::NotInitialized("Game state"));
            }
            log::trace!("No game state yet; nothing to draw");
            return Ok(FrameReport::empty());
        };

        surface.clear();

        let grid = state.projection();
        let cell = grid.cell_size();
        let mut report = FrameReport::empty();
        for layer in state.scene.draw_order() {
            report.layers += 1;
            for item in &layer.items {
                for block in item.blocks() {
                    if !block.is_visible() {
                        report.hidden += 1;
                        continue;
                    }
                    let Some(origin) = grid.cell_origin(block.position.x, block.position.y) else {
                        log::trace!("Block '{}' lies outside pixel space; skipped", block.id);
                        report.out_of_range += 1;
                        continue;
                    };
                    let texture = block.current_texture(&state.animation);
                    surface.draw_image(&texture.image, origin.x, origin.y, cell.x, cell.y);
                    report.blits += 1;
                }
            }
        }

        if self.overlay.visible {
            self.overlay.draw(surface, state.resolution, state.item_size);
            report.debug_overlay = true;
        }

        log::trace!(
            "Frame drawn: {} layers, {} blits, {} hidden",
            report.layers,
            report.blits,
            report.hidden
        );
        Ok(report)
    }
}
