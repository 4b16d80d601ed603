use glam::{IVec2, UVec2};

/// Maps 1-based grid coordinates onto surface pixels.
///
/// Cell (1, 1) covers pixels `[0, item_size)` on both axes, so cell (x, y)
/// starts at `(x * s - s, y * s - s)`. Coordinates below 1 land off the
/// top-left edge and are clipped by the surface. Cells whose origin does not
/// fit in pixel space have no origin at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridProjection {
    pub item_size: u32,
    pub resolution: UVec2,
}

impl GridProjection {
    pub fn new(item_size: u32, resolution: UVec2) -> Self {
        Self {
            item_size,
            resolution,
        }
    }

    pub fn cell_origin(&self, x: i32, y: i32) -> Option<IVec2> {
        let s = i64::from(self.item_size);
        let px = (i64::from(x) - 1).checked_mul(s)?;
        let py = (i64::from(y) - 1).checked_mul(s)?;
        Some(IVec2::new(i32::try_from(px).ok()?, i32::try_from(py).ok()?))
    }

    pub fn cell_size(&self) -> UVec2 {
        UVec2::splat(self.item_size)
    }

    /// Number of whole cells that fit across and down the surface.
    pub fn cells(&self) -> UVec2 {
        if self.item_size == 0 {
            return UVec2::ZERO;
        }
        self.resolution / self.item_size
    }
}
