pub mod grid;
pub mod handle;
pub mod loader;
pub mod raster;
pub mod recording;
pub mod surface;

pub use grid::GridProjection;
pub use handle::ImageHandle;
pub use image::Rgba;
pub use loader::{
    spawn_load, FsImageLoader, ImageLoader, LoadFuture, MemoryImageLoader, DEFAULT_LOAD_TIMEOUT,
};
pub use raster::{RasterSurface, TextLabel};
pub use recording::{Blit, DrawCommand, RecordingSurface};
pub use surface::Surface;
