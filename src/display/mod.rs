//! Software framebuffer: pixels, sprites, blending and rasterization

mod blend;
mod canvas;
pub mod font;
mod pixel;
pub mod raster;
mod sprite;

pub use blend::{BlendFn, Blender, PixelMode};
pub use canvas::{Canvas, DrawTarget, Flip, LayerId};
pub use pixel::Pixel;
pub use raster::{ALL_OCTANTS, SOLID};
pub use sprite::{SampleMode, Sprite};

/// Default screen size in screen pixels
pub const DEFAULT_WIDTH: u32 = 256;
pub const DEFAULT_HEIGHT: u32 = 240;
