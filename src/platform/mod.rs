//! Presentation and event-source collaborators for the engine loop

mod headless;
#[cfg(feature = "sdl")]
mod sdl;

pub use headless::HeadlessPlatform;
#[cfg(feature = "sdl")]
pub use sdl::{sdl_key_map, SdlDisplay, SdlPlatform};

use anyhow::Result;

use crate::display::Sprite;
use crate::engine::EngineHandle;

/// A window (or stand-in) the engine presents to and reads input from
pub trait Platform {
    /// Forward pending OS events through `handle.input()`; call
    /// `handle.terminate()` when the user closes the window
    fn pump_events(&mut self, handle: &EngineHandle) -> Result<()>;

    /// Show a finished frame
    fn present(&mut self, screen: &Sprite) -> Result<()>;

    fn set_title(&mut self, title: &str) -> Result<()>;
}
