//! pixelforge - a software 2D rendering core
//!
//! A CPU framebuffer with blended primitives, sprites and an 8x8 bitmap font,
//! a per-frame input latch, a pan/zoom world view and a frame loop that
//! drives a [`Game`] against a [`platform::Platform`].

pub mod config;
pub mod display;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod platform;
pub mod timing;
pub mod view;

pub use config::EngineConfig;
pub use display::{Canvas, Flip, Pixel, PixelMode, Sprite};
pub use engine::{Engine, EngineHandle, Game};
pub use geometry::{Vf2d, Vi2d};
pub use input::{ButtonState, InputLatch, Key, MouseButton};
pub use view::TransformedView;
