//! Engine configuration, loadable from JSON

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::geometry::Vi2d;

/// Default window pixels per screen pixel
pub const DEFAULT_PIXEL_SIZE: u32 = 4;

/// Largest window edge accepted, in window pixels
const MAX_WINDOW_EDGE: u32 = 16_384;

/// Screen geometry and presentation options
///
/// Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub app_name: String,
    /// Screen size in screen pixels
    pub screen_width: u32,
    pub screen_height: u32,
    /// Window pixels per screen pixel
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub full_screen: bool,
    pub vsync: bool,
    /// `env_logger` filter; `RUST_LOG` applies when unset
    pub log_filter: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "pixelforge".to_string(),
            screen_width: DEFAULT_WIDTH,
            screen_height: DEFAULT_HEIGHT,
            pixel_width: DEFAULT_PIXEL_SIZE,
            pixel_height: DEFAULT_PIXEL_SIZE,
            full_screen: false,
            vsync: true,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config file
    ///
    /// A missing file surfaces as an error whose source is an
    /// `io::ErrorKind::NotFound`; see [`is_not_found`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("serializing config")?;
        fs::write(path, json).with_context(|| format!("writing config {}", path.display()))
    }

    /// Reject sizes the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            bail!(
                "screen size must be non-zero, got {}x{}",
                self.screen_width,
                self.screen_height
            );
        }
        if self.pixel_width == 0 || self.pixel_height == 0 {
            bail!(
                "pixel size must be non-zero, got {}x{}",
                self.pixel_width,
                self.pixel_height
            );
        }
        let (w, h) = (
            self.screen_width.checked_mul(self.pixel_width),
            self.screen_height.checked_mul(self.pixel_height),
        );
        match (w, h) {
            (Some(w), Some(h)) if w <= MAX_WINDOW_EDGE && h <= MAX_WINDOW_EDGE => Ok(()),
            _ => bail!(
                "window of {}x{} screen pixels at {}x{} exceeds {} pixels per edge",
                self.screen_width,
                self.screen_height,
                self.pixel_width,
                self.pixel_height,
                MAX_WINDOW_EDGE
            ),
        }
    }

    pub fn screen_size(&self) -> Vi2d {
        Vi2d::new(self.screen_width as i32, self.screen_height as i32)
    }

    pub fn pixel_size(&self) -> Vi2d {
        Vi2d::new(self.pixel_width as i32, self.pixel_height as i32)
    }

    /// Window size in window pixels
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.screen_width.saturating_mul(self.pixel_width),
            self.screen_height.saturating_mul(self.pixel_height),
        )
    }
}

/// Whether `err` was caused by a missing file
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::NotFound)
}
