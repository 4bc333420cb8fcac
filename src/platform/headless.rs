use std::collections::VecDeque;

use anyhow::Result;
use log::debug;

use super::Platform;
use crate::display::Sprite;
use crate::engine::EngineHandle;
use crate::input::InputEvent;

/// Windowless platform: replays scripted input and keeps the last frame
///
/// Used for tests and offline rendering.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: VecDeque<Vec<InputEvent>>,
    frame_limit: Option<u64>,
    frames_presented: u64,
    last_frame: Option<Sprite>,
    title: String,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the engine once `frames` frames have been presented
    ///
    /// The loop always runs at least one frame.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Queue the events delivered on the next unscripted frame
    pub fn push_frame(&mut self, events: Vec<InputEvent>) {
        self.script.push_back(events);
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn last_frame(&self) -> Option<&Sprite> {
        self.last_frame.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Platform for HeadlessPlatform {
    fn pump_events(&mut self, handle: &EngineHandle) -> Result<()> {
        if self.frame_limit.is_some_and(|limit| self.frames_presented + 1 >= limit) {
            debug!("headless frame limit reached");
            handle.terminate();
        }
        if let Some(events) = self.script.pop_front() {
            for event in events {
                handle.input().send(event);
            }
        }
        Ok(())
    }

    fn present(&mut self, screen: &Sprite) -> Result<()> {
        if let Some(frame) = self.last_frame.as_mut().filter(|f| f.size() == screen.size()) {
            frame.pixels_mut().copy_from_slice(screen.pixels());
        } else {
            self.last_frame = Some(screen.duplicate());
        }
        self.frames_presented += 1;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.title.clear();
        self.title.push_str(title);
        Ok(())
    }
}
