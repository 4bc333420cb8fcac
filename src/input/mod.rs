//! Keyboard and mouse input: raw platform edges reduced once per frame

mod button;
mod keymap;
mod keys;
mod latch;

pub use button::ButtonState;
pub use keymap::{KeyMap, KeyTracker, KeyTranslator};
pub use keys::{Key, MouseButton};
pub use latch::{InputEvent, InputLatch, InputSender};
