//! Raw edge events in, one consistent button snapshot per frame out

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use log::{debug, trace};

use super::button::ButtonState;
use super::keys::{Key, MouseButton};
use crate::geometry::Vi2d;

/// Raw input reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key { key: Key, down: bool },
    MouseButton { button: MouseButton, down: bool },
    /// Cursor position in window pixels
    MouseMove { x: i32, y: i32 },
    MouseWheel(i32),
    KeyboardFocus(bool),
    MouseFocus(bool),
}

/// Cloneable, thread-safe producer half of an `InputLatch`
///
/// Sends never block. Events sent after the latch is gone are dropped.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event; `false` if the latch no longer exists
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn key(&self, key: Key, down: bool) -> bool {
        self.send(InputEvent::Key { key, down })
    }

    pub fn mouse_button(&self, button: MouseButton, down: bool) -> bool {
        self.send(InputEvent::MouseButton { button, down })
    }

    pub fn mouse_move(&self, x: i32, y: i32) -> bool {
        self.send(InputEvent::MouseMove { x, y })
    }

    pub fn mouse_wheel(&self, delta: i32) -> bool {
        self.send(InputEvent::MouseWheel(delta))
    }

    pub fn keyboard_focus(&self, focused: bool) -> bool {
        self.send(InputEvent::KeyboardFocus(focused))
    }

    pub fn mouse_focus(&self, focused: bool) -> bool {
        self.send(InputEvent::MouseFocus(focused))
    }
}

// ============================================================================
// Button Bank
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Device {
    Keyboard,
    Mouse,
}

/// A button level change waiting for a later frame
#[derive(Debug, Clone, Copy)]
struct Edge {
    device: Device,
    index: usize,
    down: bool,
}

/// New/old level arrays for one device plus the reduced states
#[derive(Debug)]
struct ButtonBank<const N: usize> {
    new: [bool; N],
    old: [bool; N],
    state: [ButtonState; N],
    /// Buttons with an edge already deferred this frame
    blocked: [bool; N],
}

impl<const N: usize> ButtonBank<N> {
    const fn new() -> Self {
        Self {
            new: [false; N],
            old: [false; N],
            state: [ButtonState::IDLE; N],
            blocked: [false; N],
        }
    }

    /// Apply a level; `false` when it has to wait for the next frame
    fn apply(&mut self, index: usize, down: bool) -> bool {
        if self.blocked[index] {
            return false;
        }
        if self.new[index] == down {
            return true;
        }
        if self.new[index] != self.old[index] {
            // Already changed this frame
            self.blocked[index] = true;
            return false;
        }
        self.new[index] = down;
        true
    }

    fn reduce(&mut self) {
        for i in 0..N {
            self.state[i] = ButtonState::from_levels(self.new[i], self.old[i]);
            self.old[i] = self.new[i];
        }
    }

    /// Buttons currently down or with edges still pending
    fn active(&self) -> impl Iterator<Item = usize> + '_ {
        (0..N).filter(|&i| self.new[i] || self.blocked[i])
    }
}

// ============================================================================
// Input Latch
// ============================================================================

/// Turns racy platform input into per-frame `ButtonState`s
///
/// Producers on any thread push edges through an `InputSender`; the render
/// thread calls `update` exactly once per frame before reading state. If a
/// button already changed this frame, its further edges are carried over to
/// later frames in order, so a press and release inside one frame show up as
/// pressed on one frame and released on the next.
pub struct InputLatch {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
    deferred: VecDeque<Edge>,
    keys: ButtonBank<{ Key::COUNT }>,
    buttons: ButtonBank<{ MouseButton::COUNT }>,
    screen_size: Vi2d,
    pixel_size: Vi2d,
    mouse_pos: Vi2d,
    wheel_accum: i32,
    wheel: i32,
    has_focus: bool,
    has_mouse_focus: bool,
}

impl InputLatch {
    /// `screen_size` in screen pixels, `pixel_size` in window pixels per screen pixel
    pub fn new(screen_size: Vi2d, pixel_size: Vi2d) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            deferred: VecDeque::new(),
            keys: ButtonBank::new(),
            buttons: ButtonBank::new(),
            screen_size,
            pixel_size: pixel_size.max(Vi2d::new(1, 1)),
            mouse_pos: Vi2d::new(0, 0),
            wheel_accum: 0,
            wheel: 0,
            has_focus: true,
            has_mouse_focus: false,
        }
    }

    /// A new producer handle
    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    /// Drain pending input and recompute every button state
    ///
    /// Call exactly once per frame, before user code reads input.
    pub fn update(&mut self) {
        self.keys.blocked = [false; Key::COUNT];
        self.buttons.blocked = [false; MouseButton::COUNT];

        let carried: Vec<Edge> = self.deferred.drain(..).collect();
        for edge in carried {
            self.apply_edge(edge);
        }

        loop {
            match self.rx.try_recv() {
                Ok(event) => self.handle(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        self.keys.reduce();
        self.buttons.reduce();
        self.wheel = std::mem::take(&mut self.wheel_accum);

        if !self.deferred.is_empty() {
            trace!("{} input edges carried to next frame", self.deferred.len());
        }
    }

    fn apply_edge(&mut self, edge: Edge) {
        let applied = match edge.device {
            Device::Keyboard => self.keys.apply(edge.index, edge.down),
            Device::Mouse => self.buttons.apply(edge.index, edge.down),
        };
        if !applied {
            self.deferred.push_back(edge);
        }
    }

    fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key, down } => self.apply_edge(Edge {
                device: Device::Keyboard,
                index: key.index(),
                down,
            }),
            InputEvent::MouseButton { button, down } => self.apply_edge(Edge {
                device: Device::Mouse,
                index: button.index(),
                down,
            }),
            InputEvent::MouseMove { x, y } => {
                let max = (self.screen_size - Vi2d::new(1, 1)).max(Vi2d::new(0, 0));
                self.mouse_pos = (Vi2d::new(x, y) / self.pixel_size).clamp(Vi2d::new(0, 0), max);
            },
            InputEvent::MouseWheel(delta) => {
                self.wheel_accum = self.wheel_accum.saturating_add(delta);
            },
            InputEvent::KeyboardFocus(focused) => {
                self.has_focus = focused;
                if !focused {
                    self.release_all();
                }
                debug!("keyboard focus {}", if focused { "gained" } else { "lost" });
            },
            InputEvent::MouseFocus(focused) => self.has_mouse_focus = focused,
        }
    }

    /// Release everything that is down so no key sticks across a focus change
    fn release_all(&mut self) {
        let keys: Vec<usize> = self.keys.active().collect();
        let buttons: Vec<usize> = self.buttons.active().collect();
        for index in keys {
            self.apply_edge(Edge {
                device: Device::Keyboard,
                index,
                down: false,
            });
        }
        for index in buttons {
            self.apply_edge(Edge {
                device: Device::Mouse,
                index,
                down: false,
            });
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    pub fn key(&self, key: Key) -> ButtonState {
        self.keys.state[key.index()]
    }

    #[inline]
    pub fn mouse(&self, button: MouseButton) -> ButtonState {
        self.buttons.state[button.index()]
    }

    /// Cursor column in screen pixels
    #[inline]
    pub fn mouse_x(&self) -> i32 {
        self.mouse_pos.x
    }

    /// Cursor row in screen pixels
    #[inline]
    pub fn mouse_y(&self) -> i32 {
        self.mouse_pos.y
    }

    #[inline]
    pub fn mouse_pos(&self) -> Vi2d {
        self.mouse_pos
    }

    /// Wheel movement accumulated over the last frame
    #[inline]
    pub fn mouse_wheel(&self) -> i32 {
        self.wheel
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.has_focus
    }

    #[inline]
    pub fn is_mouse_focused(&self) -> bool {
        self.has_mouse_focus
    }
}
