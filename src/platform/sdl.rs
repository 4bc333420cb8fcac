use anyhow::{anyhow, Context, Result};
use log::info;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton as SdlMouseButton;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use super::Platform;
use crate::config::EngineConfig;
use crate::display::Sprite;
use crate::engine::EngineHandle;
use crate::input::{Key, KeyMap, KeyTracker, MouseButton};

/// An open SDL window and its event pump
pub struct SdlDisplay {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    window_size: (u32, u32),
}

impl SdlDisplay {
    /// Open the window described by `config`
    ///
    /// The texture creator is returned separately so streaming textures can
    /// borrow it for the lifetime of the platform.
    pub fn open(config: &EngineConfig) -> Result<(Self, TextureCreator<WindowContext>)> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e)).context("initializing SDL")?;
        let video_subsystem = sdl_context
            .video()
            .map_err(|e| anyhow!(e))
            .context("initializing SDL video")?;

        let (width, height) = config.window_size();
        let mut builder = video_subsystem.window(&config.app_name, width, height);
        builder.position_centered();
        if config.full_screen {
            builder.fullscreen_desktop();
        }
        let window = builder.build().context("creating window")?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if config.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().context("creating renderer")?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context
            .event_pump()
            .map_err(|e| anyhow!(e))
            .context("creating event pump")?;

        info!(
            "window {}x{} (vsync {}, fullscreen {})",
            width, height, config.vsync, config.full_screen
        );

        Ok((
            Self {
                canvas,
                event_pump,
                window_size: (width, height),
            },
            texture_creator,
        ))
    }
}

/// SDL2 window presenting the engine's screen buffer
pub struct SdlPlatform<'a> {
    display: SdlDisplay,
    texture: Texture<'a>,
    keys: KeyTracker<Keycode>,
}

impl<'a> SdlPlatform<'a> {
    pub fn new(
        display: SdlDisplay,
        texture_creator: &'a TextureCreator<WindowContext>,
        screen_width: u32,
        screen_height: u32,
        keys: KeyMap<Keycode>,
    ) -> Result<Self> {
        // Sprite bytes are r, g, b, a in memory: ABGR8888 on little-endian
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::ABGR8888, screen_width, screen_height)
            .context("creating screen texture")?;
        Ok(Self {
            display,
            texture,
            keys: KeyTracker::new(keys),
        })
    }

    /// Map the actual drawable size back onto the nominal window size
    fn to_window_pixels(&self, x: i32, y: i32) -> (i32, i32) {
        let (nw, nh) = self.display.window_size;
        let (aw, ah) = self.display.canvas.window().size();
        if aw == 0 || ah == 0 || (aw, ah) == (nw, nh) {
            return (x, y);
        }
        (
            (x as i64 * nw as i64 / aw as i64) as i32,
            (y as i64 * nh as i64 / ah as i64) as i32,
        )
    }
}

impl Platform for SdlPlatform<'_> {
    fn pump_events(&mut self, handle: &EngineHandle) -> Result<()> {
        let input = handle.input();
        let events: Vec<Event> = self.display.event_pump.poll_iter().collect();

        for event in events {
            match event {
                Event::Quit { .. } => handle.terminate(),
                Event::KeyDown {
                    keycode: Some(k),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = self.keys.press(k) {
                        input.key(key, true);
                    }
                },
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    if let Some(key) = self.keys.release(&k) {
                        input.key(key, false);
                    }
                },
                Event::MouseMotion { x, y, .. } => {
                    let (x, y) = self.to_window_pixels(x, y);
                    input.mouse_move(x, y);
                },
                Event::MouseButtonDown { mouse_btn, .. } => {
                    if let Some(button) = map_mouse_button(mouse_btn) {
                        input.mouse_button(button, true);
                    }
                },
                Event::MouseButtonUp { mouse_btn, .. } => {
                    if let Some(button) = map_mouse_button(mouse_btn) {
                        input.mouse_button(button, false);
                    }
                },
                Event::MouseWheel { y, .. } => {
                    input.mouse_wheel(y);
                },
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::FocusGained => {
                        input.keyboard_focus(true);
                    },
                    WindowEvent::FocusLost => {
                        self.keys.reset();
                        input.keyboard_focus(false);
                    },
                    WindowEvent::Enter => {
                        input.mouse_focus(true);
                    },
                    WindowEvent::Leave => {
                        input.mouse_focus(false);
                    },
                    _ => {},
                },
                _ => {},
            }
        }
        Ok(())
    }

    fn present(&mut self, screen: &Sprite) -> Result<()> {
        self.texture
            .update(None, screen.as_bytes(), screen.pitch())
            .context("uploading screen texture")?;
        self.display
            .canvas
            .copy(&self.texture, None, None)
            .map_err(|e| anyhow!(e))
            .context("copying screen texture")?;
        self.display.canvas.present();
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.display
            .canvas
            .window_mut()
            .set_title(title)
            .context("setting window title")
    }
}

fn map_mouse_button(btn: SdlMouseButton) -> Option<MouseButton> {
    match btn {
        SdlMouseButton::Left => Some(MouseButton::Left),
        SdlMouseButton::Right => Some(MouseButton::Right),
        SdlMouseButton::Middle => Some(MouseButton::Middle),
        SdlMouseButton::X1 => Some(MouseButton::X1),
        SdlMouseButton::X2 => Some(MouseButton::X2),
        _ => None,
    }
}

/// Default SDL keycode bindings
///
/// Both Shift and both Ctrl keys share one `Key`; `KeyTracker` keeps it
/// held while either side is down.
pub fn sdl_key_map() -> KeyMap<Keycode> {
    let letters = [
        (Keycode::A, Key::A),
        (Keycode::B, Key::B),
        (Keycode::C, Key::C),
        (Keycode::D, Key::D),
        (Keycode::E, Key::E),
        (Keycode::F, Key::F),
        (Keycode::G, Key::G),
        (Keycode::H, Key::H),
        (Keycode::I, Key::I),
        (Keycode::J, Key::J),
        (Keycode::K, Key::K),
        (Keycode::L, Key::L),
        (Keycode::M, Key::M),
        (Keycode::N, Key::N),
        (Keycode::O, Key::O),
        (Keycode::P, Key::P),
        (Keycode::Q, Key::Q),
        (Keycode::R, Key::R),
        (Keycode::S, Key::S),
        (Keycode::T, Key::T),
        (Keycode::U, Key::U),
        (Keycode::V, Key::V),
        (Keycode::W, Key::W),
        (Keycode::X, Key::X),
        (Keycode::Y, Key::Y),
        (Keycode::Z, Key::Z),
    ];
    let digits = [
        (Keycode::Num0, Key::K0),
        (Keycode::Num1, Key::K1),
        (Keycode::Num2, Key::K2),
        (Keycode::Num3, Key::K3),
        (Keycode::Num4, Key::K4),
        (Keycode::Num5, Key::K5),
        (Keycode::Num6, Key::K6),
        (Keycode::Num7, Key::K7),
        (Keycode::Num8, Key::K8),
        (Keycode::Num9, Key::K9),
    ];
    let function = [
        (Keycode::F1, Key::F1),
        (Keycode::F2, Key::F2),
        (Keycode::F3, Key::F3),
        (Keycode::F4, Key::F4),
        (Keycode::F5, Key::F5),
        (Keycode::F6, Key::F6),
        (Keycode::F7, Key::F7),
        (Keycode::F8, Key::F8),
        (Keycode::F9, Key::F9),
        (Keycode::F10, Key::F10),
        (Keycode::F11, Key::F11),
        (Keycode::F12, Key::F12),
    ];
    let keypad = [
        (Keycode::Kp0, Key::Np0),
        (Keycode::Kp1, Key::Np1),
        (Keycode::Kp2, Key::Np2),
        (Keycode::Kp3, Key::Np3),
        (Keycode::Kp4, Key::Np4),
        (Keycode::Kp5, Key::Np5),
        (Keycode::Kp6, Key::Np6),
        (Keycode::Kp7, Key::Np7),
        (Keycode::Kp8, Key::Np8),
        (Keycode::Kp9, Key::Np9),
        (Keycode::KpMultiply, Key::NpMul),
        (Keycode::KpDivide, Key::NpDiv),
        (Keycode::KpPlus, Key::NpAdd),
        (Keycode::KpMinus, Key::NpSub),
        (Keycode::KpPeriod, Key::NpDecimal),
        (Keycode::KpEnter, Key::Enter),
    ];
    let other = [
        (Keycode::Up, Key::Up),
        (Keycode::Down, Key::Down),
        (Keycode::Left, Key::Left),
        (Keycode::Right, Key::Right),
        (Keycode::Space, Key::Space),
        (Keycode::Tab, Key::Tab),
        (Keycode::LShift, Key::Shift),
        (Keycode::RShift, Key::Shift),
        (Keycode::LCtrl, Key::Ctrl),
        (Keycode::RCtrl, Key::Ctrl),
        (Keycode::Insert, Key::Ins),
        (Keycode::Delete, Key::Del),
        (Keycode::Home, Key::Home),
        (Keycode::End, Key::End),
        (Keycode::PageUp, Key::PgUp),
        (Keycode::PageDown, Key::PgDn),
        (Keycode::Backspace, Key::Back),
        (Keycode::Escape, Key::Escape),
        (Keycode::Return, Key::Return),
        (Keycode::Pause, Key::Pause),
        (Keycode::ScrollLock, Key::Scroll),
        (Keycode::Period, Key::Period),
        (Keycode::Equals, Key::Equals),
        (Keycode::Comma, Key::Comma),
        (Keycode::Minus, Key::Minus),
        (Keycode::Semicolon, Key::Oem1),
        (Keycode::Slash, Key::Oem2),
        (Keycode::Backquote, Key::Oem3),
        (Keycode::LeftBracket, Key::Oem4),
        (Keycode::Backslash, Key::Oem5),
        (Keycode::RightBracket, Key::Oem6),
        (Keycode::Quote, Key::Oem7),
        (Keycode::CapsLock, Key::CapsLock),
    ];

    letters
        .into_iter()
        .chain(digits)
        .chain(function)
        .chain(keypad)
        .chain(other)
        .collect()
}
