//! Frame loop driven end to end through the headless platform

use std::thread;

use pixelforge::engine::EngineHandle;
use pixelforge::input::InputEvent;
use pixelforge::platform::HeadlessPlatform;
use pixelforge::{ButtonState, Engine, EngineConfig, Game, Key, MouseButton, Pixel, Vi2d};

fn small_config() -> EngineConfig {
    EngineConfig {
        app_name: "loop-test".into(),
        screen_width: 32,
        screen_height: 24,
        pixel_width: 4,
        pixel_height: 4,
        ..EngineConfig::default()
    }
}

fn key(key: Key, down: bool) -> InputEvent {
    InputEvent::Key { key, down }
}

/// Records what the game saw each frame
#[derive(Default)]
struct Recorder {
    space: Vec<ButtonState>,
    left: Vec<ButtonState>,
    mouse: Vec<Vi2d>,
    wheel: Vec<i32>,
}

impl Game for Recorder {
    fn on_create(&mut self, _engine: &mut Engine) -> bool {
        true
    }

    fn on_update(&mut self, engine: &mut Engine, _elapsed: f32) -> bool {
        let input = engine.input();
        self.space.push(input.key(Key::Space));
        self.left.push(input.mouse(MouseButton::Left));
        self.mouse.push(input.mouse_pos());
        self.wheel.push(input.mouse_wheel());
        true
    }

    fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
        true
    }
}

#[test]
fn test_scripted_key_lifecycle() {
    let mut engine = Engine::new(small_config()).expect("engine");
    let mut platform = HeadlessPlatform::new().with_frame_limit(4);
    platform.push_frame(vec![key(Key::Space, true)]);
    platform.push_frame(vec![]);
    platform.push_frame(vec![key(Key::Space, false)]);

    let mut game = Recorder::default();
    engine.run(&mut game, &mut platform).expect("run");

    assert_eq!(platform.frames_presented(), 4);
    let flags: Vec<(bool, bool, bool)> = game
        .space
        .iter()
        .map(|s| (s.pressed, s.released, s.held))
        .collect();
    assert_eq!(
        flags,
        vec![
            (true, false, true),
            (false, false, true),
            (false, true, false),
            (false, false, false),
        ]
    );
}

#[test]
fn test_tap_within_one_frame_is_not_lost() {
    let mut engine = Engine::new(small_config()).expect("engine");
    let mut platform = HeadlessPlatform::new().with_frame_limit(3);
    platform.push_frame(vec![key(Key::Space, true), key(Key::Space, false)]);

    let mut game = Recorder::default();
    engine.run(&mut game, &mut platform).expect("run");

    assert!(game.space[0].pressed);
    assert!(game.space[1].released);
    assert!(game.space[2].is_idle());
}

#[test]
fn test_mouse_is_scaled_and_wheel_is_per_frame() {
    let mut engine = Engine::new(small_config()).expect("engine");
    let mut platform = HeadlessPlatform::new().with_frame_limit(3);
    platform.push_frame(vec![
        InputEvent::MouseMove { x: 40, y: 20 },
        InputEvent::MouseWheel(120),
        InputEvent::MouseWheel(-40),
        InputEvent::MouseButton {
            button: MouseButton::Left,
            down: true,
        },
    ]);
    platform.push_frame(vec![InputEvent::MouseMove { x: 10_000, y: -5 }]);

    let mut game = Recorder::default();
    engine.run(&mut game, &mut platform).expect("run");

    assert_eq!(game.mouse[0], Vi2d::new(10, 5));
    assert_eq!(game.mouse[1], Vi2d::new(31, 0));
    assert_eq!(game.wheel, vec![80, 0, 0]);
    assert!(game.left[0].pressed);
    assert!(game.left[2].held);
}

#[test]
fn test_focus_loss_releases_held_keys() {
    let mut engine = Engine::new(small_config()).expect("engine");
    let mut platform = HeadlessPlatform::new().with_frame_limit(3);
    platform.push_frame(vec![key(Key::Space, true)]);
    platform.push_frame(vec![InputEvent::KeyboardFocus(false)]);

    let mut game = Recorder::default();
    engine.run(&mut game, &mut platform).expect("run");

    assert!(game.space[0].held);
    assert!(game.space[1].released);
    assert!(!engine.input().is_focused());
}

/// Stops the engine from a worker thread on a chosen frame
struct RemoteStop {
    stop_on: u32,
    frames: u32,
    handle: Option<EngineHandle>,
}

impl Game for RemoteStop {
    fn on_create(&mut self, engine: &mut Engine) -> bool {
        self.handle = Some(engine.handle());
        true
    }

    fn on_update(&mut self, engine: &mut Engine, _elapsed: f32) -> bool {
        self.frames += 1;
        if self.frames == self.stop_on {
            if let Some(handle) = self.handle.clone() {
                thread::spawn(move || {
                    handle.input().key(Key::Q, true);
                    handle.terminate();
                })
                .join()
                .expect("worker");
            }
        }
        engine.canvas_mut().clear(Pixel::DARK_CYAN);
        true
    }

    fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
        true
    }
}

#[test]
fn test_terminate_from_another_thread() {
    let mut engine = Engine::new(small_config()).expect("engine");
    let mut platform = HeadlessPlatform::new();
    let mut game = RemoteStop {
        stop_on: 3,
        frames: 0,
        handle: None,
    };
    engine.run(&mut game, &mut platform).expect("run");

    assert_eq!(game.frames, 3);
    assert_eq!(engine.frame_count(), 3);
    assert!(!engine.handle().is_running());
    let frame = platform.last_frame().expect("frame");
    assert_eq!(frame.get_pixel(31, 23), Pixel::DARK_CYAN);
}

/// Draws a scene once and stops
struct Painter;

impl Game for Painter {
    fn on_create(&mut self, engine: &mut Engine) -> bool {
        engine.canvas_mut().clear(Pixel::BLACK);
        true
    }

    fn on_update(&mut self, engine: &mut Engine, _elapsed: f32) -> bool {
        let canvas = engine.canvas_mut();
        canvas.fill_rect(2, 2, 4, 3, Pixel::RED);
        canvas.draw_line(0, 10, 31, 10, Pixel::GREEN, pixelforge::display::SOLID);
        canvas.draw_string(8, 12, "A", Pixel::WHITE, 1);
        false
    }

    fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
        true
    }
}

#[test]
fn test_drawing_reaches_the_platform() {
    let mut engine = Engine::new(small_config()).expect("engine");
    let mut platform = HeadlessPlatform::new();
    engine.run(&mut Painter, &mut platform).expect("run");

    assert_eq!(platform.frames_presented(), 1);
    let frame = platform.last_frame().expect("frame");
    assert_eq!(frame.width(), 32);
    assert_eq!(frame.get_pixel(2, 2), Pixel::RED);
    assert_eq!(frame.get_pixel(5, 4), Pixel::RED);
    assert_eq!(frame.get_pixel(6, 4), Pixel::BLACK);
    assert!((0..32).all(|x| frame.get_pixel(x, 10) == Pixel::GREEN));

    let lit = (12..20)
        .flat_map(|y| (8..16).map(move |x| (x, y)))
        .filter(|&(x, y)| frame.get_pixel(x, y) == Pixel::WHITE)
        .count();
    assert!(lit > 0);
    assert!((12..20).all(|y| frame.get_pixel(16, y) != Pixel::WHITE));
}

/// Declines to start
struct NeverStarts {
    updates: u32,
    destroyed: bool,
}

impl Game for NeverStarts {
    fn on_create(&mut self, _engine: &mut Engine) -> bool {
        false
    }

    fn on_update(&mut self, _engine: &mut Engine, _elapsed: f32) -> bool {
        self.updates += 1;
        true
    }

    fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
        self.destroyed = true;
        true
    }
}

#[test]
fn test_declined_create_runs_no_frames() {
    let mut engine = Engine::new(small_config()).expect("engine");
    let mut platform = HeadlessPlatform::new();
    let mut game = NeverStarts {
        updates: 0,
        destroyed: false,
    };
    engine.run(&mut game, &mut platform).expect("run");

    assert_eq!(game.updates, 0);
    assert!(!game.destroyed);
    assert_eq!(platform.frames_presented(), 0);
}
