//! Frame loop tying a `Game` to a canvas, an input latch and a platform

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::EngineConfig;
use crate::display::Canvas;
use crate::input::{InputLatch, InputSender};
use crate::platform::Platform;
use crate::timing::FpsCounter;

/// Frames averaged for the FPS readout
const FPS_SAMPLES: usize = 60;

/// Seconds between window title refreshes
const TITLE_INTERVAL: f32 = 1.0;

/// User application driven by `Engine::run`
pub trait Game {
    /// Called once before the first frame; `false` aborts start-up
    fn on_create(&mut self, engine: &mut Engine) -> bool;

    /// Called every frame after input is latched; `false` ends the loop
    fn on_update(&mut self, engine: &mut Engine, elapsed: f32) -> bool;

    /// Called when the loop stops; `false` vetoes the shutdown
    fn on_destroy(&mut self, engine: &mut Engine) -> bool;
}

/// Cloneable handle for stopping the engine and feeding it input from any thread
#[derive(Debug, Clone)]
pub struct EngineHandle {
    active: Arc<AtomicBool>,
    input: InputSender,
}

impl EngineHandle {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Ask the loop to stop at the top of its next iteration
    pub fn terminate(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn set_running(&self) {
        self.active.store(true, Ordering::Release);
    }

    /// Producer side of the engine's input latch
    #[inline]
    pub fn input(&self) -> &InputSender {
        &self.input
    }
}

/// Owns the drawing surface and input state for one application
pub struct Engine {
    config: EngineConfig,
    canvas: Canvas,
    input: InputLatch,
    handle: EngineHandle,
    fps: FpsCounter,
    frame_count: u64,
    title_timer: f32,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate().context("constructing engine")?;

        let input = InputLatch::new(config.screen_size(), config.pixel_size());
        let handle = EngineHandle {
            active: Arc::new(AtomicBool::new(false)),
            input: input.sender(),
        };
        info!(
            "engine '{}': {}x{} screen, {}x{} pixels",
            config.app_name,
            config.screen_width,
            config.screen_height,
            config.pixel_width,
            config.pixel_height
        );

        Ok(Self {
            canvas: Canvas::new(config.screen_width, config.screen_height),
            input,
            handle,
            fps: FpsCounter::new(FPS_SAMPLES),
            frame_count: 0,
            title_timer: 0.0,
            config,
        })
    }

    #[inline]
    pub fn screen_width(&self) -> i32 {
        self.config.screen_width as i32
    }

    #[inline]
    pub fn screen_height(&self) -> i32 {
        self.config.screen_height as i32
    }

    #[inline]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[inline]
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    #[inline]
    pub fn input(&self) -> &InputLatch {
        &self.input
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rolling average frames per second
    pub fn fps(&self) -> f32 {
        self.fps.avg_fps()
    }

    /// Frames completed by `run`
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run `game` until it, the platform or another thread stops the loop
    ///
    /// Each frame: measure elapsed time, pump platform events, latch input,
    /// update the game, present the screen.
    pub fn run<G, P>(&mut self, game: &mut G, platform: &mut P) -> Result<()>
    where
        G: Game,
        P: Platform,
    {
        self.handle.set_running();
        info!("starting '{}'", self.config.app_name);

        if !game.on_create(self) {
            info!("on_create declined, not starting");
            self.handle.terminate();
            return Ok(());
        }

        self.fps.reset();
        self.title_timer = 0.0;

        loop {
            while self.handle.is_running() {
                if let Err(err) = self.frame(game, platform) {
                    self.handle.terminate();
                    return Err(err);
                }
            }

            if game.on_destroy(self) {
                break;
            }
            info!("shutdown vetoed by on_destroy, resuming");
            self.handle.set_running();
        }

        info!("stopped '{}' after {} frames", self.config.app_name, self.frame_count);
        Ok(())
    }

    fn frame<G: Game, P: Platform>(&mut self, game: &mut G, platform: &mut P) -> Result<()> {
        let time = self.fps.tick();

        platform
            .pump_events(&self.handle)
            .context("pumping platform events")?;
        self.input.update();

        if !game.on_update(self, time.dt) {
            debug!("on_update requested stop");
            self.handle.terminate();
        }

        platform
            .present(self.canvas.screen())
            .context("presenting frame")?;
        self.frame_count += 1;

        self.title_timer += time.dt;
        if self.title_timer >= TITLE_INTERVAL {
            self.title_timer -= TITLE_INTERVAL;
            let title = format!("{} - FPS: {}", self.config.app_name, self.fps.avg_fps() as u32);
            platform.set_title(&title).context("updating window title")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Pixel;
    use crate::platform::HeadlessPlatform;

    struct CountDown {
        frames: u32,
        created: bool,
        destroyed: u32,
        vetoes: u32,
    }

    impl CountDown {
        fn new(frames: u32, vetoes: u32) -> Self {
            Self {
                frames,
                created: false,
                destroyed: 0,
                vetoes,
            }
        }
    }

    impl Game for CountDown {
        fn on_create(&mut self, engine: &mut Engine) -> bool {
            self.created = true;
            engine.canvas_mut().clear(Pixel::BLUE);
            true
        }

        fn on_update(&mut self, _engine: &mut Engine, _elapsed: f32) -> bool {
            self.frames = self.frames.saturating_sub(1);
            self.frames > 0
        }

        fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
            self.destroyed += 1;
            if self.vetoes > 0 {
                self.vetoes -= 1;
                self.frames = 2;
                return false;
            }
            true
        }
    }

    fn engine() -> Engine {
        let config = EngineConfig {
            screen_width: 8,
            screen_height: 8,
            ..EngineConfig::default()
        };
        Engine::new(config).expect("valid config")
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig {
            screen_width: 0,
            ..EngineConfig::default()
        };
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn test_update_false_stops_loop() {
        let mut engine = engine();
        let mut game = CountDown::new(3, 0);
        let mut platform = HeadlessPlatform::new();
        engine.run(&mut game, &mut platform).expect("run");
        assert!(game.created);
        assert_eq!(game.destroyed, 1);
        assert_eq!(engine.frame_count(), 3);
        assert_eq!(platform.frames_presented(), 3);
        assert!(!engine.handle().is_running());
    }

    #[test]
    fn test_destroy_veto_resumes() {
        let mut engine = engine();
        let mut game = CountDown::new(1, 1);
        let mut platform = HeadlessPlatform::new();
        engine.run(&mut game, &mut platform).expect("run");
        assert_eq!(game.destroyed, 2);
        assert_eq!(engine.frame_count(), 3);
    }

    #[test]
    fn test_presented_frame_is_screen() {
        let mut engine = engine();
        let mut game = CountDown::new(1, 0);
        let mut platform = HeadlessPlatform::new();
        engine.run(&mut game, &mut platform).expect("run");
        let last = platform.last_frame().expect("a frame");
        assert_eq!(last.get_pixel(3, 3), Pixel::BLUE);
    }
}
