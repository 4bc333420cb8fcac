//! pixelforge demo - pan/zoom grid viewer
//!
//! Drag with the middle mouse button to pan, wheel to zoom, arrow keys to
//! scroll, R to reset, F to toggle the FPS overlay, Esc to quit.

use anyhow::{Context, Result};
use log::info;

use pixelforge::config::{is_not_found, EngineConfig};
use pixelforge::display::{ALL_OCTANTS, SOLID};
use pixelforge::logging::{init_logging, LoggingConfig};
use pixelforge::platform::{sdl_key_map, SdlDisplay, SdlPlatform};
use pixelforge::{Engine, Game, Key, MouseButton, Pixel, PixelMode, TransformedView, Vf2d, Vi2d};

const DEFAULT_CONFIG: &str = "pixelforge.json";

/// World units (tiles) per side of the demo grid
const GRID_TILES: i32 = 64;
const TILE_SIZE: i32 = 16;
const ZOOM_RATE: f32 = 0.1;
const SCROLL_SPEED: f32 = 8.0;

/// Command line overrides on top of the config file
#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pixel: Option<u32>,
    no_vsync: bool,
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => parsed.no_vsync = true,
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    parsed.width = args[i + 1].parse().ok();
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    parsed.height = args[i + 1].parse().ok();
                    i += 1;
                }
            },
            "--pixel" | "-p" => {
                if i + 1 < args.len() {
                    parsed.pixel = args[i + 1].parse().ok();
                    i += 1;
                }
            },
            "--help" => {
                let defaults = EngineConfig::default();
                println!("Usage: pixelforge [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --config FILE, -c FILE  JSON config (default: {})",
                    DEFAULT_CONFIG
                );
                println!(
                    "  --width W, -w W         Screen width in screen pixels (default: {})",
                    defaults.screen_width
                );
                println!(
                    "  --height H, -h H        Screen height in screen pixels (default: {})",
                    defaults.screen_height
                );
                println!(
                    "  --pixel N, -p N         Window pixels per screen pixel (default: {})",
                    defaults.pixel_width
                );
                println!("  --no-vsync              Disable VSync for uncapped framerate");
                println!("  --help                  Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    parsed
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG);
    let mut config = match EngineConfig::load(path) {
        Ok(config) => config,
        // Only the implicit default file may be absent
        Err(err) if args.config.is_none() && is_not_found(&err) => EngineConfig::default(),
        Err(err) => return Err(err),
    };

    if let Some(w) = args.width {
        config.screen_width = w;
    }
    if let Some(h) = args.height {
        config.screen_height = h;
    }
    if let Some(p) = args.pixel {
        config.pixel_width = p;
        config.pixel_height = p;
    }
    if args.no_vsync {
        config.vsync = false;
    }
    Ok(config)
}

struct GridViewer {
    view: TransformedView,
    show_fps: bool,
}

impl GridViewer {
    fn new() -> Self {
        Self {
            view: TransformedView::tiled(Vi2d::new(1, 1), Vi2d::new(TILE_SIZE, TILE_SIZE)),
            show_fps: true,
        }
    }

    fn handle_keys(&mut self, engine: &Engine, elapsed: f32) {
        let input = engine.input();
        let step = SCROLL_SPEED * elapsed;
        let mut delta = Vf2d::new(0.0, 0.0);
        if input.key(Key::Left).held {
            delta.x -= step;
        }
        if input.key(Key::Right).held {
            delta.x += step;
        }
        if input.key(Key::Up).held {
            delta.y -= step;
        }
        if input.key(Key::Down).held {
            delta.y += step;
        }
        self.view.move_world_offset(delta);

        if input.key(Key::R).pressed {
            self.view.set_world_offset(Vf2d::new(0.0, 0.0));
            self.view
                .set_world_scale(Vf2d::new(TILE_SIZE as f32, TILE_SIZE as f32));
        }
        if input.key(Key::F).pressed {
            self.show_fps = !self.show_fps;
        }
    }

    fn draw_world(&self, engine: &mut Engine) {
        let tl = self.view.top_left_tile().max(Vi2d::new(0, 0));
        let br = self
            .view
            .bottom_right_tile()
            .min(Vi2d::new(GRID_TILES, GRID_TILES));
        let canvas = engine.canvas_mut();

        for y in tl.y..br.y {
            for x in tl.x..br.x {
                if (x + y) % 2 == 0 {
                    let pos = Vf2d::new(x as f32, y as f32);
                    self.view
                        .fill_rect(canvas, pos, Vf2d::new(1.0, 1.0), Pixel::VERY_DARK_BLUE);
                }
            }
        }
        for i in 0..=GRID_TILES {
            let n = i as f32;
            let far = GRID_TILES as f32;
            self.view.draw_line(
                canvas,
                Vf2d::new(n, 0.0),
                Vf2d::new(n, far),
                Pixel::DARK_GREY,
                0xF0F0_F0F0,
            );
            self.view.draw_line(
                canvas,
                Vf2d::new(0.0, n),
                Vf2d::new(far, n),
                Pixel::DARK_GREY,
                0xF0F0_F0F0,
            );
        }

        self.view
            .fill_circle(canvas, Vf2d::new(8.0, 8.0), 3.0, Pixel::DARK_RED);
        self.view
            .draw_circle(canvas, Vf2d::new(8.0, 8.0), 3.0, Pixel::RED, ALL_OCTANTS);
        self.view.fill_triangle(
            canvas,
            Vf2d::new(16.0, 4.0),
            Vf2d::new(22.0, 12.0),
            Vf2d::new(12.0, 10.0),
            Pixel::DARK_GREEN,
        );
        self.view.draw_rect(
            canvas,
            Vf2d::new(26.0, 4.0),
            Vf2d::new(6.0, 4.0),
            Pixel::YELLOW,
        );
        self.view.draw_string(
            canvas,
            Vf2d::new(2.0, 14.0),
            "pixelforge",
            Pixel::WHITE,
            1.0 / 8.0,
        );

        let previous = canvas.set_pixel_mode(PixelMode::Alpha);
        self.view.fill_rect(
            canvas,
            Vf2d::new(10.0, 6.0),
            Vf2d::new(10.0, 6.0),
            Pixel::rgba(0, 255, 255, 96),
        );
        canvas.set_pixel_mode(previous);
    }

    fn draw_overlay(&self, engine: &mut Engine) {
        let mouse = engine.input().mouse_pos();
        let tile = self.view.tile_under_screen_pos(mouse.as_f32());
        let fps = engine.fps();
        let canvas = engine.canvas_mut();

        let cursor = format!("tile {},{}", tile.x, tile.y);
        canvas.draw_string(2, 2, &cursor, Pixel::WHITE, 1);
        if self.show_fps {
            canvas.draw_string(2, 12, &format!("{} fps", fps as u32), Pixel::YELLOW, 1);
        }
        canvas.draw_line(mouse.x - 3, mouse.y, mouse.x + 3, mouse.y, Pixel::WHITE, SOLID);
        canvas.draw_line(mouse.x, mouse.y - 3, mouse.x, mouse.y + 3, Pixel::WHITE, SOLID);
    }
}

impl Game for GridViewer {
    fn on_create(&mut self, engine: &mut Engine) -> bool {
        self.view
            .set_view_area(Vi2d::new(engine.screen_width(), engine.screen_height()));
        self.view
            .set_scale_extents(Vf2d::new(1.0, 1.0), Vf2d::new(128.0, 128.0));
        self.view.enable_scale_clamp(true);
        true
    }

    fn on_update(&mut self, engine: &mut Engine, elapsed: f32) -> bool {
        if engine.input().key(Key::Escape).pressed {
            return false;
        }

        self.view
            .handle_pan_and_zoom(engine.input(), MouseButton::Middle, ZOOM_RATE, true, true);
        self.handle_keys(engine, elapsed);

        engine.canvas_mut().clear(Pixel::BLACK);
        self.draw_world(engine);
        self.draw_overlay(engine);
        true
    }

    fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
        true
    }
}

fn main() -> Result<()> {
    let args = parse_args();
    let config = load_config(&args)?;
    init_logging(LoggingConfig::from_engine(&config));

    let mut engine = Engine::new(config.clone())?;
    let (display, texture_creator) = SdlDisplay::open(&config)?;
    let mut platform = SdlPlatform::new(
        display,
        &texture_creator,
        config.screen_width,
        config.screen_height,
        sdl_key_map(),
    )
    .context("setting up SDL platform")?;

    info!(
        "{}x{} at {}x{} (vsync {})",
        config.screen_width, config.screen_height, config.pixel_width, config.pixel_height, config.vsync
    );

    let mut game = GridViewer::new();
    engine.run(&mut game, &mut platform)
}
