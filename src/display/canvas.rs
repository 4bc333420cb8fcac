use bitflags::bitflags;
use log::{debug, warn};

use super::blend::{Blender, PixelMode};
use super::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::pixel::Pixel;
use super::raster::{self, Clip};
use super::sprite::Sprite;
use crate::geometry::Vi2d;

bitflags! {
    /// Mirroring applied when blitting a sprite
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flip: u8 {
        const HORIZ = 0b01;
        const VERT = 0b10;
    }
}

/// Handle to an offscreen layer owned by a `Canvas`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(usize);

/// Which buffer draw calls write into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DrawTarget {
    #[default]
    Screen,
    Layer(LayerId),
}

// ============================================================================
// Canvas
// ============================================================================

/// The screen buffer, its offscreen layers and the drawing state
///
/// Every primitive is rasterized by `raster` and each touched pixel goes
/// through the active `PixelMode` onto the bound target.
pub struct Canvas {
    screen: Sprite,
    layers: Vec<Sprite>,
    target: DrawTarget,
    blender: Blender,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            screen: Sprite::new(width, height),
            layers: Vec::new(),
            target: DrawTarget::Screen,
            blender: Blender::new(),
        }
    }

    /// The primary screen buffer, as presented
    #[inline]
    pub fn screen(&self) -> &Sprite {
        &self.screen
    }

    #[inline]
    pub fn screen_mut(&mut self) -> &mut Sprite {
        &mut self.screen
    }

    // ========================================================================
    // Targets and Layers
    // ========================================================================

    /// New transparent layer the size of the screen
    pub fn create_layer(&mut self) -> LayerId {
        let id = LayerId(self.layers.len());
        self.layers.push(Sprite::filled(
            self.screen.width(),
            self.screen.height(),
            Pixel::BLANK,
        ));
        debug!("created layer {}", id.0);
        id
    }

    pub fn layer(&self, id: LayerId) -> Option<&Sprite> {
        self.layers.get(id.0)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Sprite> {
        self.layers.get_mut(id.0)
    }

    /// Bind a layer as the draw target; `None` selects the screen
    pub fn set_draw_target(&mut self, layer: Option<LayerId>) {
        self.target = match layer {
            Some(id) if id.0 < self.layers.len() => DrawTarget::Layer(id),
            Some(id) => {
                warn!("unknown layer {}, drawing to screen", id.0);
                DrawTarget::Screen
            },
            None => DrawTarget::Screen,
        };
        debug!("draw target now {:?}", self.target);
    }

    #[inline]
    pub fn draw_target(&self) -> DrawTarget {
        self.target
    }

    fn target_sprite(&self) -> &Sprite {
        match self.target {
            DrawTarget::Screen => &self.screen,
            DrawTarget::Layer(id) => self.layers.get(id.0).unwrap_or(&self.screen),
        }
    }

    /// Split borrow of the bound target and the blender
    fn parts(&mut self) -> (&mut Sprite, &mut Blender) {
        let target = match self.target {
            DrawTarget::Screen => &mut self.screen,
            DrawTarget::Layer(id) => match self.layers.get_mut(id.0) {
                Some(layer) => layer,
                None => &mut self.screen,
            },
        };
        (target, &mut self.blender)
    }

    pub fn draw_target_width(&self) -> i32 {
        self.target_sprite().width() as i32
    }

    pub fn draw_target_height(&self) -> i32 {
        self.target_sprite().height() as i32
    }

    // ========================================================================
    // Blend State
    // ========================================================================

    /// Install a pixel mode, returning the previous one
    pub fn set_pixel_mode(&mut self, mode: PixelMode) -> PixelMode {
        self.blender.set_mode(mode)
    }

    pub fn pixel_mode(&self) -> &PixelMode {
        self.blender.mode()
    }

    /// Global alpha multiplier for `PixelMode::Alpha`, clamped to [0, 1]
    pub fn set_pixel_blend(&mut self, factor: f32) {
        self.blender.set_blend_factor(factor);
    }

    pub fn pixel_blend(&self) -> f32 {
        self.blender.blend_factor()
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// Blend one pixel into the target; `false` if clipped or masked out
    #[inline]
    pub fn draw(&mut self, x: i32, y: i32, p: Pixel) -> bool {
        let (target, blender) = self.parts();
        blender.plot(target, x, y, p)
    }

    /// Fill the whole target, ignoring the pixel mode
    pub fn clear(&mut self, p: Pixel) {
        self.parts().0.fill(p);
    }

    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, p: Pixel, pattern: u32) {
        let (target, blender) = self.parts();
        let Some(clip) = Clip::of_size(target.width(), target.height()) else {
            return;
        };
        raster::line(x1, y1, x2, y2, pattern, clip, |x, y| {
            blender.plot(target, x, y, p);
        });
    }

    pub fn draw_circle(&mut self, x: i32, y: i32, radius: i32, p: Pixel, mask: u8) {
        let (target, blender) = self.parts();
        let Some(clip) = Clip::of_size(target.width(), target.height()) else {
            return;
        };
        raster::circle(x, y, radius, mask, clip, |px, py| {
            blender.plot(target, px, py, p);
        });
    }

    pub fn fill_circle(&mut self, x: i32, y: i32, radius: i32, p: Pixel) {
        let (target, blender) = self.parts();
        let Some(clip) = Clip::of_size(target.width(), target.height()) else {
            return;
        };
        raster::fill_circle(x, y, radius, clip, |x1, x2, row| {
            blender.span(target, x1, x2, row, p);
        });
    }

    /// Outline covering `x..=x+w`, `y..=y+h`
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, p: Pixel) {
        let (x2, y2) = (x.saturating_add(w), y.saturating_add(h));
        self.draw_line(x, y, x2, y, p, raster::SOLID);
        self.draw_line(x2, y, x2, y2, p, raster::SOLID);
        self.draw_line(x2, y2, x, y2, p, raster::SOLID);
        self.draw_line(x, y2, x, y, p, raster::SOLID);
    }

    /// Solid block covering `x..x+w`, `y..y+h`, clipped to the target
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, p: Pixel) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (target, blender) = self.parts();
        let x1 = x.max(0);
        let y1 = y.max(0);
        let x2 = x.saturating_add(w).min(target.width() as i32);
        let y2 = y.saturating_add(h).min(target.height() as i32);
        for row in y1..y2 {
            blender.span(target, x1, x2 - 1, row, p);
        }
    }

    pub fn draw_triangle(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        p: Pixel,
    ) {
        self.draw_line(x1, y1, x2, y2, p, raster::SOLID);
        self.draw_line(x2, y2, x3, y3, p, raster::SOLID);
        self.draw_line(x3, y3, x1, y1, p, raster::SOLID);
    }

    pub fn fill_triangle(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        p: Pixel,
    ) {
        let (target, blender) = self.parts();
        let Some(clip) = Clip::of_size(target.width(), target.height()) else {
            return;
        };
        raster::fill_triangle((x1, y1), (x2, y2), (x3, y3), clip, |a, b, row| {
            blender.span(target, a, b, row, p);
        });
    }

    // ========================================================================
    // Sprites
    // ========================================================================

    /// Blit a whole sprite, each source pixel replicated `scale` times
    pub fn draw_sprite(&mut self, x: i32, y: i32, sprite: &Sprite, scale: u32, flip: Flip) {
        let size = sprite.size();
        self.draw_partial_sprite(x, y, sprite, Vi2d::new(0, 0), size, scale, flip);
    }

    /// Blit the `size` region of `sprite` starting at `origin`
    pub fn draw_partial_sprite(
        &mut self,
        x: i32,
        y: i32,
        sprite: &Sprite,
        origin: Vi2d,
        size: Vi2d,
        scale: u32,
        flip: Flip,
    ) {
        let (target, blender) = self.parts();
        blit(target, blender, Vi2d::new(x, y), sprite, origin, size, scale, flip);
    }

    /// Blit an offscreen layer onto the current target
    ///
    /// Drawing a layer into another layer (or itself) reads from a snapshot.
    pub fn draw_layer(&mut self, x: i32, y: i32, layer: LayerId, scale: u32, flip: Flip) {
        let Some(source) = self.layers.get(layer.0) else {
            warn!("draw_layer: unknown layer {}", layer.0);
            return;
        };
        let size = source.size();
        match self.target {
            DrawTarget::Screen => blit(
                &mut self.screen,
                &mut self.blender,
                Vi2d::new(x, y),
                source,
                Vi2d::new(0, 0),
                size,
                scale,
                flip,
            ),
            DrawTarget::Layer(_) => {
                let snapshot = source.duplicate();
                self.draw_sprite(x, y, &snapshot, scale, flip);
            },
        }
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Draw text with the built-in 8x8 font
    ///
    /// Opaque colours draw in `Mask` mode, translucent ones in `Alpha`. A
    /// custom mode is left in place. The previous mode is restored afterwards.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, p: Pixel, scale: u32) {
        if scale == 0 || text.is_empty() {
            return;
        }
        let previous = if self.blender.mode().is_custom() {
            None
        } else {
            let mode = if p.a == 255 { PixelMode::Mask } else { PixelMode::Alpha };
            Some(self.blender.set_mode(mode))
        };

        let scale = scale as i32;
        let sheet = font::font_sheet();
        let (target, blender) = self.parts();

        font::layout(text, |c, col, row| {
            let Some((ox, oy)) = font::glyph_origin(c) else {
                return;
            };
            let cx = x + col * GLYPH_WIDTH * scale;
            let cy = y + row * GLYPH_HEIGHT * scale;
            for j in 0..GLYPH_HEIGHT {
                for i in 0..GLYPH_WIDTH {
                    if sheet.get_pixel(ox + i, oy + j).a == 0 {
                        continue;
                    }
                    for js in 0..scale {
                        for is in 0..scale {
                            blender.plot(target, cx + i * scale + is, cy + j * scale + js, p);
                        }
                    }
                }
            }
        });

        if let Some(previous) = previous {
            self.blender.set_mode(previous);
        }
    }

    /// Pixel extent of `text` at scale 1
    pub fn text_size(&self, text: &str) -> Vi2d {
        let (w, h) = font::text_size(text);
        Vi2d::new(w, h)
    }
}

/// Nearest-neighbour blit with integer scale and mirroring
fn blit(
    target: &mut Sprite,
    blender: &mut Blender,
    pos: Vi2d,
    sprite: &Sprite,
    origin: Vi2d,
    size: Vi2d,
    scale: u32,
    flip: Flip,
) {
    if scale == 0 || size.x <= 0 || size.y <= 0 {
        return;
    }
    let scale = scale as i32;
    let (fxs, fxm) = if flip.contains(Flip::HORIZ) { (size.x - 1, -1) } else { (0, 1) };
    let (fys, fym) = if flip.contains(Flip::VERT) { (size.y - 1, -1) } else { (0, 1) };

    if scale == 1 {
        for j in 0..size.y {
            let sy = origin.y + fys + fym * j;
            for i in 0..size.x {
                let sx = origin.x + fxs + fxm * i;
                blender.plot(target, pos.x + i, pos.y + j, sprite.get_pixel(sx, sy));
            }
        }
        return;
    }

    for j in 0..size.y {
        let sy = origin.y + fys + fym * j;
        for i in 0..size.x {
            let src = sprite.get_pixel(origin.x + fxs + fxm * i, sy);
            let (bx, by) = (pos.x + i * scale, pos.y + j * scale);
            for js in 0..scale {
                for is in 0..scale {
                    blender.plot(target, bx + is, by + js, src);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(s: &Sprite, p: Pixel) -> usize {
        s.pixels().iter().filter(|&&q| q == p).count()
    }

    #[test]
    fn test_default_target_is_screen_and_none_is_idempotent() {
        let mut c = Canvas::new(16, 16);
        assert_eq!(c.draw_target(), DrawTarget::Screen);
        let layer = c.create_layer();
        c.set_draw_target(Some(layer));
        assert_eq!(c.draw_target(), DrawTarget::Layer(layer));
        c.set_draw_target(None);
        let first = c.draw_target();
        c.set_draw_target(None);
        assert_eq!(first, c.draw_target());
        assert_eq!(first, DrawTarget::Screen);
    }

    #[test]
    fn test_draw_goes_to_bound_layer() {
        let mut c = Canvas::new(8, 8);
        let layer = c.create_layer();
        c.set_draw_target(Some(layer));
        assert!(c.draw(1, 1, Pixel::RED));
        assert_eq!(c.layer(layer).map(|l| l.get_pixel(1, 1)), Some(Pixel::RED));
        assert_eq!(c.screen().get_pixel(1, 1), Pixel::BLACK);
    }

    #[test]
    fn test_draw_out_of_range_returns_false() {
        let mut c = Canvas::new(8, 8);
        assert!(!c.draw(-1, 0, Pixel::RED));
        assert!(!c.draw(0, 8, Pixel::RED));
        assert_eq!(count(c.screen(), Pixel::RED), 0);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(-5, -5, 8, 8, Pixel::GREEN);
        assert_eq!(count(c.screen(), Pixel::GREEN), 9);
        c.fill_rect(8, 8, 100, 100, Pixel::BLUE);
        assert_eq!(count(c.screen(), Pixel::BLUE), 4);
        c.fill_rect(0, 0, 0, 5, Pixel::RED);
        assert_eq!(count(c.screen(), Pixel::RED), 0);
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut c = Canvas::new(10, 10);
        c.draw_rect(1, 1, 3, 3, Pixel::WHITE);
        assert_eq!(count(c.screen(), Pixel::WHITE), 12);
        assert_eq!(c.screen().get_pixel(2, 2), Pixel::BLACK);
    }

    #[test]
    fn test_offscreen_line_is_clipped() {
        let mut c = Canvas::new(10, 10);
        c.draw_line(-1_000_000, 5, 1_000_000, 5, Pixel::RED, raster::SOLID);
        assert_eq!(count(c.screen(), Pixel::RED), 10);
    }

    #[test]
    fn test_dashed_line_crossing_the_edge_keeps_its_phase() {
        let mut c = Canvas::new(10, 1);
        c.draw_line(-3, 0, 9, 0, Pixel::RED, 0xAAAA_AAAA);
        let lit: Vec<i32> = (0..10)
            .filter(|&x| c.screen().get_pixel(x, 0) == Pixel::RED)
            .collect();
        assert_eq!(lit, vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_huge_circles_stay_on_screen() {
        let mut c = Canvas::new(16, 16);
        c.draw_circle(8, 8, i32::MAX, Pixel::RED, raster::ALL_OCTANTS);
        assert_eq!(count(c.screen(), Pixel::RED), 0);

        c.fill_circle(8, 8, i32::MAX, Pixel::RED);
        assert_eq!(count(c.screen(), Pixel::RED), 256);
    }

    #[test]
    fn test_far_offscreen_triangle_fills_visible_rows() {
        let mut c = Canvas::new(16, 16);
        c.fill_triangle(-200_000_000, 0, 200_000_000, 0, 0, 4, Pixel::GREEN);
        assert_eq!(count(c.screen(), Pixel::GREEN), 80);
        assert!((0..16).all(|x| c.screen().get_pixel(x, 5) == Pixel::BLACK));

        let mut c = Canvas::new(16, 16);
        c.fill_triangle(0, -50_000_000, 10, 50_000_000, 5, 0, Pixel::GREEN);
        assert!((0..16).all(|y| c.screen().get_pixel(5, y) == Pixel::GREEN));
    }

    #[test]
    fn test_alpha_fill_circle_never_double_blends() {
        let mut c = Canvas::new(21, 21);
        c.set_pixel_mode(PixelMode::Alpha);
        c.fill_circle(10, 10, 10, Pixel::rgba(255, 255, 255, 128));
        let touched: Vec<_> = c.screen().pixels().iter().filter(|p| p.r > 0).collect();
        assert!(!touched.is_empty());
        assert!(touched.iter().all(|p| p.r == touched[0].r));
    }

    #[test]
    fn test_fill_triangle_golden_on_canvas() {
        let mut c = Canvas::new(16, 16);
        c.fill_triangle(0, 0, 10, 0, 0, 10, Pixel::WHITE);
        for y in 0..16 {
            for x in 0..16 {
                let inside = x + y <= 10 && x <= 10 && y <= 10;
                assert_eq!(c.screen().get_pixel(x, y) == Pixel::WHITE, inside, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_draw_sprite_scale_and_flip() {
        let mut src = Sprite::new(2, 1);
        src.set_pixel(0, 0, Pixel::RED);
        src.set_pixel(1, 0, Pixel::GREEN);

        let mut c = Canvas::new(8, 8);
        c.draw_sprite(0, 0, &src, 2, Flip::empty());
        assert_eq!(c.screen().get_pixel(1, 1), Pixel::RED);
        assert_eq!(c.screen().get_pixel(2, 0), Pixel::GREEN);
        assert_eq!(c.screen().get_pixel(3, 1), Pixel::GREEN);

        c.draw_sprite(0, 4, &src, 1, Flip::HORIZ);
        assert_eq!(c.screen().get_pixel(0, 4), Pixel::GREEN);
        assert_eq!(c.screen().get_pixel(1, 4), Pixel::RED);

        c.clear(Pixel::BLACK);
        c.draw_sprite(0, 0, &src, 0, Flip::empty());
        assert_eq!(count(c.screen(), Pixel::BLACK), 64);
    }

    #[test]
    fn test_draw_partial_sprite_region() {
        let mut src = Sprite::new(4, 4);
        src.set_pixel(2, 3, Pixel::YELLOW);
        let mut c = Canvas::new(4, 4);
        c.draw_partial_sprite(0, 0, &src, Vi2d::new(2, 2), Vi2d::new(2, 2), 1, Flip::empty());
        assert_eq!(c.screen().get_pixel(0, 1), Pixel::YELLOW);
    }

    #[test]
    fn test_draw_layer_onto_itself() {
        let mut c = Canvas::new(4, 4);
        let layer = c.create_layer();
        c.set_draw_target(Some(layer));
        c.draw(0, 0, Pixel::RED);
        c.draw_layer(1, 0, layer, 1, Flip::empty());
        let l = c.layer(layer).map(Sprite::duplicate).unwrap_or_default();
        assert_eq!(l.get_pixel(0, 0), Pixel::RED);
        assert_eq!(l.get_pixel(1, 0), Pixel::RED);
        assert_eq!(l.get_pixel(2, 0), Pixel::BLANK);
    }

    #[test]
    fn test_draw_layer_onto_screen_with_mask() {
        let mut c = Canvas::new(4, 4);
        let layer = c.create_layer();
        if let Some(l) = c.layer_mut(layer) {
            l.set_pixel(3, 3, Pixel::CYAN);
        }
        c.set_pixel_mode(PixelMode::Mask);
        c.draw_layer(0, 0, layer, 1, Flip::empty());
        assert_eq!(count(c.screen(), Pixel::CYAN), 1);
        assert_eq!(count(c.screen(), Pixel::BLACK), 15);
    }

    #[test]
    fn test_draw_string_restores_mode() {
        let mut c = Canvas::new(64, 16);
        c.set_pixel_mode(PixelMode::Normal);
        c.draw_string(0, 0, "A", Pixel::WHITE, 1);
        assert!(matches!(c.pixel_mode(), PixelMode::Normal));
        // Mask mode: the glyph background is not drawn
        assert_eq!(c.screen().get_pixel(0, 0), Pixel::BLACK);
        assert_eq!(c.screen().get_pixel(2, 0), Pixel::WHITE);

        c.set_pixel_mode(PixelMode::Alpha);
        c.draw_string(8, 0, "A", Pixel::rgba(255, 0, 0, 128), 2);
        assert!(matches!(c.pixel_mode(), PixelMode::Alpha));
        let p = c.screen().get_pixel(8 + 4, 0);
        assert!(p.r > 100 && p.r < 160);
    }

    #[test]
    fn test_draw_string_keeps_custom_mode() {
        let mut c = Canvas::new(16, 8);
        c.set_pixel_mode(PixelMode::custom(|_, _, _, _| Pixel::MAGENTA));
        c.draw_string(0, 0, "A", Pixel::WHITE, 1);
        assert!(c.pixel_mode().is_custom());
        assert_eq!(c.screen().get_pixel(2, 0), Pixel::MAGENTA);
        assert_eq!(c.screen().get_pixel(0, 0), Pixel::BLACK);
    }

    #[test]
    fn test_draw_string_newline_and_unknown_chars() {
        let mut c = Canvas::new(16, 16);
        c.draw_string(0, 0, "\u{263a}\nA", Pixel::WHITE, 1);
        assert_eq!(c.screen().get_pixel(2, 8), Pixel::WHITE);
        assert_eq!(count(&c.screen().duplicate_partial(Vi2d::new(0, 0), Vi2d::new(16, 8)), Pixel::WHITE), 0);
        assert_eq!(c.text_size("ab\ncd"), Vi2d::new(16, 16));
    }
}
