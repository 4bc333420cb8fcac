//! World-space camera: pan/zoom transform and world-unit drawing

use crate::display::{Canvas, Pixel, Sprite};
use crate::geometry::{Vf2d, Vi2d};
use crate::input::{InputLatch, MouseButton};

/// Affine world <-> screen mapping with pan and zoom
///
/// `screen = (world - offset) * scale`. Drawing wrappers take world
/// coordinates and snap to the nearest pixel only at the final step.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedView {
    view_area: Vf2d,
    world_offset: Vf2d,
    world_scale: Vf2d,
    pan_anchor: Vf2d,
    panning: bool,
    scale_min: Vf2d,
    scale_max: Vf2d,
    clamp_scale: bool,
}

impl TransformedView {
    /// Identity view covering `view_area` screen pixels
    pub fn new(view_area: Vi2d) -> Self {
        Self {
            view_area: view_area.as_f32(),
            world_offset: Vf2d::new(0.0, 0.0),
            world_scale: Vf2d::new(1.0, 1.0),
            pan_anchor: Vf2d::new(0.0, 0.0),
            panning: false,
            scale_min: Vf2d::new(0.0, 0.0),
            scale_max: Vf2d::new(f32::MAX, f32::MAX),
            clamp_scale: false,
        }
    }

    /// View where one world unit is one `tile_size` tile
    pub fn tiled(view_area: Vi2d, tile_size: Vi2d) -> Self {
        let mut view = Self::new(view_area);
        view.set_world_scale(tile_size.as_f32());
        view
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn set_view_area(&mut self, view_area: Vi2d) {
        self.view_area = view_area.as_f32();
    }

    pub fn view_area(&self) -> Vf2d {
        self.view_area
    }

    pub fn set_world_offset(&mut self, offset: Vf2d) {
        self.world_offset = offset;
    }

    pub fn move_world_offset(&mut self, delta: Vf2d) {
        self.world_offset += delta;
    }

    pub fn world_offset(&self) -> Vf2d {
        self.world_offset
    }

    /// Set the scale directly; non-positive or non-finite components are ignored
    pub fn set_world_scale(&mut self, scale: Vf2d) {
        if !valid_scale(scale) {
            return;
        }
        self.world_scale = self.clamped(scale);
    }

    pub fn world_scale(&self) -> Vf2d {
        self.world_scale
    }

    pub fn set_scale_extents(&mut self, min: Vf2d, max: Vf2d) {
        self.scale_min = min;
        self.scale_max = max;
    }

    pub fn enable_scale_clamp(&mut self, enable: bool) {
        self.clamp_scale = enable;
    }

    fn clamped(&self, scale: Vf2d) -> Vf2d {
        if self.clamp_scale {
            scale.clamp(self.scale_min, self.scale_max)
        } else {
            scale
        }
    }

    // ========================================================================
    // Transform
    // ========================================================================

    #[inline]
    pub fn world_to_screen(&self, world: Vf2d) -> Vf2d {
        (world - self.world_offset) * self.world_scale
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vf2d) -> Vf2d {
        screen / self.world_scale + self.world_offset
    }

    /// Screen-space length of a world-space extent
    #[inline]
    pub fn scale_to_screen(&self, world: Vf2d) -> Vf2d {
        world * self.world_scale
    }

    /// World-space length of a screen-space extent
    #[inline]
    pub fn scale_to_world(&self, screen: Vf2d) -> Vf2d {
        screen / self.world_scale
    }

    /// Multiply the scale by `delta` keeping the world point under `screen_pos` fixed
    pub fn zoom_at_screen_pos(&mut self, delta: f32, screen_pos: Vf2d) {
        if !(delta.is_finite() && delta > 0.0) {
            return;
        }
        self.rescale_around(self.world_scale * delta, screen_pos);
    }

    /// Set a uniform scale keeping the world point under `screen_pos` fixed
    pub fn set_zoom(&mut self, zoom: f32, screen_pos: Vf2d) {
        self.rescale_around(Vf2d::new(zoom, zoom), screen_pos);
    }

    fn rescale_around(&mut self, scale: Vf2d, screen_pos: Vf2d) {
        if !valid_scale(scale) {
            return;
        }
        let before = self.screen_to_world(screen_pos);
        self.world_scale = self.clamped(scale);
        let after = self.screen_to_world(screen_pos);
        self.world_offset += before - after;
    }

    pub fn start_pan(&mut self, screen_pos: Vf2d) {
        self.panning = true;
        self.pan_anchor = screen_pos;
    }

    /// Move the world with the cursor since the last pan call
    pub fn update_pan(&mut self, screen_pos: Vf2d) {
        if self.panning {
            self.world_offset -= (screen_pos - self.pan_anchor) / self.world_scale;
            self.pan_anchor = screen_pos;
        }
    }

    pub fn end_pan(&mut self, screen_pos: Vf2d) {
        self.update_pan(screen_pos);
        self.panning = false;
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Drag-to-pan with `pan_button` and wheel zoom at the cursor
    pub fn handle_pan_and_zoom(
        &mut self,
        input: &InputLatch,
        pan_button: MouseButton,
        zoom_rate: f32,
        pan: bool,
        zoom: bool,
    ) {
        let mouse = input.mouse_pos().as_f32();
        if pan {
            let button = input.mouse(pan_button);
            if button.pressed {
                self.start_pan(mouse);
            }
            if button.held {
                self.update_pan(mouse);
            }
            if button.released {
                self.end_pan(mouse);
            }
        }
        if zoom {
            let wheel = input.mouse_wheel();
            if wheel > 0 {
                self.zoom_at_screen_pos(1.0 + zoom_rate, mouse);
            } else if wheel < 0 {
                self.zoom_at_screen_pos(1.0 - zoom_rate, mouse);
            }
        }
    }

    // ========================================================================
    // Visibility and Tiles
    // ========================================================================

    pub fn world_tl(&self) -> Vf2d {
        self.screen_to_world(Vf2d::new(0.0, 0.0))
    }

    pub fn world_br(&self) -> Vf2d {
        self.screen_to_world(self.view_area)
    }

    pub fn world_visible_area(&self) -> Vf2d {
        self.world_br() - self.world_tl()
    }

    pub fn is_point_visible(&self, world: Vf2d) -> bool {
        let s = self.world_to_screen(world);
        s.x >= 0.0 && s.x < self.view_area.x && s.y >= 0.0 && s.y < self.view_area.y
    }

    pub fn is_rect_visible(&self, pos: Vf2d, size: Vf2d) -> bool {
        let a = self.world_to_screen(pos);
        let b = self.world_to_screen(pos + size);
        let tl = a.min(b);
        let br = a.max(b);
        tl.x < self.view_area.x && br.x >= 0.0 && tl.y < self.view_area.y && br.y >= 0.0
    }

    /// Integer world cell under a screen position
    pub fn tile_under_screen_pos(&self, screen_pos: Vf2d) -> Vi2d {
        self.screen_to_world(screen_pos).floor().as_i32()
    }

    pub fn top_left_tile(&self) -> Vi2d {
        self.tile_under_screen_pos(Vf2d::new(0.0, 0.0))
    }

    /// First tile past the bottom-right screen corner
    pub fn bottom_right_tile(&self) -> Vi2d {
        self.tile_under_screen_pos(self.view_area) + Vi2d::new(1, 1)
    }

    // ========================================================================
    // World-space drawing
    // ========================================================================

    #[inline]
    fn px(&self, world: Vf2d) -> Vi2d {
        self.world_to_screen(world).to_pixel()
    }

    /// Circle radii follow the horizontal scale
    #[inline]
    fn radius_px(&self, radius: f32) -> i32 {
        (radius * self.world_scale.x + 0.5).floor() as i32
    }

    pub fn draw(&self, canvas: &mut Canvas, pos: Vf2d, p: Pixel) -> bool {
        let s = self.px(pos);
        canvas.draw(s.x, s.y, p)
    }

    pub fn draw_line(&self, canvas: &mut Canvas, a: Vf2d, b: Vf2d, p: Pixel, pattern: u32) {
        let (a, b) = (self.px(a), self.px(b));
        canvas.draw_line(a.x, a.y, b.x, b.y, p, pattern);
    }

    pub fn draw_circle(&self, canvas: &mut Canvas, pos: Vf2d, radius: f32, p: Pixel, mask: u8) {
        let s = self.px(pos);
        canvas.draw_circle(s.x, s.y, self.radius_px(radius), p, mask);
    }

    pub fn fill_circle(&self, canvas: &mut Canvas, pos: Vf2d, radius: f32, p: Pixel) {
        let s = self.px(pos);
        canvas.fill_circle(s.x, s.y, self.radius_px(radius), p);
    }

    pub fn draw_rect(&self, canvas: &mut Canvas, pos: Vf2d, size: Vf2d, p: Pixel) {
        if !self.is_rect_visible(pos, size) {
            return;
        }
        let s = self.px(pos);
        let e = self.scale_to_screen(size).to_pixel();
        canvas.draw_rect(s.x, s.y, e.x, e.y, p);
    }

    pub fn fill_rect(&self, canvas: &mut Canvas, pos: Vf2d, size: Vf2d, p: Pixel) {
        if !self.is_rect_visible(pos, size) {
            return;
        }
        let s = self.px(pos);
        let e = self.scale_to_screen(size).to_pixel();
        canvas.fill_rect(s.x, s.y, e.x, e.y, p);
    }

    pub fn draw_triangle(&self, canvas: &mut Canvas, a: Vf2d, b: Vf2d, c: Vf2d, p: Pixel) {
        let (a, b, c) = (self.px(a), self.px(b), self.px(c));
        canvas.draw_triangle(a.x, a.y, b.x, b.y, c.x, c.y, p);
    }

    pub fn fill_triangle(&self, canvas: &mut Canvas, a: Vf2d, b: Vf2d, c: Vf2d, p: Pixel) {
        let (a, b, c) = (self.px(a), self.px(b), self.px(c));
        canvas.fill_triangle(a.x, a.y, b.x, b.y, c.x, c.y, p);
    }

    /// Draw a sprite covering `sprite size * scale` world units at `pos`
    ///
    /// Each covered screen pixel samples its nearest source pixel.
    pub fn draw_sprite(&self, canvas: &mut Canvas, pos: Vf2d, sprite: &Sprite, scale: Vf2d) {
        let extent = sprite.size().as_f32() * scale;
        if !self.is_rect_visible(pos, extent) {
            return;
        }
        let tl = self.world_to_screen(pos);
        let br = self.world_to_screen(pos + extent);
        let span = br - tl;
        if span.x == 0.0 || span.y == 0.0 || !span.is_finite() {
            return;
        }

        let lo = tl.min(br).round().max(Vf2d::new(0.0, 0.0)).as_i32();
        let hi = tl
            .max(br)
            .round()
            .min(Vf2d::new(canvas.draw_target_width() as f32, canvas.draw_target_height() as f32))
            .as_i32();
        let src = sprite.size().as_f32();

        for y in lo.y..hi.y {
            let v = (y as f32 + 0.5 - tl.y) / span.y;
            let sy = (v * src.y).floor() as i32;
            for x in lo.x..hi.x {
                let u = (x as f32 + 0.5 - tl.x) / span.x;
                let sx = (u * src.x).floor() as i32;
                canvas.draw(x, y, sprite.get_pixel(sx, sy));
            }
        }
    }

    /// Text at `pos`; the glyph scale follows the horizontal world scale
    pub fn draw_string(&self, canvas: &mut Canvas, pos: Vf2d, text: &str, p: Pixel, scale: f32) {
        let s = self.px(pos);
        let glyph_scale = (scale * self.world_scale.x + 0.5).floor();
        if glyph_scale >= 1.0 {
            canvas.draw_string(s.x, s.y, text, p, glyph_scale as u32);
        }
    }
}

fn valid_scale(scale: Vf2d) -> bool {
    scale.is_finite() && scale.x > 0.0 && scale.y > 0.0
}
