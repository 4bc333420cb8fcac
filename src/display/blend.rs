use std::fmt;

use super::pixel::Pixel;
use super::sprite::Sprite;

// ============================================================================
// Pixel Mode
// ============================================================================

/// User blend callback: `(x, y, source, destination) -> result`
pub type BlendFn = Box<dyn FnMut(i32, i32, Pixel, Pixel) -> Pixel>;

/// How a drawn pixel combines with what is already in the target
#[derive(Default)]
pub enum PixelMode {
    /// Overwrite
    #[default]
    Normal,
    /// Write only fully opaque source pixels
    Mask,
    /// `dst = src * a + dst * (1 - a)`, `a = src.a / 255 * blend_factor`
    Alpha,
    /// Full override by a user callback
    Custom(BlendFn),
}

impl PixelMode {
    pub fn custom(f: impl FnMut(i32, i32, Pixel, Pixel) -> Pixel + 'static) -> Self {
        Self::Custom(Box::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Mask => "mask",
            Self::Alpha => "alpha",
            Self::Custom(_) => "custom",
        }
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Debug for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Blender
// ============================================================================

/// Resolves every pixel write against the active mode
#[derive(Debug)]
pub struct Blender {
    mode: PixelMode,
    blend_factor: f32,
}

impl Default for Blender {
    fn default() -> Self {
        Self::new()
    }
}

/// Alpha blend one channel
#[inline]
fn mix(src: u8, dst: u8, a: f32) -> u8 {
    (a * src as f32 + (1.0 - a) * dst as f32) as u8
}

impl Blender {
    pub fn new() -> Self {
        Self {
            mode: PixelMode::Normal,
            blend_factor: 1.0,
        }
    }

    #[inline]
    pub fn mode(&self) -> &PixelMode {
        &self.mode
    }

    /// Install a new mode, returning the previous one
    pub fn set_mode(&mut self, mode: PixelMode) -> PixelMode {
        std::mem::replace(&mut self.mode, mode)
    }

    #[inline]
    pub fn blend_factor(&self) -> f32 {
        self.blend_factor
    }

    /// Global alpha multiplier, clamped to [0, 1]
    pub fn set_blend_factor(&mut self, f: f32) {
        self.blend_factor = if f.is_nan() { 1.0 } else { f.clamp(0.0, 1.0) };
    }

    /// Combine `src` with `dst`; `None` means the write is suppressed
    pub fn resolve(&mut self, x: i32, y: i32, src: Pixel, dst: Pixel) -> Option<Pixel> {
        match &mut self.mode {
            PixelMode::Normal => Some(src),
            PixelMode::Mask => (src.a == 255).then_some(src),
            PixelMode::Alpha => {
                let a = (src.a as f32 / 255.0) * self.blend_factor;
                Some(Pixel::rgb(mix(src.r, dst.r, a), mix(src.g, dst.g, a), mix(src.b, dst.b, a)))
            },
            PixelMode::Custom(f) => Some(f(x, y, src, dst)),
        }
    }

    /// Blend a single pixel into `target`; `false` if clipped or masked out
    pub fn plot(&mut self, target: &mut Sprite, x: i32, y: i32, p: Pixel) -> bool {
        if !target.in_bounds(x, y) {
            return false;
        }
        match self.mode {
            PixelMode::Normal => target.set_pixel(x, y, p),
            _ => {
                let dst = target.get_pixel(x, y);
                match self.resolve(x, y, p, dst) {
                    Some(out) => target.set_pixel(x, y, out),
                    None => false,
                }
            },
        }
    }

    /// Blend the inclusive horizontal run `x1..=x2` on row `y`
    pub fn span(&mut self, target: &mut Sprite, x1: i32, x2: i32, y: i32, p: Pixel) {
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let lo = lo.max(0);
        let hi = hi.min(target.width() as i32 - 1);
        if lo > hi {
            return;
        }

        let opaque_fill = match self.mode {
            PixelMode::Normal => true,
            PixelMode::Mask => {
                if p.a != 255 {
                    return;
                }
                true
            },
            _ => false,
        };

        if opaque_fill {
            if let Some(row) = target.row_mut(y) {
                row[lo as usize..=hi as usize].fill(p);
            }
        } else if y >= 0 && (y as u32) < target.height() {
            for x in lo..=hi {
                self.plot(target, x, y, p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Sprite {
        Sprite::filled(4, 1, Pixel::rgb(100, 100, 100))
    }

    #[test]
    fn test_normal_overwrites_including_alpha() {
        let mut b = Blender::new();
        let mut s = target();
        assert!(b.plot(&mut s, 0, 0, Pixel::rgba(10, 20, 30, 40)));
        assert_eq!(s.get_pixel(0, 0), Pixel::rgba(10, 20, 30, 40));
    }

    #[test]
    fn test_mask_skips_translucent() {
        let mut b = Blender::new();
        b.set_mode(PixelMode::Mask);
        let mut s = target();
        assert!(!b.plot(&mut s, 0, 0, Pixel::rgba(255, 0, 0, 254)));
        assert_eq!(s.get_pixel(0, 0), Pixel::rgb(100, 100, 100));
        assert!(b.plot(&mut s, 1, 0, Pixel::RED));
        assert_eq!(s.get_pixel(1, 0), Pixel::RED);
    }

    #[test]
    fn test_alpha_half_blend() {
        let mut b = Blender::new();
        b.set_mode(PixelMode::Alpha);
        let mut s = Sprite::filled(1, 1, Pixel::rgba(0, 0, 0, 0));
        b.plot(&mut s, 0, 0, Pixel::rgba(255, 255, 255, 128));
        let out = s.get_pixel(0, 0);
        assert!((out.r as i32 - 128).abs() <= 1);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn test_alpha_blend_factor_scales_alpha() {
        let mut b = Blender::new();
        b.set_mode(PixelMode::Alpha);
        b.set_blend_factor(0.0);
        let mut s = target();
        b.plot(&mut s, 0, 0, Pixel::WHITE);
        assert_eq!(s.get_pixel(0, 0), Pixel::rgb(100, 100, 100));

        b.set_blend_factor(7.0);
        assert_eq!(b.blend_factor(), 1.0);
        b.plot(&mut s, 0, 0, Pixel::WHITE);
        assert_eq!(s.get_pixel(0, 0), Pixel::WHITE);
    }

    #[test]
    fn test_custom_receives_coordinates_and_destination() {
        let mut b = Blender::new();
        b.set_mode(PixelMode::custom(|x, _y, src, dst| {
            Pixel::rgb(x as u8, src.g, dst.b)
        }));
        let mut s = target();
        b.plot(&mut s, 3, 0, Pixel::rgb(1, 2, 3));
        assert_eq!(s.get_pixel(3, 0), Pixel::rgb(3, 2, 100));
    }

    #[test]
    fn test_custom_not_called_out_of_bounds() {
        let mut b = Blender::new();
        b.set_mode(PixelMode::custom(|_, _, _, _| panic!("called")));
        let mut s = target();
        assert!(!b.plot(&mut s, 9, 0, Pixel::RED));
    }

    #[test]
    fn test_span_clips_and_accepts_reversed_ends() {
        let mut b = Blender::new();
        let mut s = target();
        b.span(&mut s, 10, -5, 0, Pixel::RED);
        assert!(s.pixels().iter().all(|&p| p == Pixel::RED));
        b.span(&mut s, 0, 3, 1, Pixel::GREEN);
        assert!(s.pixels().iter().all(|&p| p == Pixel::RED));
    }

    #[test]
    fn test_set_mode_returns_previous() {
        let mut b = Blender::new();
        let prev = b.set_mode(PixelMode::Alpha);
        assert!(matches!(prev, PixelMode::Normal));
        assert!(matches!(b.mode(), PixelMode::Alpha));
    }
}
