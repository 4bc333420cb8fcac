use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

// ============================================================================
// Pixel
// ============================================================================

/// RGBA colour, one byte per channel
///
/// Memory order is r, g, b, a, so a `&[Pixel]` is directly an ABGR8888
/// (little-endian u32) byte stream.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const GREY: Self = Self::rgb(192, 192, 192);
    pub const DARK_GREY: Self = Self::rgb(128, 128, 128);
    pub const VERY_DARK_GREY: Self = Self::rgb(64, 64, 64);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const DARK_RED: Self = Self::rgb(128, 0, 0);
    pub const VERY_DARK_RED: Self = Self::rgb(64, 0, 0);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const DARK_YELLOW: Self = Self::rgb(128, 128, 0);
    pub const VERY_DARK_YELLOW: Self = Self::rgb(64, 64, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const DARK_GREEN: Self = Self::rgb(0, 128, 0);
    pub const VERY_DARK_GREEN: Self = Self::rgb(0, 64, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const DARK_CYAN: Self = Self::rgb(0, 128, 128);
    pub const VERY_DARK_CYAN: Self = Self::rgb(0, 64, 64);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const DARK_BLUE: Self = Self::rgb(0, 0, 128);
    pub const VERY_DARK_BLUE: Self = Self::rgb(0, 0, 64);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const DARK_MAGENTA: Self = Self::rgb(128, 0, 128);
    pub const VERY_DARK_MAGENTA: Self = Self::rgb(64, 0, 64);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const BLANK: Self = Self::rgba(0, 0, 0, 0);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Build from normalised channels, clamped to [0, 1]
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self::rgba(q(r), q(g), q(b), q(a))
    }

    /// Packed word, `r` in the low byte
    #[inline]
    pub const fn to_u32(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    #[inline]
    pub const fn from_u32(n: u32) -> Self {
        let [r, g, b, a] = n.to_le_bytes();
        Self::rgba(r, g, b, a)
    }

    /// HSV to RGB, h: 0-360, s: 0-1, v: 0-1
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let h = h.rem_euclid(360.0);
        let c = v * s;
        let h_prime = h / 60.0;
        let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
        let m = v - c;

        let (r1, g1, b1) = match h_prime as i32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::from_f32(r1 + m, g1 + m, b1 + m, 1.0)
    }

    /// Linear interpolation of all four channels
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Colour channels inverted, alpha kept
    #[inline]
    pub const fn inv(self) -> Self {
        Self::rgba(255 - self.r, 255 - self.g, 255 - self.b, self.a)
    }

    /// Colour channels scaled and saturated, alpha kept
    #[inline]
    pub fn scale(self, f: f32) -> Self {
        let s = |c: u8| (c as f32 * f).clamp(0.0, 255.0) as u8;
        Self::rgba(s(self.r), s(self.g), s(self.b), self.a)
    }
}

impl Default for Pixel {
    /// Opaque black
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<u32> for Pixel {
    fn from(n: u32) -> Self {
        Self::from_u32(n)
    }
}

impl From<Pixel> for u32 {
    fn from(p: Pixel) -> Self {
        p.to_u32()
    }
}
