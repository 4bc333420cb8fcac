//! Owned pixel arrays: the screen buffer, offscreen layers and images

use super::pixel::Pixel;
use crate::geometry::Vi2d;

/// How out-of-range reads resolve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleMode {
    /// Out of range reads return `Pixel::BLANK`
    #[default]
    Normal,
    /// Coordinates wrap around (tiling)
    Periodic,
    /// Coordinates clamp to the nearest edge
    Clamp,
}

/// A fixed-size grid of pixels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    pub sample_mode: SampleMode,
}

impl Sprite {
    /// Create a sprite filled with opaque black
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Pixel::default())
    }

    pub fn filled(width: u32, height: u32, p: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![p; width as usize * height as usize],
            sample_mode: SampleMode::Normal,
        }
    }

    /// Wrap existing pixel data; `None` if the length does not match
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Option<Self> {
        if pixels.len() == width as usize * height as usize {
            Some(Self {
                width,
                height,
                pixels,
                sample_mode: SampleMode::Normal,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Vi2d {
        Vi2d::new(self.width as i32, self.height as i32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Read a pixel, resolving out-of-range coordinates through `sample_mode`
    pub fn get_pixel(&self, x: i32, y: i32) -> Pixel {
        if self.in_bounds(x, y) {
            return self.pixels[self.index(x, y)];
        }
        if self.pixels.is_empty() {
            return Pixel::BLANK;
        }
        match self.sample_mode {
            SampleMode::Normal => Pixel::BLANK,
            SampleMode::Periodic => {
                let px = x.rem_euclid(self.width as i32);
                let py = y.rem_euclid(self.height as i32);
                self.pixels[self.index(px, py)]
            },
            SampleMode::Clamp => {
                let px = x.clamp(0, self.width as i32 - 1);
                let py = y.clamp(0, self.height as i32 - 1);
                self.pixels[self.index(px, py)]
            },
        }
    }

    /// Write a pixel; returns `false` (and does nothing) when out of range
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, p: Pixel) -> bool {
        if self.in_bounds(x, y) {
            let i = self.index(x, y);
            self.pixels[i] = p;
            true
        } else {
            false
        }
    }

    /// Nearest sample at normalised coordinates
    pub fn sample(&self, u: f32, v: f32) -> Pixel {
        let sx = ((u * self.width as f32) as i32).min(self.width as i32 - 1);
        let sy = ((v * self.height as f32) as i32).min(self.height as i32 - 1);
        self.get_pixel(sx, sy)
    }

    /// Bilinear sample at normalised coordinates
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Pixel {
        let u = u * self.width as f32 - 0.5;
        let v = v * self.height as f32 - 0.5;
        let x = u.floor() as i32;
        let y = v.floor() as i32;
        let fx = u - u.floor();
        let fy = v - v.floor();

        let c00 = self.get_pixel(x, y);
        let c10 = self.get_pixel(x + 1, y);
        let c01 = self.get_pixel(x, y + 1);
        let c11 = self.get_pixel(x + 1, y + 1);

        c00.lerp(c10, fx).lerp(c01.lerp(c11, fx), fy)
    }

    pub fn fill(&mut self, p: Pixel) {
        self.pixels.fill(p);
    }

    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Copy a sub-rectangle; parts outside the source read through `sample_mode`
    pub fn duplicate_partial(&self, pos: Vi2d, size: Vi2d) -> Self {
        let w = size.x.max(0) as u32;
        let h = size.y.max(0) as u32;
        let mut out = Self::new(w, h);
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                out.set_pixel(x, y, self.get_pixel(pos.x + x, pos.y + y));
            }
        }
        out
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Mutable slice of one row, `None` when `y` is out of range
    #[inline]
    pub fn row_mut(&mut self, y: i32) -> Option<&mut [Pixel]> {
        if y < 0 || y as u32 >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        self.pixels.get_mut(start..start + w)
    }

    /// Raw RGBA bytes (ABGR8888 on little-endian) for texture upload
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Bytes per row
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * std::mem::size_of::<Pixel>()
    }
}
