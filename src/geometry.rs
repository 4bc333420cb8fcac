//! 2D vector types shared by the rasterizer, input and world view
//!
//! `Vi2d` addresses pixels, `Vf2d` carries world coordinates and scales.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Generic 2D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct V2d<T> {
    pub x: T,
    pub y: T,
}

/// Integer vector (pixel positions, sizes)
pub type Vi2d = V2d<i32>;
/// Float vector (world positions, scales)
pub type Vf2d = V2d<f32>;

impl<T> V2d<T> {
    #[inline]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Copy + PartialOrd> V2d<T> {
    /// Component-wise minimum
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(
            if other.x < self.x { other.x } else { self.x },
            if other.y < self.y { other.y } else { self.y },
        )
    }

    /// Component-wise maximum
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(
            if other.x > self.x { other.x } else { self.x },
            if other.y > self.y { other.y } else { self.y },
        )
    }

    /// Component-wise clamp into `[lo, hi]`
    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }
}

impl<T: Copy + Mul<Output = T> + Add<Output = T> + Sub<Output = T>> V2d<T> {
    #[inline]
    pub fn dot(self, rhs: Self) -> T {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Z component of the 3D cross product
    #[inline]
    pub fn cross(self, rhs: Self) -> T {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Squared length (avoids sqrt)
    #[inline]
    pub fn mag2(self) -> T {
        self.dot(self)
    }
}

impl<T: Copy + Neg<Output = T>> V2d<T> {
    /// Perpendicular vector (rotated 90 degrees)
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }
}

impl Vi2d {
    #[inline]
    pub fn as_f32(self) -> Vf2d {
        Vf2d::new(self.x as f32, self.y as f32)
    }

    #[inline]
    pub fn mag(self) -> f32 {
        self.as_f32().mag()
    }
}

impl Vf2d {
    #[inline]
    pub fn mag(self) -> f32 {
        self.mag2().sqrt()
    }

    /// Unit vector in the same direction; zero-length vectors normalize to zero
    #[inline]
    pub fn norm(self) -> Self {
        let len = self.mag();
        if len > 0.0001 {
            self / len
        } else {
            Self::new(0.0, 0.0)
        }
    }

    #[inline]
    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    #[inline]
    pub fn ceil(self) -> Self {
        Self::new(self.x.ceil(), self.y.ceil())
    }

    /// Round half up, matching pixel-center snapping
    #[inline]
    pub fn round(self) -> Self {
        Self::new((self.x + 0.5).floor(), (self.y + 0.5).floor())
    }

    /// Truncating cast
    #[inline]
    pub fn as_i32(self) -> Vi2d {
        Vi2d::new(self.x as i32, self.y as i32)
    }

    /// Nearest pixel
    #[inline]
    pub fn to_pixel(self) -> Vi2d {
        self.round().as_i32()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ============================================================================
// Operators
// ============================================================================

impl<T: Add<Output = T>> Add for V2d<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for V2d<T> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise product
impl<T: Mul<Output = T>> Mul for V2d<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

/// Component-wise quotient
impl<T: Div<Output = T>> Div for V2d<T> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl<T: Copy + Mul<Output = T>> Mul<T> for V2d<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl<T: Copy + Div<Output = T>> Div<T> for V2d<T> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: T) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl<T: Neg<Output = T>> Neg for V2d<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<T: AddAssign> AddAssign for V2d<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<T: SubAssign> SubAssign for V2d<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl<T: MulAssign> MulAssign for V2d<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        self.x *= rhs.x;
        self.y *= rhs.y;
    }
}

impl<T: Copy + MulAssign> MulAssign<T> for V2d<T> {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl<T: Copy + DivAssign> DivAssign<T> for V2d<T> {
    #[inline]
    fn div_assign(&mut self, rhs: T) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

impl<T> From<(T, T)> for V2d<T> {
    #[inline]
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}
