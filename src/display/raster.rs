//! Integer rasterization algorithms
//!
//! Nothing here owns pixels: each primitive reports the points or inclusive
//! horizontal spans it covers through a callback, and `Canvas` routes them
//! through the blender onto the bound target. Every primitive takes a `Clip`
//! and only spends work on the part of its shape inside it.

/// Solid line pattern
pub const SOLID: u32 = 0xFFFF_FFFF;

/// Draw every octant
pub const ALL_OCTANTS: u8 = 0xFF;

/// Inclusive pixel window a primitive is clipped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Clip {
    /// The whole `i32` plane
    pub const UNBOUNDED: Self = Self {
        min_x: i32::MIN,
        min_y: i32::MIN,
        max_x: i32::MAX,
        max_y: i32::MAX,
    };

    /// `[0, width) x [0, height)`, or `None` when that is empty
    pub fn of_size(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            min_x: 0,
            min_y: 0,
            max_x: i32::try_from(width - 1).unwrap_or(i32::MAX),
            max_y: i32::try_from(height - 1).unwrap_or(i32::MAX),
        })
    }

    #[inline]
    fn contains(&self, x: i64, y: i64) -> bool {
        (self.min_x as i64..=self.max_x as i64).contains(&x)
            && (self.min_y as i64..=self.max_y as i64).contains(&y)
    }

    fn overlaps(&self, min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> bool {
        max_x >= self.min_x as i64
            && min_x <= self.max_x as i64
            && max_y >= self.min_y as i64
            && min_y <= self.max_y as i64
    }

    fn encloses(&self, min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> bool {
        self.contains(min_x, min_y) && self.contains(max_x, max_y)
    }
}

fn div_floor(a: i128, b: i128) -> i128 {
    a.div_euclid(b)
}

fn div_ceil(a: i128, b: i128) -> i128 {
    -(-a).div_euclid(b)
}

/// Largest `s` with `s * s <= n`
fn isqrt(n: i128) -> i128 {
    if n <= 0 {
        return 0;
    }
    let mut s = (n as f64).sqrt() as i128;
    while s * s > n {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= n {
        s += 1;
    }
    s
}

// ============================================================================
// Lines
// ============================================================================

/// Closed form of the Bresenham walk between two points
///
/// The walk starts at the lower end of the major axis and takes `major`
/// unit steps along it. After `k` steps the minor axis has moved
/// `offset(k)` towards the other end, so any stretch of the line can be
/// entered without walking the part before it.
#[derive(Debug, Clone, Copy)]
struct Steps {
    x: i64,
    y: i64,
    x_major: bool,
    major: i64,
    minor: i64,
    diag: i64,
}

impl Steps {
    fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
        let (dx, dy) = (x2 - x1, y2 - y1);
        let x_major = dx != 0 && dx.abs() >= dy.abs();
        let forward = if x_major { dx >= 0 } else { dy >= 0 };
        let (x, y) = if forward { (x1, y1) } else { (x2, y2) };
        let (major, minor) = if x_major {
            (dx.abs(), dy.abs())
        } else {
            (dy.abs(), dx.abs())
        };
        Self {
            x,
            y,
            x_major,
            major,
            minor,
            diag: if (dx < 0) == (dy < 0) { 1 } else { -1 },
        }
    }

    /// x-major walks round half steps up, y-major ones round them down
    #[inline]
    fn bias(&self) -> i128 {
        if self.x_major {
            0
        } else {
            1
        }
    }

    /// Minor-axis offset after `k` steps
    fn offset(&self, k: i64) -> i64 {
        if self.major == 0 {
            return 0;
        }
        let (major, minor) = (self.major as i128, self.minor as i128);
        div_floor(2 * k as i128 * minor + major - self.bias(), 2 * major) as i64
    }

    /// First step whose offset reaches `t`; `major + 1` when none does
    fn first_step(&self, t: i64) -> i64 {
        if t <= 0 {
            return 0;
        }
        if self.minor == 0 {
            return self.major + 1;
        }
        let (major, minor) = (self.major as i128, self.minor as i128);
        let k = div_ceil(2 * major * t as i128 - major + self.bias(), 2 * minor);
        k.clamp(0, major + 1) as i64
    }

    fn point(&self, k: i64) -> (i64, i64) {
        let m = self.diag * self.offset(k);
        if self.x_major {
            (self.x + k, self.y + m)
        } else {
            (self.x + m, self.y + k)
        }
    }

    /// Bresenham decision value carried into step `k + 1`
    fn error(&self, k: i64) -> i64 {
        let (major, minor) = (self.major as i128, self.minor as i128);
        (2 * (k as i128 + 1) * minor - major - 2 * major * self.offset(k) as i128) as i64
    }

    /// Range of steps whose point lies inside `clip`
    fn visible(&self, clip: &Clip) -> Option<(i64, i64)> {
        let (x0, x1) = (clip.min_x as i64, clip.max_x as i64);
        let (y0, y1) = (clip.min_y as i64, clip.max_y as i64);
        let ((lo, hi), (start, low, high)) = if self.x_major {
            ((x0 - self.x, x1 - self.x), (self.y, y0, y1))
        } else {
            ((y0 - self.y, y1 - self.y), (self.x, x0, x1))
        };
        let (t0, t1) = if self.diag > 0 {
            (low - start, high - start)
        } else {
            (start - high, start - low)
        };
        let first = lo.max(0).max(self.first_step(t0));
        let last = hi.min(self.major).min(self.first_step(t1 + 1) - 1);
        (first <= last).then_some((first, last))
    }

    /// Leftmost and rightmost x of the line on row `y`
    fn row(&self, y: i64) -> (i64, i64) {
        if self.x_major {
            let t = (y - self.y) * self.diag;
            let first = self.first_step(t).max(0);
            let last = (self.first_step(t + 1) - 1).min(self.major);
            (self.x + first, self.x + last.max(first))
        } else {
            let (x, _) = self.point(y - self.y);
            (x, x)
        }
    }
}

/// Bresenham line from `(x1, y1)` to `(x2, y2)`, both ends included
///
/// `pattern` is rotated left by one before each step and the step is plotted
/// when bit 0 of the rotated value is set. Steps outside `clip` still consume
/// their pattern bit, so dashes do not move when the line is clipped.
pub fn line(
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    pattern: u32,
    clip: Clip,
    mut plot: impl FnMut(i32, i32),
) {
    let steps = Steps::new(x1, y1, x2, y2);
    let Some((first, last)) = steps.visible(&clip) else {
        return;
    };

    let mut pattern = pattern.rotate_left(first.rem_euclid(32) as u32);
    let (mut x, mut y) = steps.point(first);
    let mut err = steps.error(first);
    let (major, minor) = (steps.major, steps.minor);

    for _ in first..=last {
        pattern = pattern.rotate_left(1);
        if pattern & 1 != 0 {
            plot(x as i32, y as i32);
        }
        if steps.x_major {
            x += 1;
            if err < 0 {
                err += 2 * minor;
            } else {
                y += steps.diag;
                err += 2 * (minor - major);
            }
        } else {
            y += 1;
            if err <= 0 {
                err += 2 * minor;
            } else {
                x += steps.diag;
                err += 2 * (minor - major);
            }
        }
    }
}

// ============================================================================
// Circles
// ============================================================================

/// y of the midpoint walk when it reaches column `x`, for `0 <= x < r`
fn octant_y(r: i64, x: i64) -> i64 {
    let (r, x) = (r as i128, x as i128);
    let t = 4 * r * r - 4 * x * x - 1;
    let mut s = isqrt(t);
    if s * s < t {
        s += 1;
    }
    (s / 2) as i64
}

/// Midpoint circle outline; bit `n` of `mask` enables octant `n`
///
/// Octants run clockwise from twelve o'clock. Every point is reported once.
/// Only the stretches of the walk that can land inside `clip` are visited.
pub fn circle(x: i32, y: i32, radius: i32, mask: u8, clip: Clip, mut plot: impl FnMut(i32, i32)) {
    if radius <= 0 || mask == 0 {
        return;
    }
    let (cx, cy, r) = (x as i64, y as i64, radius as i64);
    if !clip.overlaps(cx - r, cy - r, cx + r, cy + r) {
        return;
    }

    let mut emit = |bit: u8, px: i64, py: i64| {
        if mask & bit != 0 && clip.contains(px, py) {
            plot(px as i32, py as i32);
        }
    };

    // Every octant point moves with x0 along one axis
    let (x0, x1) = (clip.min_x as i64, clip.max_x as i64);
    let (y0, y1) = (clip.min_y as i64, clip.max_y as i64);
    let mut ranges = [
        (x0 - cx, x1 - cx),
        (cx - x1, cx - x0),
        (y0 - cy, y1 - cy),
        (cy - y1, cy - y0),
    ];
    ranges.sort_unstable();

    let mut next = 0i64;
    for (lo, hi) in ranges {
        let lo = lo.max(next);
        if lo > hi {
            continue;
        }
        if lo >= r {
            break;
        }

        let mut dx = lo;
        let mut dy = octant_y(r, lo);
        if dy < dx {
            break;
        }
        let (rr, a, b) = (r as i128, dx as i128, dy as i128);
        let mut d = (2 * (a + 1) * (a + 1) + b * b + (b - 1) * (b - 1) - 2 * rr * rr) as i64;

        while dy >= dx && dx <= hi {
            emit(0x01, cx + dx, cy - dy);
            emit(0x04, cx + dy, cy + dx);
            emit(0x10, cx - dx, cy + dy);
            emit(0x40, cx - dy, cy - dx);
            // Axis and diagonal points are shared between neighbouring octants
            if dx != 0 && dx != dy {
                emit(0x02, cx + dy, cy - dx);
                emit(0x08, cx + dx, cy + dy);
                emit(0x20, cx - dy, cy + dx);
                emit(0x80, cx - dx, cy - dy);
            }

            if d < 0 {
                d += 4 * dx + 6;
                dx += 1;
            } else {
                d += 4 * (dx - dy) + 10;
                dx += 1;
                dy -= 1;
            }
        }
        if dy < dx {
            break;
        }
        next = hi + 1;
    }
}

/// Filled disc `{dx² + dy² <= r²}` as spans `(x_left, x_right, y)`
///
/// Each row is reported exactly once. A disc inside `clip` is walked by
/// octant; one that crosses it is solved row by row over the visible rows.
pub fn fill_circle(x: i32, y: i32, radius: i32, clip: Clip, mut span: impl FnMut(i32, i32, i32)) {
    if radius <= 0 {
        return;
    }
    let (cx, cy, r) = (x as i64, y as i64, radius as i64);
    if !clip.overlaps(cx - r, cy - r, cx + r, cy + r) {
        return;
    }

    if !clip.encloses(cx - r, cy - r, cx + r, cy + r) {
        let r2 = r as i128 * r as i128;
        let first = (cy - r).max(clip.min_y as i64);
        let last = (cy + r).min(clip.max_y as i64);
        for row in first..=last {
            let dy = (row - cy) as i128;
            let half = isqrt(r2 - dy * dy) as i64;
            let lo = (cx - half).max(clip.min_x as i64);
            let hi = (cx + half).min(clip.max_x as i64);
            if lo <= hi {
                span(lo as i32, hi as i32, row as i32);
            }
        }
        return;
    }

    let mut rows = |half: i32, dy: i32| {
        span(x - half, x + half, y + dy);
        if dy != 0 {
            span(x - half, x + half, y - dy);
        }
    };

    // err tracks r² - x0² - y0²
    let mut x0 = 0i32;
    let mut y0 = radius;
    let mut err = 0i64;

    while x0 <= y0 {
        rows(y0, x0);
        x0 += 1;
        err -= 2 * x0 as i64 - 1;
        while err < 0 {
            if y0 >= x0 {
                rows(x0 - 1, y0);
            }
            err += 2 * y0 as i64 - 1;
            y0 -= 1;
        }
    }
}

// ============================================================================
// Triangles
// ============================================================================

/// Filled triangle as one span per row
///
/// Each edge contributes exactly the pixels `line` draws for it on that row,
/// so the fill covers the outline and degenerate triangles fill their
/// degenerate outline: a point, a line or a span. Only rows and columns
/// inside `clip` are visited.
pub fn fill_triangle(
    p1: (i32, i32),
    p2: (i32, i32),
    p3: (i32, i32),
    clip: Clip,
    mut span: impl FnMut(i32, i32, i32),
) {
    let mut v = [p1, p2, p3];
    v.sort_by_key(|p| p.1);
    let [a, b, c] = v;

    let min_x = a.0.min(b.0).min(c.0) as i64;
    let max_x = a.0.max(b.0).max(c.0) as i64;
    if !clip.overlaps(min_x, a.1 as i64, max_x, c.1 as i64) {
        return;
    }

    let long = Steps::new(a.0, a.1, c.0, c.1);
    let top = Steps::new(a.0, a.1, b.0, b.1);
    let bottom = Steps::new(b.0, b.1, c.0, c.1);
    let mid = b.1 as i64;

    let first = a.1.max(clip.min_y) as i64;
    let last = c.1.min(clip.max_y) as i64;
    for y in first..=last {
        let (mut lo, mut hi) = long.row(y);
        let mut merge = |(l, h): (i64, i64)| {
            lo = lo.min(l);
            hi = hi.max(h);
        };
        if y <= mid {
            merge(top.row(y));
        }
        if y >= mid {
            merge(bottom.row(y));
        }
        let lo = lo.max(clip.min_x as i64);
        let hi = hi.min(clip.max_x as i64);
        if lo <= hi {
            span(lo as i32, hi as i32, y as i32);
        }
    }
}
