//! Frame timing

use std::collections::VecDeque;
use std::time::Instant;

/// One frame's timing as seen by the loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame
    pub dt: f32,
    /// `1 / dt`
    pub fps: f32,
    /// Rolling average over the sample window
    pub avg_fps: f32,
}

/// FPS counter with rolling average
#[derive(Debug)]
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    pub fn new(sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count,
        }
    }

    /// Restart the clock without recording a frame
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Call once per frame; measures the time since the previous call
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt)
    }

    /// Add an externally measured frame duration
    pub fn record(&mut self, dt: f32) -> FrameTime {
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        FrameTime {
            dt,
            fps: if dt > 0.0 { 1.0 / dt } else { 0.0 },
            avg_fps: self.avg_fps(),
        }
    }

    fn avg_dt(&self) -> f32 {
        self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32
    }

    pub fn avg_fps(&self) -> f32 {
        let avg_dt = self.avg_dt();
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window() {
        let mut fps = FpsCounter::new(2);
        fps.record(0.5);
        fps.record(0.25);
        let t = fps.record(0.25);
        assert_eq!(fps.frame_count(), 2);
        assert_eq!(t.fps, 4.0);
        assert_eq!(t.avg_fps, 4.0);
    }

    #[test]
    fn test_zero_dt_does_not_divide() {
        let mut fps = FpsCounter::new(4);
        let t = fps.record(0.0);
        assert_eq!(t.fps, 0.0);
        assert_eq!(t.avg_fps, 0.0);
    }
}
