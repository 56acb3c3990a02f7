//! Frame timing

use std::time::{Duration, Instant};

/// Supplies the `dt` for each frame
pub trait Clock {
    /// Wait for the next frame boundary (if pacing) and return the seconds
    /// elapsed since the previous call.
    fn tick(&mut self) -> f32;
}

/// Real-time pacer: sleeps to hold the target frame rate and reports the
/// measured frame time, which may exceed the target on slow frames.
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    last: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            last: Instant::now(),
        }
    }
}

impl Clock for FramePacer {
    fn tick(&mut self) -> f32 {
        let since = self.last.elapsed();
        if since < self.frame {
            std::thread::sleep(self.frame - since);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Constant step without sleeping; runs as fast as the CPU allows
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    pub dt: f32,
}

impl FixedStep {
    pub fn new(fps: u32) -> Self {
        Self {
            dt: 1.0 / fps.max(1) as f32,
        }
    }
}

impl Clock for FixedStep {
    fn tick(&mut self) -> f32 {
        self.dt
    }
}
