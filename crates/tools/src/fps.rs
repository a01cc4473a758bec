use std::time::{Duration, Instant};

/// Frames-per-second counter. Counts frames in a fixed window and publishes
/// the count when the window closes, so the value updates once per window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    /// One-second window starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now(), Duration::from_secs(1))
    }

    pub fn starting_at(start: Instant, window: Duration) -> Self {
        Self {
            window,
            window_start: start,
            frames: 0,
            fps: 0,
        }
    }

    /// Record a frame rendered at `now`. Returns the new value when a window
    /// closes.
    pub fn frame(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.saturating_duration_since(self.window_start) < self.window {
            return None;
        }
        self.fps = self.frames;
        self.frames = 0;
        self.window_start = now;
        tracing::trace!(fps = self.fps, "fps window closed");
        Some(self.fps)
    }

    /// Last published value; 0 until the first window closes.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
