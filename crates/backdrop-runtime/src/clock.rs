//! Frame clock driven by host timestamps

/// Longest frame delta accepted before clamping (backgrounded tabs resume with huge gaps)
const MAX_DELTA_MS: f64 = 250.0;

/// Tracks frame time from host-supplied timestamps (milliseconds, monotonic)
pub struct FrameClock {
    /// Total elapsed time in milliseconds, excluding clamped gaps
    pub total_ms: f64,
    /// Time since last tick in milliseconds
    pub delta_ms: f64,
    /// Ticks observed so far
    pub frame_count: u64,
    /// Last tick timestamp
    last_ms: f64,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_ms: 0.0,
            delta_ms: 0.0,
            frame_count: 0,
            last_ms: 0.0,
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to `now_ms`. Call once per host frame.
    pub fn tick(&mut self, now_ms: f64) {
        self.frame_count += 1;

        if self.first_tick {
            self.first_tick = false;
            self.last_ms = now_ms;
            self.delta_ms = 0.0;
            return;
        }

        let elapsed = (now_ms - self.last_ms).max(0.0);
        self.last_ms = now_ms;

        self.delta_ms = elapsed.min(MAX_DELTA_MS);
        self.total_ms += self.delta_ms;
    }

    /// Timestamp of the most recent tick
    pub fn now_ms(&self) -> f64 {
        self.last_ms
    }
}

/// Counts frames over a sampling window and reports frames-per-second when it closes
pub struct FpsCounter {
    window_ms: f64,
    window_start: Option<f64>,
    frames: u32,
    last_fps: Option<f64>,
}

impl FpsCounter {
    /// Counter reporting once per `window_ms` (nominally one second)
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            window_start: None,
            frames: 0,
            last_fps: None,
        }
    }

    /// Record one frame at `now_ms`. Returns the measured FPS when a window closes.
    ///
    /// The first call only opens the window; frames are counted from the second call on.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        let Some(start) = self.window_start else {
            self.window_start = Some(now_ms);
            return None;
        };

        self.frames += 1;
        let elapsed = now_ms - start;
        if elapsed < self.window_ms {
            return None;
        }

        let fps = self.frames as f64 * 1000.0 / elapsed;
        self.frames = 0;
        self.window_start = Some(now_ms);
        self.last_fps = Some(fps);
        Some(fps)
    }

    /// Drop the open window, e.g. after the loop was paused
    pub fn reset(&mut self) {
        self.window_start = None;
        self.frames = 0;
    }

    /// FPS measured by the most recently closed window
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }
}
