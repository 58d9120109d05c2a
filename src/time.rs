//! Frame timing for the driver loop.
//!
//! One [`Time`] per frame loop: call [`update`](Time::update) once at the
//! top of each frame and feed the returned delta into the emitter.
//!
//! ```ignore
//! let mut time = Time::new();
//! loop {
//!     let dt = time.update();
//!     emitter.update(dt);
//! }
//! ```

use std::time::{Duration, Instant};

/// Frame clock: delta time, elapsed time, frame count and a smoothed FPS
/// readout, with pause and an optional fixed step for deterministic runs.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    delta_secs: f32,
    elapsed_secs: f32,
    frame_count: u64,
    paused: bool,
    pause_total: Duration,
    fixed_delta: Option<f32>,
    fps: f32,
    fps_window_start: Instant,
    fps_window_frames: u64,
}

/// How often the FPS readout refreshes.
const FPS_WINDOW: Duration = Duration::from_millis(500);

impl Time {
    /// Start the clock now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            elapsed_secs: 0.0,
            frame_count: 0,
            paused: false,
            pause_total: Duration::ZERO,
            fixed_delta: None,
            fps: 0.0,
            fps_window_start: now,
            fps_window_frames: 0,
        }
    }

    /// Advance one frame and return the delta time in seconds.
    ///
    /// Returns 0 while paused. With a fixed delta set, the wall-clock
    /// measurement is replaced but the FPS readout still tracks real
    /// frames.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return 0.0;
        }

        let measured = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(measured);
        self.last_frame = now;
        self.elapsed_secs = (now.duration_since(self.start) - self.pause_total).as_secs_f32();
        self.frame_count += 1;

        self.fps_window_frames += 1;
        let window = now.duration_since(self.fps_window_start);
        if window >= FPS_WINDOW {
            self.fps = self.fps_window_frames as f32 / window.as_secs_f32();
            self.fps_window_frames = 0;
            self.fps_window_start = now;
        }

        self.delta_secs
    }

    /// Delta of the last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Unpaused time since the clock started, seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Frames counted so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Smoothed frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the clock is paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause: `update` returns 0 and elapsed time stops accruing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after a pause; the paused span does not count as elapsed.
    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_total += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }

    /// Toggle between paused and running.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed delta instead of wall-clock measurement, or `None` to
    /// go back to real timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
