use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Wall-clock bookkeeping for the render loop.
///
/// `begin_frame` measures the time since the previous frame started and feeds
/// a rolling average used for the smoothed FPS figure. `remaining` tells the
/// loop how long to sleep to hold a target frame interval.
pub struct TimeState {
    pub frame_count: u64,
    pub real_dt: f64,
    pub total_time: f64,
    frame_start: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    fps_sample_fill: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            real_dt: 0.0,
            total_time: 0.0,
            frame_start: Instant::now(),
            fps_samples: [0.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            fps_sample_fill: 0,
            smoothed_fps: 0.0,
            smoothed_frame_time_ms: 0.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        if self.frame_count > 0 {
            self.real_dt = now.duration_since(self.frame_start).as_secs_f64();
            self.total_time += self.real_dt;

            self.fps_samples[self.fps_sample_index] = self.real_dt;
            self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
            self.fps_sample_fill = (self.fps_sample_fill + 1).min(FPS_SAMPLE_COUNT);
            let avg_dt: f64 = self.fps_samples[..self.fps_sample_fill].iter().sum::<f64>()
                / self.fps_sample_fill as f64;
            self.smoothed_frame_time_ms = avg_dt * 1000.0;
            self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        }
        self.frame_start = now;
        self.frame_count += 1;
    }

    /// Time left in the current frame's budget, or zero when already over.
    pub fn remaining(&self, frame_interval: Duration) -> Duration {
        frame_interval.saturating_sub(self.frame_start.elapsed())
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
