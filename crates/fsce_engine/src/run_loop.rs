//! Frame-by-frame driver.
//!
//! One frame is in flight at a time: a tick renders, and only after it
//! finishes does the next one start. The loop exits when a [`LoopHandle`]
//! asks it to stop, or when a frame fails under [`FrameErrorPolicy::Stop`].
//! Stop requests are picked up at the next tick boundary. A failed frame is
//! followed by at least [`FAILED_FRAME_BACKOFF`] before the next tick, so a
//! scene that fails every frame cannot spin the loop or flood the error sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fsce_core::{ErrorSink, FrameErrorPolicy, TimeState};
use fsce_render::Surface;

use crate::engine::Engine;

/// Minimum pause after a failed frame, whatever the frame interval.
pub const FAILED_FRAME_BACKOFF: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Cancelled,
    FrameError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub failed_frames: u64,
    pub exit: ExitReason,
}

/// Cloneable stop token for a [`RenderLoop`]. Safe to use from other threads.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stop: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.stop.store(false, Ordering::SeqCst);
    }
}

pub struct RenderLoop {
    state: LoopState,
    handle: LoopHandle,
    policy: FrameErrorPolicy,
    frame_interval: Option<Duration>,
    time: TimeState,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            handle: LoopHandle::default(),
            policy: FrameErrorPolicy::default(),
            frame_interval: None,
            time: TimeState::new(),
        }
    }

    pub fn with_policy(mut self, policy: FrameErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Minimum wall time per tick. `None` ticks back to back.
    pub fn with_frame_interval(mut self, frame_interval: Option<Duration>) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn time(&self) -> &TimeState {
        &self.time
    }

    /// Run until cancelled or until a frame fails under the `Stop` policy.
    ///
    /// Each tick applies `debug_mode`, renders, and on success advances the
    /// animation counter and calls `callback`. Failed frames have already been
    /// reported to the engine's sink. A stop requested before `run` is called
    /// ends the loop before its first frame.
    pub fn run<S, T, F>(
        &mut self,
        engine: &mut Engine<S>,
        surface: &mut T,
        debug_mode: bool,
        mut callback: F,
    ) -> LoopSummary
    where
        S: ErrorSink,
        T: Surface + ?Sized,
        F: FnMut(&mut Engine<S>),
    {
        self.state = LoopState::Running;
        log::info!(
            "Render loop started (debug {}, policy {:?})",
            if debug_mode { "on" } else { "off" },
            self.policy
        );

        let mut frames = 0u64;
        let mut failed_frames = 0u64;
        let exit = loop {
            if self.handle.is_stop_requested() {
                break ExitReason::Cancelled;
            }
            self.time.begin_frame();
            engine.set_debug_mode(debug_mode);

            let pacing = match engine.render_frame(surface) {
                Ok(_) => {
                    frames += 1;
                    engine.advance_animation();
                    callback(engine);
                    self.frame_interval
                }
                Err(err) => {
                    failed_frames += 1;
                    if self.policy == FrameErrorPolicy::Stop {
                        log::warn!("Render loop stopping after frame error: {err}");
                        break ExitReason::FrameError;
                    }
                    log::debug!("Frame {} failed, continuing: {err}", self.time.frame_count);
                    Some(
                        self.frame_interval
                            .map_or(FAILED_FRAME_BACKOFF, |i| i.max(FAILED_FRAME_BACKOFF)),
                    )
                }
            };

            if let Some(interval) = pacing {
                let rest = self.time.remaining(interval);
                if !rest.is_zero() {
                    thread::sleep(rest);
                }
            }
        };

        if exit == ExitReason::Cancelled {
            self.handle.reset();
        }
        self.state = LoopState::Stopped;
        log::info!(
            "Render loop stopped after {frames} frames ({failed_frames} failed, {:?})",
            exit
        );
        LoopSummary {
            frames,
            failed_frames,
            exit,
        }
    }
}
