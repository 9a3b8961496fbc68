//! Frame clock and per-frame context
//!
//! The frame loop owns a [`Clock`] and ticks it exactly once per frame. The
//! resulting [`FrameContext`] is handed to the scene and, through it, to
//! every object behavior. Nothing reads time or input from anywhere else.
//!
//! `std::time::Instant` is unavailable in the browser, so on wasm32 only
//! [`Clock::tick_at`] exists and the page supplies its own timestamp.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use crate::consts::MAX_FRAME_DELTA_MS;

/// Input snapshot for one frame, polled by the host
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Controls {
    /// Horizontal intent: -1 left, 0 none, 1 right
    pub horizontal: f32,
    /// Jump held
    pub jump: bool,
}

/// Per-frame values shared by everything that runs in that frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameContext {
    /// Milliseconds since the previous frame
    pub dt: f32,
    /// Frame counter, starting at 1 for the first ticked frame
    pub frame: u64,
    pub controls: Controls,
}

impl FrameContext {
    /// Context with a fixed delta, for tests and replays of a single step
    pub fn with_dt(dt: f32) -> Self {
        Self {
            dt,
            ..Default::default()
        }
    }

    pub fn with_controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }
}

/// Measures elapsed time between frames
#[derive(Debug, Clone)]
pub struct Clock {
    last_ms: Option<f64>,
    #[cfg(not(target_arch = "wasm32"))]
    origin: Instant,
    max_delta_ms: f32,
    frame: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA_MS)
    }
}

impl Clock {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            last_ms: None,
            #[cfg(not(target_arch = "wasm32"))]
            origin: Instant::now(),
            max_delta_ms,
            frame: 0,
        }
    }

    /// Tick with a caller-supplied timestamp in milliseconds
    ///
    /// The first tick reports a zero delta. Deltas are clamped to
    /// `[0, max_delta_ms]`, so a stalled or rewound timer never produces a
    /// huge or negative integration step.
    pub fn tick_at(&mut self, now_ms: f64) -> FrameContext {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.frame += 1;
        FrameContext {
            dt,
            frame: self.frame,
            controls: Controls::default(),
        }
    }

    /// Tick with the monotonic system clock
    #[cfg(not(target_arch = "wasm32"))]
    pub fn tick(&mut self) -> FrameContext {
        let now_ms = self.origin.elapsed().as_secs_f64() * 1000.0;
        self.tick_at(now_ms)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
