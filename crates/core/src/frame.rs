//! Per-frame inputs and the two clocks that drive effects.
//!
//! Particle fields run off the display refresh and integrate with a delta
//! normalized to a 60 Hz baseline ([`FrameClock`]). The cloud field ignores
//! refresh rate entirely and advances on a fixed interval ([`IntervalTimer`]).

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Duration of one frame at the 60 Hz baseline, in milliseconds.
pub const BASELINE_FRAME_MS: f64 = 16.67;

/// Largest delta a single frame may integrate, so a stalled tab does not
/// teleport every particle on resume.
pub const MAX_FRAME_DELTA: f64 = 2.0;

/// Size of the area an effect draws into, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Input snapshot handed to [`Engine::step`](crate::Engine::step).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Elapsed time in baseline frames (1.0 = one 60 Hz frame).
    pub delta: f64,
    pub bounds: Bounds,
    /// Pointer position in effect-local coordinates, `None` when the pointer
    /// is outside the page.
    pub pointer: Option<DVec2>,
}

impl FrameInput {
    /// One baseline frame with no pointer.
    pub fn idle(bounds: Bounds) -> Self {
        Self {
            delta: 1.0,
            bounds,
            pointer: None,
        }
    }

    pub fn with_pointer(mut self, pointer: DVec2) -> Self {
        self.pointer = Some(pointer);
        self
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }
}

/// Converts display-refresh timestamps into normalized frame deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: f64,
}

impl FrameClock {
    pub fn new(start_ms: f64) -> Self {
        Self { last_ms: start_ms }
    }

    /// Returns the delta since the previous call, in baseline frames,
    /// clamped to `[0, MAX_FRAME_DELTA]`.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = ((now_ms - self.last_ms) / BASELINE_FRAME_MS).clamp(0.0, MAX_FRAME_DELTA);
        self.last_ms = now_ms;
        delta
    }
}

/// Fixed-interval gate: fires at most once per `interval_ms`.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval_ms: f64,
    last_fire_ms: f64,
}

impl IntervalTimer {
    pub fn new(interval_ms: f64, start_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: start_ms,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Returns `true` when at least one interval elapsed since the last fire.
    /// Fires stay on the interval grid, so a 60 Hz caller still averages one
    /// fire per interval. After a stall the grid restarts at `now_ms`; missed
    /// intervals are not replayed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_fire_ms < self.interval_ms {
            return false;
        }
        self.last_fire_ms += self.interval_ms;
        if now_ms - self.last_fire_ms >= self.interval_ms {
            self.last_fire_ms = now_ms;
        }
        true
    }
}
