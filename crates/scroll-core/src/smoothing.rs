//! Frame pacing helpers.
//!
//! None of these carry state that correctness depends on: the follower only
//! softens an already-correct target, the gate and debouncer only skip
//! redundant recomputation.

use instant::Instant;
use std::time::Duration;

/// Exponential follower for cosmetic smoothing of a rendered value.
#[derive(Clone, Copy, Debug)]
pub struct Follower {
    value: f32,
    target: f32,
    tau_sec: f32,
    initialized: bool,
}

impl Follower {
    pub fn new(tau_sec: f32) -> Self {
        Self {
            value: 0.0,
            target: 0.0,
            tau_sec,
            initialized: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
        if !self.initialized {
            self.snap(target);
        }
    }

    /// Jump straight to `v` with no catch-up frames.
    pub fn snap(&mut self, v: f32) {
        self.value = v;
        self.target = v;
        self.initialized = true;
    }

    pub fn step(&mut self, dt_sec: f32) -> f32 {
        if self.tau_sec <= 0.0 || !dt_sec.is_finite() {
            self.value = self.target;
            return self.value;
        }
        let alpha = 1.0 - (-dt_sec.max(0.0) / self.tau_sec).exp();
        self.value += (self.target - self.value) * alpha;
        if (self.target - self.value).abs() < 0.01 {
            self.value = self.target;
        }
        self.value
    }

    pub fn is_settled(&self) -> bool {
        self.value == self.target
    }
}

/// Coalesces any number of change notifications into one per frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameGate {
    dirty: bool,
}

impl FrameGate {
    pub fn mark(&mut self) {
        self.dirty = true;
    }

    /// True once per batch of marks.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Trailing-edge debounce: fires once `delay` has passed since the last poke.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    pub fn poke(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(t) if now >= t && now.duration_since(t) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}
