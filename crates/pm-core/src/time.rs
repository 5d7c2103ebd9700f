//! Mission time model.
//!
//! # Design
//!
//! The host loop calls `tick(dt)` once per frame with a variable frame time.
//! Two counters are kept side by side:
//!
//!   - a monotonically increasing frame counter ([`Tick`]), used for
//!     periodic work such as state logging;
//!   - elapsed simulated seconds (`f64`), used for delays.
//!
//! Delays (start delay, post-landing camera handoff) are [`Deadline`]s
//! checked against the clock on every tick.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute frame counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` frames after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// `true` every `interval` frames (never when `interval == 0`).
    #[inline]
    pub fn every(self, interval: u64) -> bool {
        interval > 0 && self.0.is_multiple_of(interval)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Monotonic simulated clock advanced by the frame time passed to `tick`.
///
/// Negative or non-finite frame times are ignored so the clock never runs
/// backwards.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    /// Frames elapsed since the clock was created.
    pub frame: Tick,
    elapsed_secs: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `dt` seconds.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed_secs += dt as f64;
        }
        self.frame = self.frame.offset(1);
    }

    /// Simulated seconds since creation.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// A deadline `secs` seconds from now.
    #[inline]
    pub fn deadline_in(&self, secs: f32) -> Deadline {
        Deadline(self.elapsed_secs + secs.max(0.0) as f64)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.frame, self.elapsed_secs)
    }
}

// ── Deadline ──────────────────────────────────────────────────────────────────

/// A point on a [`SimClock`] timeline, in elapsed seconds.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Deadline(pub f64);

impl Deadline {
    /// `true` once `clock` has reached this deadline.
    #[inline]
    pub fn is_due(self, clock: &SimClock) -> bool {
        clock.elapsed_secs() >= self.0
    }
}
