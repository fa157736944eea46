//! Simulation step counting.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Step` counter — one
//! discrete advancement of simulated time, the unit of every accumulator
//! sequence.  The counter starts at 0, is incremented exactly once per step
//! callback, and is never reset.  Mapping a step to wall-clock seconds is the
//! driving application's business (SUMO-style backends default to 1 s/step);
//! the framework only needs exact integer arithmetic.
//!
//! [`StepWindow`] is a half-open interval `[start, end)` of steps used to
//! scope time-windowed accumulators.  Windows are validated at construction
//! so an empty or inverted window is rejected before a run starts rather
//! than silently recording nothing.

use std::fmt;

use crate::error::{CoreError, CoreResult};

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
///
/// Stored as `u64`: at 1 step per simulated second a u64 outlasts any
/// conceivable run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` advances after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }

    /// Steps elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── StepWindow ───────────────────────────────────────────────────────────────

/// A half-open step interval `[start, end)`.
///
/// The window length is fixed at construction and `start < end` is enforced,
/// so `len()` is always at least 1.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepWindow {
    start: Step,
    end:   Step,
}

impl StepWindow {
    /// Build a window covering `[start, end)`.
    ///
    /// Returns [`CoreError::EmptyWindow`] when `start >= end`.
    pub fn new(start: Step, end: Step) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// First step inside the window.
    #[inline]
    pub fn start(&self) -> Step {
        self.start
    }

    /// First step past the window (exclusive bound).
    #[inline]
    pub fn end(&self) -> Step {
        self.end
    }

    /// Number of steps the window spans.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize
    }

    /// Is `step` inside `[start, end)`?
    #[inline]
    pub fn contains(&self, step: Step) -> bool {
        self.start <= step && step < self.end
    }

    /// Zero-based slot index of `step` within the window, or `None` when the
    /// step falls outside it.
    #[inline]
    pub fn offset_of(&self, step: Step) -> Option<usize> {
        self.contains(step).then(|| (step.0 - self.start.0) as usize)
    }
}

impl fmt::Display for StepWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
