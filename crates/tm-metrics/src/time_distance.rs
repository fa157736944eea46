//! Time–distance trajectory accumulation for one route over a step window.

use rustc_hash::FxHashMap;

use tm_core::{EdgeId, Step, StepWindow, VehicleId};

/// Reserved "no sample" marker distinguishing unobserved slots from genuine
/// zero-distance samples.
pub const MISSING_SAMPLE: f64 = f64::NAN;

/// Is `sample` the missing-sample sentinel?  (NaN never compares equal, so
/// callers cannot test with `==`.)
#[inline]
pub fn is_missing(sample: f64) -> bool {
    sample.is_nan()
}

/// Distance-over-time samples for vehicles travelling a fixed route,
/// restricted to a half-open step window.
///
/// Each tracked vehicle owns a slot array of exactly `window.len()` samples,
/// pre-filled with [`MISSING_SAMPLE`] and lazily allocated on first sight.
/// A vehicle discovered mid-window keeps the sentinel in its earlier slots —
/// there is no retroactive backfill.  Re-updating a (vehicle, step) pair
/// overwrites the slot rather than accumulating.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeDistance {
    origin:      EdgeId,
    destination: EdgeId,
    window:      StepWindow,
    tracks:      FxHashMap<VehicleId, Vec<f64>>,
}

impl TimeDistance {
    /// Track vehicles whose full route starts at `origin` and ends at
    /// `destination`, within `window` (validated at construction by
    /// [`StepWindow::new`]).
    pub fn new(origin: impl Into<EdgeId>, destination: impl Into<EdgeId>, window: StepWindow) -> Self {
        Self {
            origin:      origin.into(),
            destination: destination.into(),
            window,
            tracks:      FxHashMap::default(),
        }
    }

    /// First edge of the tracked route.
    pub fn origin(&self) -> &EdgeId {
        &self.origin
    }

    /// Last edge of the tracked route.
    pub fn destination(&self) -> &EdgeId {
        &self.destination
    }

    /// The recording window.
    pub fn window(&self) -> StepWindow {
        self.window
    }

    /// Record `vehicle`'s odometer distance (metres) at `step`.
    ///
    /// # Precondition
    /// `step` must lie inside the window — the caller applies the window
    /// gate.  Out-of-window calls are debug-asserted and ignored in release.
    pub fn update(&mut self, vehicle: &VehicleId, distance_m: f64, step: Step) {
        let Some(slot) = self.window.offset_of(step) else {
            debug_assert!(false, "step {step} outside window {}", self.window);
            return;
        };
        let len = self.window.len();
        self.tracks
            .entry(vehicle.clone())
            .or_insert_with(|| vec![MISSING_SAMPLE; len])[slot] = distance_m;
    }

    /// The slot array for `vehicle`; always `window().len()` long.
    pub fn track(&self, vehicle: &str) -> Option<&[f64]> {
        self.tracks.get(vehicle).map(Vec::as_slice)
    }

    /// Vehicles tracked so far (arbitrary order).
    pub fn vehicles(&self) -> impl Iterator<Item = &VehicleId> {
        self.tracks.keys()
    }

    /// Number of vehicles tracked so far.
    pub fn tracked_count(&self) -> usize {
        self.tracks.len()
    }
}
