//! Average-waiting-time accumulation.

use rustc_hash::FxHashMap;

use tm_core::EdgeId;

/// Stores the average waiting time for each edge across the simulation.
///
/// One snapshot is appended per step while attached; there is no windowing,
/// so the series grows for the full run.  An edge with no vehicles carries
/// 0.0 — the collector resolves the undefined average before the snapshot
/// arrives here, deliberately conflating "no vehicles" with "vehicles
/// waiting zero seconds" to keep aggregates comparable with historical runs.
#[derive(Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaitingTime {
    snapshots: Vec<FxHashMap<EdgeId, f64>>,
}

impl WaitingTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one per-step snapshot of average waits keyed by edge.
    pub fn update(&mut self, average_waits: FxHashMap<EdgeId, f64>) {
        self.snapshots.push(average_waits);
    }

    /// All snapshots in step order.
    pub fn snapshots(&self) -> &[FxHashMap<EdgeId, f64>] {
        &self.snapshots
    }

    /// Number of steps recorded.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
