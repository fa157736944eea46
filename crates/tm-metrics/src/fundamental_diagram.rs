//! Fundamental-diagram accumulation for a single edge.

use rustc_hash::FxHashSet;

use tm_core::{mps_to_kmh, EdgeId, VehicleId};

/// Speed, flow, and vehicle-count series for one edge, indexed by step.
///
/// The three series always have equal length; `update` appends to all of
/// them and the caller guarantees at most one call per step.  Flow uses the
/// same departed-set-difference rule as [`Throughput`](crate::Throughput),
/// scoped to this edge.  Speeds are stored in km/h — the native m/s value is
/// converted here, at accumulation time, so the series never mixes units.
///
/// The edge length (needed by consumers to derive density) is resolved by
/// the owning collector at attach time; an accumulator driven manually keeps
/// the 0.0 default and leaves any resulting undefined density to the
/// presentation layer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FundamentalDiagram {
    edge:           EdgeId,
    edge_length_m:  f64,
    occupants:      FxHashSet<VehicleId>,
    speeds_kmh:     Vec<f64>,
    flows:          Vec<usize>,
    vehicle_counts: Vec<usize>,
}

impl FundamentalDiagram {
    /// Observe `edge`.  Length starts at 0.0 until resolved.
    pub fn new(edge: impl Into<EdgeId>) -> Self {
        Self {
            edge:           edge.into(),
            edge_length_m:  0.0,
            occupants:      FxHashSet::default(),
            speeds_kmh:     Vec::new(),
            flows:          Vec::new(),
            vehicle_counts: Vec::new(),
        }
    }

    /// The observed edge.
    pub fn edge_id(&self) -> &EdgeId {
        &self.edge
    }

    /// Physical edge length in metres; 0.0 while unresolved.
    pub fn edge_length(&self) -> f64 {
        self.edge_length_m
    }

    /// Set the resolved edge length (metres).
    pub fn set_edge_length(&mut self, metres: f64) {
        self.edge_length_m = metres;
    }

    /// Record one step: mean occupant speed (m/s, 0 when the edge is empty)
    /// and the current occupant set.
    pub fn update(&mut self, mean_speed_mps: f64, now: FxHashSet<VehicleId>) {
        self.speeds_kmh.push(mps_to_kmh(mean_speed_mps));
        self.vehicle_counts.push(now.len());
        let departed = self.occupants.difference(&now).count();
        self.occupants = now;
        self.flows.push(departed);
        debug_assert!(
            self.speeds_kmh.len() == self.flows.len()
                && self.flows.len() == self.vehicle_counts.len()
        );
    }

    /// Mean occupant speeds in km/h, one per step.
    pub fn speeds(&self) -> &[f64] {
        &self.speeds_kmh
    }

    /// Departed-vehicle counts, one per step.
    pub fn flows(&self) -> &[usize] {
        &self.flows
    }

    /// Occupant counts, one per step.
    pub fn vehicle_counts(&self) -> &[usize] {
        &self.vehicle_counts
    }

    /// Number of steps recorded.
    pub fn len(&self) -> usize {
        self.speeds_kmh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds_kmh.is_empty()
    }
}
