//! Throughput accumulation: vehicles that left an edge between steps.

use rustc_hash::{FxHashMap, FxHashSet};

use tm_core::{EdgeId, VehicleId};

/// Per-edge departed-vehicle counts, one entry per observed step.
///
/// The departed count at a step is the cardinality of
/// `previous occupants − current occupants`.  A vehicle that enters and
/// leaves an edge within a single step is invisible to this signal; that is
/// inherent to observing occupancy once per step, not a bug to compensate
/// for.  The occupant set is fully replaced each step, never merged.
///
/// Edges initialise lazily: the first observation of an edge has no prior
/// baseline, so its departed count is defined as 0 whatever the vehicle set.
#[derive(Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Throughput {
    edge_filter: Option<Vec<EdgeId>>,
    occupants:   FxHashMap<EdgeId, FxHashSet<VehicleId>>,
    departed:    FxHashMap<EdgeId, Vec<usize>>,
}

impl Throughput {
    /// Track the collector's default edge set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track only the given edges instead of the collector's default set.
    pub fn with_edges(edges: Vec<EdgeId>) -> Self {
        Self {
            edge_filter: Some(edges),
            ..Self::default()
        }
    }

    /// The explicit edge subset, if one was configured.
    pub fn edge_filter(&self) -> Option<&[EdgeId]> {
        self.edge_filter.as_deref()
    }

    /// Record one step's occupancy observation for `edge`.
    ///
    /// Safe to call for edges never seen before, and for several different
    /// edges within the same step; at most one call per (edge, step).
    pub fn update(&mut self, edge: &EdgeId, now: FxHashSet<VehicleId>) {
        let count = match self.occupants.get_mut(edge) {
            Some(prev) => {
                let departed = prev.difference(&now).count();
                *prev = now;
                departed
            }
            None => {
                self.occupants.insert(edge.clone(), now);
                0
            }
        };
        self.departed.entry(edge.clone()).or_default().push(count);
    }

    /// Departed counts for `edge` in observation order.
    pub fn departed(&self, edge: &str) -> Option<&[usize]> {
        self.departed.get(edge).map(Vec::as_slice)
    }

    /// The vehicles occupying `edge` as of its last observation.
    pub fn occupants(&self, edge: &str) -> Option<&FxHashSet<VehicleId>> {
        self.occupants.get(edge)
    }

    /// Edges observed so far (arbitrary order).
    pub fn edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.departed.keys()
    }
}
