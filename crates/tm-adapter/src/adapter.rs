//! The `SimulationAdapter` trait — read-only queries against a running
//! microsimulation.

use rustc_hash::FxHashSet;

use tm_core::{EdgeId, LaneId, VehicleId};

use crate::error::AdapterResult;

/// Per-step read-only query contract of a traffic microsimulation.
///
/// All queries observe the state *after* the most recent step; the adapter
/// guarantees nothing about consistency across steps (that is exactly what
/// the accumulators exist to reconstruct).  Implementations over a live
/// backend should translate "entity not found" responses into the matching
/// [`AdapterError`](crate::AdapterError) variant rather than panicking.
///
/// Speeds and odometer distances are in the simulation's native units
/// (metres per second, metres).
pub trait SimulationAdapter {
    // ── Topology (stable for the lifetime of the run) ─────────────────────

    /// All edge identifiers, in the simulation's reporting order.
    fn edge_ids(&self) -> AdapterResult<Vec<EdgeId>>;

    /// All lane identifiers, in the simulation's reporting order.
    fn lane_ids(&self) -> AdapterResult<Vec<LaneId>>;

    /// The edge a lane belongs to.
    fn lane_edge(&self, lane: &LaneId) -> AdapterResult<EdgeId>;

    /// Physical length of a lane in metres.
    fn lane_length(&self, lane: &LaneId) -> AdapterResult<f64>;

    // ── Per-edge state ────────────────────────────────────────────────────

    /// Summed waiting time (seconds) of the vehicles currently on `edge`.
    fn edge_waiting_time(&self, edge: &EdgeId) -> AdapterResult<f64>;

    /// Number of vehicles currently on `edge`.
    fn edge_vehicle_count(&self, edge: &EdgeId) -> AdapterResult<usize>;

    /// Identifiers of the vehicles currently on `edge`.
    fn edge_vehicle_ids(&self, edge: &EdgeId) -> AdapterResult<FxHashSet<VehicleId>>;

    // ── Per-vehicle state ─────────────────────────────────────────────────

    /// Instantaneous speed of a vehicle in m/s.
    fn vehicle_speed(&self, vehicle: &VehicleId) -> AdapterResult<f64>;

    /// The vehicle's full route as an ordered edge sequence.
    fn vehicle_route(&self, vehicle: &VehicleId) -> AdapterResult<Vec<EdgeId>>;

    /// Distance driven since the vehicle entered the network, in metres.
    fn vehicle_distance(&self, vehicle: &VehicleId) -> AdapterResult<f64>;

    /// All vehicles currently in the simulation (including teleporting ones).
    fn vehicle_ids(&self) -> AdapterResult<FxHashSet<VehicleId>>;

    /// Vehicles currently in a teleported/faulted state.
    fn teleporting_vehicle_ids(&self) -> AdapterResult<FxHashSet<VehicleId>>;
}
