//! `ScriptedAdapter` — an in-memory simulation built from a fixed topology
//! and an ordered script of per-step frames.
//!
//! Used by the collector's tests and by demo binaries in place of a live
//! backend.  The adapter starts *before* the first frame; each call to
//! [`ScriptedAdapter::step`] advances the cursor to the next frame and then
//! dispatches the registered listeners, mirroring how a real driver advances
//! the simulation and is called back with the post-step state.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use tm_core::{EdgeId, LaneId, Step, VehicleId};

use crate::adapter::SimulationAdapter;
use crate::error::{AdapterError, AdapterResult};
use crate::listener::{ListenerHandle, ListenerRegistry, StepListener, StepNotifier};

// ── Frame ─────────────────────────────────────────────────────────────────────

/// Observable state of one simulation step.
///
/// Built with chained calls; unset quantities default to empty/zero, which
/// matches a step where the relevant entity is simply absent.
#[derive(Default, Clone)]
pub struct Frame {
    edge_vehicles: FxHashMap<EdgeId, Vec<VehicleId>>,
    waiting:       FxHashMap<EdgeId, f64>,
    speeds:        FxHashMap<VehicleId, f64>,
    odometer:      FxHashMap<VehicleId, f64>,
    active:        FxHashSet<VehicleId>,
    teleporting:   FxHashSet<VehicleId>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `vehicle` on `edge` with the given instantaneous speed (m/s) and
    /// odometer reading (metres driven since entering the network).
    pub fn place(
        mut self,
        edge:       impl Into<EdgeId>,
        vehicle:    impl Into<VehicleId>,
        speed_mps:  f64,
        odometer_m: f64,
    ) -> Self {
        let vehicle = vehicle.into();
        self.edge_vehicles
            .entry(edge.into())
            .or_default()
            .push(vehicle.clone());
        self.speeds.insert(vehicle.clone(), speed_mps);
        self.odometer.insert(vehicle.clone(), odometer_m);
        self.active.insert(vehicle);
        self
    }

    /// Set the summed waiting time (seconds) reported for `edge` this step.
    pub fn waiting(mut self, edge: impl Into<EdgeId>, total_secs: f64) -> Self {
        self.waiting.insert(edge.into(), total_secs);
        self
    }

    /// Mark `vehicle` as teleporting this step.  The vehicle remains listed
    /// by `vehicle_ids` — separating the two sets is the consumer's job.
    pub fn teleport(mut self, vehicle: impl Into<VehicleId>) -> Self {
        let vehicle = vehicle.into();
        self.active.insert(vehicle.clone());
        self.teleporting.insert(vehicle);
        self
    }
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Builder for [`ScriptedAdapter`].
#[derive(Default)]
pub struct ScriptedAdapterBuilder {
    edges:  Vec<EdgeId>,
    lanes:  Vec<(LaneId, EdgeId, f64)>,
    routes: FxHashMap<VehicleId, Vec<EdgeId>>,
    frames: Vec<Frame>,
}

impl ScriptedAdapterBuilder {
    /// Append an edge to the topology, in reporting order.
    pub fn edge(mut self, id: impl Into<EdgeId>) -> Self {
        self.edges.push(id.into());
        self
    }

    /// Append a lane with its parent edge and length (metres).
    pub fn lane(mut self, id: impl Into<LaneId>, edge: impl Into<EdgeId>, length_m: f64) -> Self {
        self.lanes.push((id.into(), edge.into(), length_m));
        self
    }

    /// Declare a vehicle's full route.
    pub fn route<I, E>(mut self, vehicle: impl Into<VehicleId>, edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeId>,
    {
        self.routes
            .insert(vehicle.into(), edges.into_iter().map(Into::into).collect());
        self
    }

    /// Append one scripted step.
    pub fn frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn build(self) -> ScriptedAdapter {
        let edge_set = self.edges.iter().cloned().collect();
        ScriptedAdapter {
            edges:    self.edges,
            edge_set,
            lanes:    self.lanes,
            routes:   self.routes,
            frames:   self.frames,
            cursor:   None,
            registry: RefCell::new(ListenerRegistry::new()),
        }
    }
}

// ── ScriptedAdapter ──────────────────────────────────────────────────────────

/// A [`SimulationAdapter`] + [`StepNotifier`] replaying a pre-built script.
pub struct ScriptedAdapter {
    edges:    Vec<EdgeId>,
    edge_set: FxHashSet<EdgeId>,
    lanes:    Vec<(LaneId, EdgeId, f64)>,
    routes:   FxHashMap<VehicleId, Vec<EdgeId>>,
    frames:   Vec<Frame>,
    /// Index of the current frame; `None` before the first step.
    cursor:   Option<usize>,
    registry: RefCell<ListenerRegistry>,
}

impl ScriptedAdapter {
    pub fn builder() -> ScriptedAdapterBuilder {
        ScriptedAdapterBuilder::default()
    }

    /// The step most recently dispatched, if any.
    pub fn current_step(&self) -> Option<Step> {
        self.cursor.map(|i| Step(i as u64))
    }

    /// Number of listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Advance to the next scripted frame and notify listeners.
    ///
    /// Returns `Ok(false)` once the script is exhausted — run length is the
    /// driver's decision, so running out of frames is not an error.  A
    /// listener error aborts the step and propagates.
    pub fn step(&mut self) -> AdapterResult<bool> {
        let next = match self.cursor {
            None    => 0,
            Some(i) => i + 1,
        };
        if next >= self.frames.len() {
            return Ok(false);
        }
        self.cursor = Some(next);

        let this: &Self = self;
        ListenerRegistry::dispatch(&this.registry, this, Step(next as u64))?;
        Ok(true)
    }

    /// Drive the script to exhaustion; returns the number of steps taken.
    pub fn run_to_end(&mut self) -> AdapterResult<u64> {
        let mut steps = 0;
        while self.step()? {
            steps += 1;
        }
        Ok(steps)
    }

    fn frame(&self) -> Option<&Frame> {
        self.cursor.map(|i| &self.frames[i])
    }

    fn require_edge(&self, edge: &EdgeId) -> AdapterResult<()> {
        if self.edge_set.contains(edge) {
            Ok(())
        } else {
            Err(AdapterError::UnknownEdge(edge.clone()))
        }
    }
}

impl SimulationAdapter for ScriptedAdapter {
    fn edge_ids(&self) -> AdapterResult<Vec<EdgeId>> {
        Ok(self.edges.clone())
    }

    fn lane_ids(&self) -> AdapterResult<Vec<LaneId>> {
        Ok(self.lanes.iter().map(|(id, _, _)| id.clone()).collect())
    }

    fn lane_edge(&self, lane: &LaneId) -> AdapterResult<EdgeId> {
        self.lanes
            .iter()
            .find(|(id, _, _)| id == lane)
            .map(|(_, edge, _)| edge.clone())
            .ok_or_else(|| AdapterError::UnknownLane(lane.clone()))
    }

    fn lane_length(&self, lane: &LaneId) -> AdapterResult<f64> {
        self.lanes
            .iter()
            .find(|(id, _, _)| id == lane)
            .map(|(_, _, len)| *len)
            .ok_or_else(|| AdapterError::UnknownLane(lane.clone()))
    }

    fn edge_waiting_time(&self, edge: &EdgeId) -> AdapterResult<f64> {
        self.require_edge(edge)?;
        Ok(self
            .frame()
            .and_then(|f| f.waiting.get(edge))
            .copied()
            .unwrap_or(0.0))
    }

    fn edge_vehicle_count(&self, edge: &EdgeId) -> AdapterResult<usize> {
        self.require_edge(edge)?;
        Ok(self
            .frame()
            .and_then(|f| f.edge_vehicles.get(edge))
            .map_or(0, Vec::len))
    }

    fn edge_vehicle_ids(&self, edge: &EdgeId) -> AdapterResult<FxHashSet<VehicleId>> {
        self.require_edge(edge)?;
        Ok(self
            .frame()
            .and_then(|f| f.edge_vehicles.get(edge))
            .map(|v| v.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn vehicle_speed(&self, vehicle: &VehicleId) -> AdapterResult<f64> {
        self.frame()
            .and_then(|f| f.speeds.get(vehicle))
            .copied()
            .ok_or_else(|| AdapterError::UnknownVehicle(vehicle.clone()))
    }

    fn vehicle_route(&self, vehicle: &VehicleId) -> AdapterResult<Vec<EdgeId>> {
        self.routes
            .get(vehicle)
            .cloned()
            .ok_or_else(|| AdapterError::UnknownVehicle(vehicle.clone()))
    }

    fn vehicle_distance(&self, vehicle: &VehicleId) -> AdapterResult<f64> {
        self.frame()
            .and_then(|f| f.odometer.get(vehicle))
            .copied()
            .ok_or_else(|| AdapterError::UnknownVehicle(vehicle.clone()))
    }

    fn vehicle_ids(&self) -> AdapterResult<FxHashSet<VehicleId>> {
        Ok(self.frame().map(|f| f.active.clone()).unwrap_or_default())
    }

    fn teleporting_vehicle_ids(&self) -> AdapterResult<FxHashSet<VehicleId>> {
        Ok(self
            .frame()
            .map(|f| f.teleporting.clone())
            .unwrap_or_default())
    }
}

impl StepNotifier for ScriptedAdapter {
    fn register(&self, listener: Rc<RefCell<dyn StepListener>>) -> ListenerHandle {
        self.registry.borrow_mut().register(listener)
    }

    fn unregister(&self, handle: ListenerHandle) -> bool {
        self.registry.borrow_mut().unregister(handle)
    }
}
