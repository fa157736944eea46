//! The `StepCollector` — pulls per-step observations and fans them out to
//! the attached accumulators.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use tm_adapter::{
    AdapterResult, ListenerAction, ListenerHandle, SimulationAdapter, StepListener, StepNotifier,
};
use tm_core::{EdgeId, Step};
use tm_metrics::{FundamentalDiagram, Throughput, TimeDistance, WaitingTime};

use crate::error::{CollectError, CollectResult};

/// Orchestrates metric collection over a run.
///
/// Holds at most one accumulator per metric kind in an explicit slot;
/// attaching a new accumulator of a kind silently replaces the slot without
/// touching the previous accumulator's state (any other holder of its `Rc`
/// keeps a fully valid, frozen aggregate).  Detachment compares `Rc`
/// identity, so only the accumulator actually attached can be removed.
///
/// The tracked edge set is derived exactly once, at construction: the
/// simulation's edge list with every trailing synthetic boundary edge
/// (`…-sink` / `…-source`) popped.  It is immutable for the collector's
/// lifetime and is the default edge universe for accumulators that do not
/// bring their own subset.
pub struct StepCollector {
    edges:        Vec<EdgeId>,
    /// Steps processed since construction — the canonical time axis for
    /// every attached accumulator.
    step_count:   Step,
    stopped:      bool,
    registration: Option<ListenerHandle>,

    // One slot per metric kind; attach replaces, it does not accumulate.
    waiting_time:        Option<Rc<RefCell<WaitingTime>>>,
    throughput:          Option<Rc<RefCell<Throughput>>>,
    fundamental_diagram: Option<Rc<RefCell<FundamentalDiagram>>>,
    time_distance:       Option<Rc<RefCell<TimeDistance>>>,
}

impl StepCollector {
    // ── Construction & registration ───────────────────────────────────────

    /// Build a collector against `sim` without registering it.
    ///
    /// The caller becomes responsible for driving
    /// [`on_step`](StepListener::on_step); most users want
    /// [`register`](Self::register) instead.
    pub fn new(sim: &dyn SimulationAdapter) -> CollectResult<Self> {
        let mut edges = sim.edge_ids()?;
        while edges.last().is_some_and(EdgeId::is_boundary) {
            edges.pop();
        }
        Ok(Self {
            edges,
            step_count:          Step::ZERO,
            stopped:             false,
            registration:        None,
            waiting_time:        None,
            throughput:          None,
            fundamental_diagram: None,
            time_distance:       None,
        })
    }

    /// Build a collector and register it with the simulation's step
    /// notification mechanism.
    pub fn register<A>(sim: &A) -> CollectResult<Rc<RefCell<Self>>>
    where
        A: SimulationAdapter + StepNotifier,
    {
        let collector = Rc::new(RefCell::new(Self::new(sim)?));
        let listener: Rc<RefCell<dyn StepListener>> = collector.clone();
        let handle = sim.register(listener);
        collector.borrow_mut().registration = Some(handle);
        Ok(collector)
    }

    /// Whether the registration with the notifier is live.
    pub fn is_active(&self) -> bool {
        self.registration.is_some()
    }

    /// Unregister from the notifier and stop mutating accumulators.
    ///
    /// Idempotent; safe to call whether or not the collector is registered.
    /// Even if the driver erroneously advances afterwards, `on_step` will
    /// not touch any attached accumulator.
    pub fn stop(&mut self, sim: &dyn StepNotifier) {
        self.stopped = true;
        if let Some(handle) = self.registration.take() {
            sim.unregister(handle);
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// The tracked edge set (boundary-trimmed, construction-time order).
    pub fn tracked_edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Number of steps processed so far.
    pub fn steps_collected(&self) -> u64 {
        self.step_count.0
    }

    // ── Attach / detach ───────────────────────────────────────────────────

    /// Attach a waiting-time accumulator, replacing any previous one.
    pub fn attach_waiting_time(&mut self, acc: Rc<RefCell<WaitingTime>>) {
        self.waiting_time = Some(acc);
    }

    /// Detach `acc` if it is the attached waiting-time accumulator.
    pub fn detach_waiting_time(&mut self, acc: &Rc<RefCell<WaitingTime>>) -> bool {
        detach_slot(&mut self.waiting_time, acc)
    }

    /// Attach a throughput accumulator, replacing any previous one.
    pub fn attach_throughput(&mut self, acc: Rc<RefCell<Throughput>>) {
        self.throughput = Some(acc);
    }

    /// Detach `acc` if it is the attached throughput accumulator.
    pub fn detach_throughput(&mut self, acc: &Rc<RefCell<Throughput>>) -> bool {
        detach_slot(&mut self.throughput, acc)
    }

    /// Attach a fundamental-diagram accumulator, replacing any previous one.
    ///
    /// Resolves the edge's physical length from the first lane whose parent
    /// edge matches.  No matching lane is a configuration error: the
    /// accumulator is *not* attached and
    /// [`CollectError::UnresolvedEdgeLength`] is returned, so a typo'd edge
    /// id surfaces before the run instead of as an all-zero series after it.
    pub fn attach_fundamental_diagram(
        &mut self,
        sim: &dyn SimulationAdapter,
        acc: Rc<RefCell<FundamentalDiagram>>,
    ) -> CollectResult<()> {
        let edge = acc.borrow().edge_id().clone();
        let mut length = None;
        for lane in sim.lane_ids()? {
            if sim.lane_edge(&lane)? == edge {
                length = Some(sim.lane_length(&lane)?);
                break;
            }
        }
        match length {
            Some(metres) => {
                acc.borrow_mut().set_edge_length(metres);
                self.fundamental_diagram = Some(acc);
                Ok(())
            }
            None => Err(CollectError::UnresolvedEdgeLength(edge)),
        }
    }

    /// Detach `acc` if it is the attached fundamental-diagram accumulator.
    pub fn detach_fundamental_diagram(&mut self, acc: &Rc<RefCell<FundamentalDiagram>>) -> bool {
        detach_slot(&mut self.fundamental_diagram, acc)
    }

    /// Attach a time–distance accumulator, replacing any previous one.
    pub fn attach_time_distance(&mut self, acc: Rc<RefCell<TimeDistance>>) {
        self.time_distance = Some(acc);
    }

    /// Detach `acc` if it is the attached time–distance accumulator.
    pub fn detach_time_distance(&mut self, acc: &Rc<RefCell<TimeDistance>>) -> bool {
        detach_slot(&mut self.time_distance, acc)
    }

    // ── Per-kind step processing ──────────────────────────────────────────

    fn collect_waiting_time(&self, sim: &dyn SimulationAdapter) -> AdapterResult<()> {
        let Some(acc) = &self.waiting_time else {
            return Ok(());
        };
        let mut snapshot = FxHashMap::default();
        for edge in &self.edges {
            let total = sim.edge_waiting_time(edge)?;
            let count = sim.edge_vehicle_count(edge)?;
            // An empty edge has no defined average; record 0.0 rather than
            // NaN so the series stays comparable with historical aggregates.
            let average = if count == 0 { 0.0 } else { total / count as f64 };
            snapshot.insert(edge.clone(), average);
        }
        acc.borrow_mut().update(snapshot);
        Ok(())
    }

    fn collect_throughput(&self, sim: &dyn SimulationAdapter) -> AdapterResult<()> {
        let Some(acc) = &self.throughput else {
            return Ok(());
        };
        // The accumulator's own subset wins; the tracked set is the default.
        let filter = acc.borrow().edge_filter().map(<[EdgeId]>::to_vec);
        let edges = filter.as_deref().unwrap_or(&self.edges);
        for edge in edges {
            let now = sim.edge_vehicle_ids(edge)?;
            acc.borrow_mut().update(edge, now);
        }
        Ok(())
    }

    fn collect_fundamental_diagram(&self, sim: &dyn SimulationAdapter) -> AdapterResult<()> {
        let Some(acc) = &self.fundamental_diagram else {
            return Ok(());
        };
        let edge = acc.borrow().edge_id().clone();
        let now = sim.edge_vehicle_ids(&edge)?;
        let mean_speed = if now.is_empty() {
            0.0
        } else {
            let mut sum = 0.0;
            for vehicle in &now {
                sum += sim.vehicle_speed(vehicle)?;
            }
            sum / now.len() as f64
        };
        acc.borrow_mut().update(mean_speed, now);
        Ok(())
    }

    fn collect_time_distance(&self, sim: &dyn SimulationAdapter) -> AdapterResult<()> {
        let Some(acc) = &self.time_distance else {
            return Ok(());
        };
        let (window, origin, destination) = {
            let acc = acc.borrow();
            (acc.window(), acc.origin().clone(), acc.destination().clone())
        };
        if !window.contains(self.step_count) {
            return Ok(());
        }
        // Teleporting vehicles report bogus odometer readings; skip them.
        let mut vehicles = sim.vehicle_ids()?;
        for faulted in sim.teleporting_vehicle_ids()? {
            vehicles.remove(&faulted);
        }
        for vehicle in &vehicles {
            let route = sim.vehicle_route(vehicle)?;
            if route.first() == Some(&origin) && route.last() == Some(&destination) {
                let distance = sim.vehicle_distance(vehicle)?;
                acc.borrow_mut().update(vehicle, distance, self.step_count);
            }
        }
        Ok(())
    }
}

impl StepListener for StepCollector {
    /// Process one simulation step.
    ///
    /// The collector's own counter — callbacks processed since construction,
    /// starting at 0 — is the canonical time axis, not the notifier-supplied
    /// index (the two differ when a collector registers mid-run).  Ordinary
    /// degeneracies (empty edges, no vehicles) never error; an adapter
    /// failure aborts the whole step before the counter advances, so a
    /// retried step reprocesses cleanly.
    fn on_step(&mut self, sim: &dyn SimulationAdapter, _step: Step) -> AdapterResult<ListenerAction> {
        if self.stopped {
            return Ok(ListenerAction::Unregister);
        }

        self.collect_waiting_time(sim)?;
        self.collect_throughput(sim)?;
        self.collect_fundamental_diagram(sim)?;
        self.collect_time_distance(sim)?;

        self.step_count = self.step_count.offset(1);
        Ok(ListenerAction::Keep)
    }
}

/// Clear `slot` only when it holds exactly `acc` (pointer identity).
fn detach_slot<T>(slot: &mut Option<Rc<RefCell<T>>>, acc: &Rc<RefCell<T>>) -> bool {
    match slot {
        Some(current) if Rc::ptr_eq(current, acc) => {
            *slot = None;
            true
        }
        _ => false,
    }
}
