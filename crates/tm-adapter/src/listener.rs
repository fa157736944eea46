//! Step-notification registration.
//!
//! The simulation drives the core by inversion of control: a listener
//! registers with the adapter's notification mechanism and is called back
//! once per step, synchronously, in-line with simulation advancement.
//! Lifetime is explicit — a listener stays registered until it is
//! unregistered by handle or asks to be removed by returning
//! [`ListenerAction::Unregister`]; nothing is tied to destructor timing.
//!
//! Everything here is single-threaded (`Rc<RefCell<…>>`): the driver, the
//! registry, and every listener live on the thread that advances the
//! simulation.

use std::cell::RefCell;
use std::rc::Rc;

use tm_core::Step;

use crate::adapter::SimulationAdapter;
use crate::error::AdapterResult;

// ── Listener contract ────────────────────────────────────────────────────────

/// What a listener wants after handling a step.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ListenerAction {
    /// Keep receiving step notifications.
    Keep,
    /// Remove this listener from the registry.
    Unregister,
}

/// A callback invoked once per simulation step.
///
/// `step` is the notifier's own step index.  Ordinary per-step degeneracies
/// (no vehicles anywhere, empty edges) must not error; adapter query
/// failures are propagated so the driver sees the inconsistent snapshot.
pub trait StepListener {
    fn on_step(&mut self, sim: &dyn SimulationAdapter, step: Step) -> AdapterResult<ListenerAction>;
}

/// Opaque handle identifying one registration.
///
/// Handles are never reused within a registry, so a stale handle held after
/// unregistration is harmless (a second `unregister` is a no-op).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ListenerHandle(u64);

/// Registration side of a step-notifying adapter.
///
/// Takes `&self`: registration is interior-mutable so a listener can
/// unregister itself from inside its own callback.
pub trait StepNotifier {
    fn register(&self, listener: Rc<RefCell<dyn StepListener>>) -> ListenerHandle;

    /// Remove a registration.  Returns whether the handle was live.
    fn unregister(&self, handle: ListenerHandle) -> bool;
}

// ── ListenerRegistry ─────────────────────────────────────────────────────────

/// Reusable listener bookkeeping for adapter backends.
///
/// A backend embeds a `RefCell<ListenerRegistry>`, forwards
/// [`StepNotifier`] calls to it, and invokes
/// [`ListenerRegistry::dispatch`] from its native step event.
#[derive(Default)]
pub struct ListenerRegistry {
    next_handle: u64,
    entries:     Vec<(ListenerHandle, Rc<RefCell<dyn StepListener>>)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Rc<RefCell<dyn StepListener>>) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push((handle, listener));
        handle
    }

    pub fn unregister(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Notify every registered listener of one step.
    ///
    /// The listener list is snapshotted before dispatch, so registrations
    /// added or removed from inside a callback take effect from the *next*
    /// step.  Listeners returning [`ListenerAction::Unregister`] are pruned
    /// after their callback returns.  The first listener error aborts the
    /// remainder of the step and propagates to the driver.
    pub fn dispatch(
        cell: &RefCell<Self>,
        sim:  &dyn SimulationAdapter,
        step: Step,
    ) -> AdapterResult<()> {
        // Clone the Rc list out so no registry borrow is held while listener
        // code runs (a callback may re-enter register/unregister).
        let entries: Vec<_> = cell.borrow().entries.clone();
        for (handle, listener) in entries {
            let action = listener.borrow_mut().on_step(sim, step)?;
            if action == ListenerAction::Unregister {
                cell.borrow_mut().unregister(handle);
            }
        }
        Ok(())
    }
}
