//! `tm-collect` — the step collector.
//!
//! # Per-step control flow
//!
//! ```text
//! driver advances the simulation
//!   └─ notifier dispatches StepCollector::on_step
//!        ① Waiting time       — per tracked edge: total wait ÷ vehicle count
//!        ② Throughput         — per edge (own subset or tracked set): occupancy snapshot
//!        ③ Fundamental diagram — one edge: occupancy + mean occupant speed
//!        ④ Time–distance      — inside the window: route-matched vehicles' odometers
//!        ⑤ step counter += 1
//! ```
//!
//! Each attached accumulator is fed independently; none sees another's
//! state.  An adapter failure aborts the whole step via `?` and propagates
//! to the driver — the collector does not guess recovery for an
//! inconsistent snapshot.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::{cell::RefCell, rc::Rc};
//! use tm_collect::StepCollector;
//! use tm_metrics::{Throughput, WaitingTime};
//!
//! let collector = StepCollector::register(&sim)?;
//! let waits = Rc::new(RefCell::new(WaitingTime::new()));
//! collector.borrow_mut().attach_waiting_time(Rc::clone(&waits));
//! while sim.step()? {}
//! collector.borrow_mut().stop(&sim);
//! println!("{} steps of waits", waits.borrow().len());
//! ```

pub mod collector;
pub mod error;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use collector::StepCollector;
pub use error::{CollectError, CollectResult};
