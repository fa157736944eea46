//! `tm-metrics` — stateful metric accumulators.
//!
//! Each accumulator consumes one step's raw observations through its own
//! `update` and mutates only its own running aggregate; none reads another's
//! state, and none talks to the simulation directly (the collector in
//! `tm-collect` does the querying).  There is no terminal processing step:
//! final state is whatever has accumulated when the driver stops stepping.
//!
//! | Accumulator            | Aggregate                                          |
//! |------------------------|----------------------------------------------------|
//! | [`WaitingTime`]        | Per-step snapshots of average wait per edge        |
//! | [`Throughput`]         | Per-edge departed-vehicle counts per step          |
//! | [`FundamentalDiagram`] | Speed/flow/vehicle-count series for one edge       |
//! | [`TimeDistance`]       | Per-vehicle distance trajectories over a window    |
//!
//! # Memory
//!
//! All state grows with the run and is never pruned: snapshot and series
//! vectors grow linearly with steps, occupant sets with vehicles per edge,
//! and trajectory maps with distinct tracked vehicles.  Long runs with high
//! vehicle turnover pay for it — that is the documented cost model, not a
//! leak.

pub mod fundamental_diagram;
pub mod throughput;
pub mod time_distance;
pub mod waiting_time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use fundamental_diagram::FundamentalDiagram;
pub use throughput::Throughput;
pub use time_distance::{is_missing, TimeDistance, MISSING_SAMPLE};
pub use waiting_time::WaitingTime;
