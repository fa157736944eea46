//! `tm-export` — turns final accumulator state into tables and CSV files.
//!
//! Pure presentation: every function here reads the accumulators the
//! collector filled and lays the data out with one row per step (or per
//! window slot, for time–distance) and one column per tracked key.  No
//! aggregation logic lives here except the fundamental-diagram bucket
//! resample, which is a display-time regrouping of already-collected
//! series.
//!
//! | Builder                          | Layout                                      |
//! |----------------------------------|---------------------------------------------|
//! | [`waiting_time_table`]           | step × edge, average wait (s)               |
//! | [`throughput_table`]             | step × edge, departed vehicles              |
//! | [`fundamental_diagram_table`]    | step × {speed, flow, count, density}        |
//! | [`fundamental_diagram_buckets`]  | bucket × {flow/h, speed, density/km}        |
//! | [`time_distance_table`]          | step × vehicle, odometer metres             |

pub mod convert;
pub mod csv;
pub mod error;
pub mod table;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use convert::{
    fundamental_diagram_buckets, fundamental_diagram_table, throughput_table,
    time_distance_table, waiting_time_table,
};
pub use csv::{write_csv, write_csv_path};
pub use error::{ExportError, ExportResult};
pub use table::{Cell, Table};
