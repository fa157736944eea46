//! `tm-core` — foundational types for the `rust_tm` traffic-metrics framework.
//!
//! This crate is a dependency of every other `tm-*` crate.  It intentionally
//! has no `tm-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                          |
//! |-------------|---------------------------------------------------|
//! | [`ids`]     | `EdgeId`, `LaneId`, `VehicleId`                   |
//! | [`step`]    | `Step`, `StepWindow`                              |
//! | [`units`]   | m/s → km/h conversion                             |
//! | [`error`]   | `CoreError`, `CoreResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod step;
pub mod units;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, LaneId, VehicleId, SINK_SUFFIX, SOURCE_SUFFIX};
pub use step::{Step, StepWindow};
pub use units::{mps_to_kmh, MPS_TO_KMH};
