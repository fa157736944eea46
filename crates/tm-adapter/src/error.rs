//! Error type for simulation adapter queries.

use thiserror::Error;

use tm_core::{EdgeId, LaneId, VehicleId};

/// Failures reported by a [`SimulationAdapter`](crate::SimulationAdapter).
///
/// Queries against entities the simulation no longer knows about are real
/// errors, not degeneracies: they indicate an inconsistent snapshot (e.g. a
/// vehicle that left between two queries of the same step) and propagate out
/// of the step callback untouched.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),

    #[error("unknown lane {0}")]
    UnknownLane(LaneId),

    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),

    /// Transport-level failure of a real backend binding (socket closed,
    /// protocol desync, …).
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Alias for `Result<T, AdapterError>`.
pub type AdapterResult<T> = Result<T, AdapterError>;
