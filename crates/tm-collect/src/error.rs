//! Error type for collector configuration.

use thiserror::Error;

use tm_adapter::AdapterError;
use tm_core::EdgeId;

/// Failures surfaced when building or configuring a
/// [`StepCollector`](crate::StepCollector).
///
/// Per-step degeneracies (empty edges, untracked vehicles, steps outside a
/// window) are policy defaults, never errors; only configuration problems
/// and adapter failures appear here.
#[derive(Debug, Error)]
pub enum CollectError {
    /// No lane of the simulation resolves a length for the fundamental
    /// diagram's edge.
    #[error("no lane resolves a length for edge {0}")]
    UnresolvedEdgeLength(EdgeId),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Alias for `Result<T, CollectError>`.
pub type CollectResult<T> = Result<T, CollectError>;
