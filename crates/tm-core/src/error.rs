//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! via `From` impls or wrap it as one variant, whichever keeps error sites
//! clean.

use thiserror::Error;

use crate::step::Step;

/// The top-level error type for `tm-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("empty step window: start {start} is not before end {end}")]
    EmptyWindow { start: Step, end: Step },
}

/// Shorthand result type for all `tm-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
