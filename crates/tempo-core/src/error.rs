//! Framework error type.
//!
//! Posting and running never fail; errors only surface while validating
//! configuration.  Downstream crates wrap `TempoError` as one variant of
//! their own enum via `#[from]`.

use thiserror::Error;

/// The top-level error type for `tempo-core`.
#[derive(Debug, Error)]
pub enum TempoError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `tempo-*` crates.
pub type TempoResult<T> = Result<T, TempoError>;
