//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The top-level error type for `pdes-core`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid simulation time {0}: must be finite")]
    InvalidTime(f64),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `pdes-core`.
pub type CoreResult<T> = Result<T, CoreError>;
