//! Engine errors

use petri_field::FieldError;
use thiserror::Error;

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid dimensions or out-of-range cell coordinates.
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("invalid update rate: {rate} updates per second")]
    InvalidRate { rate: f64 },
}
