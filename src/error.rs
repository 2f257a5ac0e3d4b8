use thiserror::Error;

use crate::models::TourStatus;

/// Errors surfaced by the backend client and the workflow helpers.
#[derive(Error, Debug)]
pub enum KeyatError {
    /// Transport-level failure (DNS, timeout, connection reset).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// A protected operation ran without a session.
    #[error("Not signed in")]
    NotAuthenticated,

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// A tour status change that the lifecycle does not allow.
    #[error("Invalid tour transition: {from:?} -> {to:?}")]
    InvalidTransition { from: TourStatus, to: TourStatus },

    /// A request failed client-side validation before it was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KeyatError>;
