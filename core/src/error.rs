//! Error types for the film API client and the view synchronizer.
//!
//! `NotFound` and `Validation` get dedicated variants because the view layer
//! reacts to them; every other unexpected status lands in `HttpError` with
//! the raw status and body.

use thiserror::Error;
use uuid::Uuid;

/// Errors from `FilmClient` parse methods and from transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: the film does not exist (or never did).
    #[error("film not found")]
    NotFound,

    /// 400: the service rejected the payload.
    #[error("rejected by service: {message}")]
    Validation { message: String },

    /// Any other status that was not the one expected.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The round-trip itself failed; no response was received.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Errors surfaced by `ViewSynchronizer` operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Refused locally; the service was not contacted.
    #[error("{0}")]
    Rejected(String),

    /// The id is not in the cached list.
    #[error("film {0} is not in the list")]
    UnknownRecord(Uuid),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SyncError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::Api(ApiError::NotFound))
    }
}
