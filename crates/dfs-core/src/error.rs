//! Error taxonomy shared across the coordinator, storage node, and
//! metadata service.
//!
//! These are kinds, not exhaustive error types: every fallible RPC in the
//! system resolves to one of these five buckets, which in turn maps onto
//! an HTTP status at the axum boundary.

/// Coarse classification of a failure, independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Metadata or chunk key absent.
    NotFound,
    /// Checksum mismatch on a fetched chunk.
    Integrity,
    /// RPC send/receive failure against a peer.
    Transport,
    /// Unrecoverable server-side condition.
    Internal,
    /// Reserved — the current design does not validate inputs beyond presence.
    InvalidArgument,
}

impl ErrorKind {
    /// The HTTP status this kind maps to at an axum handler boundary.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Integrity => 500,
            ErrorKind::Transport => 502,
            ErrorKind::Internal => 500,
            ErrorKind::InvalidArgument => 400,
        }
    }
}

/// An error carrying both its coarse kind and a human-readable message.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DfsError {
    pub kind: ErrorKind,
    pub message: String,
}

impl DfsError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Integrity, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }
}
