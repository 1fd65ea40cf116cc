//! Shared types for the distributed file store: wire models, identifiers,
//! checksums, error kinds, and per-binary configuration.

pub mod checksum;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod wire;

pub use error::{DfsError, ErrorKind};
