//! Chunk checksums — SHA-256 over the raw payload, hex-encoded lowercase.
//!
//! The checksum travels with a chunk from the moment it is written; the
//! coordinator recomputes it on every read and rejects a mismatch rather
//! than trusting the storage node's stored value.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 checksum of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex::encode(digest)
}

/// Returns true if `data`'s checksum matches `expected` (case-insensitively
/// on `expected`'s hex digits — computed digests are always lowercase).
pub fn verify(data: &[u8], expected: &str) -> bool {
    sha256_hex(data).eq_ignore_ascii_case(expected)
}
