//! SHA-256 checksum utilities
//!
//! One canonical format (`sha256:<hex>`) is used for stored table documents
//! so that an identical rewrite can be detected without comparing rows.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of a byte slice.
pub fn compute_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}
