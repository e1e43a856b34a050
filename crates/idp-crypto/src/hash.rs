//! Hash functions.
//!
//! SHA-256 is not offered. Minimum hash is SHA-384.

use aws_lc_rs::digest;

/// Computes a SHA-384 hash of the input data.
#[must_use]
pub fn sha384(data: &[u8]) -> Vec<u8> {
    digest::digest(&digest::SHA384, data).as_ref().to_vec()
}
