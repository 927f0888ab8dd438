//! Component hash functions.
//!
//! Both hashes are truncated to the length of their input: shard ids are
//! compared as byte strings, so a short component keeps a short id.

use xxhash_rust::xxh64::xxh64;

/// MD5 digest of `input`, truncated to `min(input.len(), 16)` bytes.
pub fn md5_truncated(input: &[u8]) -> Vec<u8> {
    let digest = md5::compute(input);
    let n = input.len().min(digest.0.len());
    digest.0[..n].to_vec()
}

/// Unseeded 64-bit xxHash of `input` (little-endian), truncated to
/// `min(input.len(), 8)` bytes.
pub fn xxhash64_truncated(input: &[u8]) -> Vec<u8> {
    let digest = xxh64(input, 0).to_le_bytes();
    let n = input.len().min(digest.len());
    digest[..n].to_vec()
}
