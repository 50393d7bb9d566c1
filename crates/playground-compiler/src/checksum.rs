//! SHA256 digests for cached compiler artifacts.

use sha2::{Digest, Sha256};

use crate::error::{LoadError, Result};

/// Verifies that `data` matches the expected SHA256 digest.
///
/// Accepts both `"sha256:abc123"` and plain `"abc123"` digests. Returns the
/// verified hash on success.
pub fn verify_sha256(file: &str, data: &[u8], expected_digest: &str) -> Result<String> {
    let expected_hash = expected_digest
        .strip_prefix("sha256:")
        .unwrap_or(expected_digest)
        .trim()
        .to_lowercase();

    let actual_hash = compute_sha256(data);

    if actual_hash != expected_hash {
        return Err(LoadError::ChecksumMismatch {
            file: file.to_string(),
            expected: expected_hash,
            actual: actual_hash,
        });
    }

    tracing::trace!(file, "SHA256 verification passed: {}", actual_hash);
    Ok(actual_hash)
}

/// Computes the SHA256 hash of the given data.
#[must_use]
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}
