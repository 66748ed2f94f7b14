use sha2::{Digest, Sha256};

/// Number of digest bytes kept in a fingerprint (8 hex characters).
const FINGERPRINT_BYTES: usize = 4;

/// Compute a short, deterministic fingerprint of `input`.
///
/// The fingerprint is the first four bytes of the SHA-256 digest of the UTF-8
/// encoding of `input`, rendered as 8 lowercase hex characters. It is used as
/// the cache key for staging workspaces.
pub fn compute_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();

    digest[..FINGERPRINT_BYTES]
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
