//! Content hash derivation.

use std::path::Path;

use crate::ContentHash;

/// Computes the filesystem tier key for one set of transform inputs.
///
/// Pure and order-sensitive. Every field is length-prefixed (and the platform
/// tagged) so that no two distinct tuples share an encoding, e.g.
/// `("ab", "c")` and `("a", "bc")`, or a missing platform and an empty one.
pub fn compute_hash(
    platform: Option<&str>,
    serialized_config: &str,
    path: &Path,
    modified_at: i64,
) -> ContentHash {
    let mut hasher = blake3::Hasher::new();

    match platform {
        Some(platform) => {
            hasher.update(&[1]);
            update_field(&mut hasher, platform.as_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
    update_field(&mut hasher, serialized_config.as_bytes());
    update_field(&mut hasher, path.as_os_str().as_encoded_bytes());
    hasher.update(&modified_at.to_le_bytes());

    ContentHash::from_digest(hasher.finalize())
}

fn update_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
