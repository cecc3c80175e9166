//! Hash function primitives.
//!
//! Provides SHA-256, double SHA-256, RIPEMD-160, Hash160 and BIP340 tagged
//! hashes. Checksums for Base58Check, transaction ids and legacy/BIP143
//! signature digests are all built on these.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// Used for transaction ids, Base58Check checksums and the legacy and
/// BIP143 signature digests.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash of the input data.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// The 20-byte commitment carried by P2PKH, P2SH and P2WPKH scripts.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Compute a BIP340 tagged hash: SHA-256(SHA-256(tag) || SHA-256(tag) || parts...).
///
/// The message is supplied in parts so callers can hash large preimages
/// without concatenating them first.
///
/// # Arguments
/// * `tag` - The domain separation tag, e.g. `"TapSighash"`.
/// * `parts` - Message fragments hashed in order.
///
/// # Returns
/// A 32-byte digest.
pub fn tagged_hash(tag: &str, parts: &[&[u8]]) -> [u8; 32] {
    let tag_hash = sha256(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- SHA-256 ----

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256d_abc() {
        assert_eq!(
            hex::encode(sha256d(b"abc")),
            "4f8b42c22dd3729b519ba6f68d2da7cc5b2d606d05daed5ad5128cc03e6c6358"
        );
    }

    // ---- RIPEMD-160 / Hash160 ----

    #[test]
    fn test_ripemd160_empty_string() {
        assert_eq!(
            hex::encode(ripemd160(b"")),
            "9c1185a5c5e9fc54612808977ee8f548b2258d31"
        );
    }

    /// Hash160 of the empty string is the payload of the well-known
    /// `3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy` P2SH address.
    #[test]
    fn test_hash160_empty() {
        assert_eq!(
            hex::encode(hash160(b"")),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
    }

    // ---- Tagged hashes ----

    #[test]
    fn test_tagged_hash_parts_match_concatenation() {
        let joined = tagged_hash("TapTweak", &[b"hello world"]);
        let split = tagged_hash("TapTweak", &[b"hello", b" ", b"world"]);
        assert_eq!(joined, split);
    }

    #[test]
    fn test_tagged_hash_differs_by_tag() {
        assert_ne!(
            tagged_hash("TapSighash", &[b"x"]),
            tagged_hash("TapTweak", &[b"x"])
        );
    }
}
