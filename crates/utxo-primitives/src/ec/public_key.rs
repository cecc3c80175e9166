//! secp256k1 public keys as they appear in locking and unlocking scripts.
//!
//! Supports compressed/uncompressed SEC1 serialization, Hash160 commitments,
//! x-only keys, the BIP86 key-path taproot tweak, and ECDSA verification of
//! prehashed digests.

use std::fmt;

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, Scalar, U256};

use crate::ec::signature::Signature;
use crate::hash::{hash160, tagged_hash};
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
pub const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed public key in bytes (prefix + 32 byte x + 32 byte y).
pub const UNCOMPRESSED_LEN: usize = 65;

/// A secp256k1 public key.
///
/// Wraps a k256 `VerifyingKey`. The wallet's own key is handed to the
/// transaction builder so it can fill scriptSigs and witnesses and check
/// that spent outputs really belong to it.
#[derive(Clone, Debug)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse a SEC1-encoded key (33-byte compressed or 65-byte uncompressed).
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or `InvalidPublicKey` if the bytes are not
    /// a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != COMPRESSED_LEN && bytes.len() != UNCOMPRESSED_LEN {
            return Err(PrimitivesError::InvalidPublicKey(format!(
                "expected {} or {} bytes, got {}",
                COMPRESSED_LEN,
                UNCOMPRESSED_LEN,
                bytes.len()
            )));
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;
        Ok(PublicKey { inner })
    }

    /// Parse a hex-encoded SEC1 key.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    /// Serialize in compressed SEC1 form (0x02/0x03 prefix + x).
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize in uncompressed SEC1 form (0x04 prefix + x + y).
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Hash160 of the compressed encoding.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Hash160 of the uncompressed encoding, as committed to by legacy
    /// P2PKH outputs created from uncompressed keys.
    pub fn hash160_uncompressed(&self) -> [u8; 20] {
        hash160(&self.to_uncompressed())
    }

    /// The 32-byte x coordinate (BIP340 x-only key).
    pub fn x_only(&self) -> [u8; 32] {
        let compressed = self.to_compressed();
        let mut out = [0u8; 32];
        out.copy_from_slice(&compressed[1..]);
        out
    }

    /// Compute the BIP86 taproot output key for key-path-only spending.
    ///
    /// `Q = lift_x(P) + int(tagged_hash("TapTweak", x(P))) * G`, returned
    /// x-only.
    ///
    /// # Returns
    /// The 32-byte output key, or an error if the tweak lands on infinity.
    pub fn taproot_output_key(&self) -> Result<[u8; 32], PrimitivesError> {
        let x_only = self.x_only();

        // lift_x picks the even-y point with this x.
        let mut even = [0u8; COMPRESSED_LEN];
        even[0] = 0x02;
        even[1..].copy_from_slice(&x_only);
        let internal = VerifyingKey::from_sec1_bytes(&even)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;

        let tweak = tagged_hash("TapTweak", &[&x_only]);
        let t = <Scalar as Reduce<U256>>::reduce(U256::from_be_slice(&tweak));
        let output = ProjectivePoint::from(*internal.as_affine()) + ProjectivePoint::GENERATOR * t;

        let encoded = output.to_affine().to_encoded_point(true);
        let x = encoded.x().ok_or_else(|| {
            PrimitivesError::InvalidPublicKey("taproot tweak produced the point at infinity".to_string())
        })?;
        let mut out = [0u8; 32];
        out.copy_from_slice(x);
        Ok(out)
    }

    /// Verify an ECDSA signature over a 32-byte digest.
    ///
    /// # Returns
    /// `true` if the signature is valid for this digest and key.
    pub fn verify(&self, digest: &[u8], sig: &Signature) -> bool {
        match sig.to_k256() {
            Ok(k256_sig) => self.inner.verify_prehash(digest, &k256_sig).is_ok(),
            Err(_) => false,
        }
    }

    /// Hex of the compressed encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
