//! Transaction identifiers.
//!
//! A txid is SHA-256d of the serialized transaction. It is stored in
//! internal (wire) byte order and displayed as byte-reversed hex, which is
//! the form block explorers and UTXO providers hand out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Size of a transaction id in bytes.
pub const TXID_SIZE: usize = 32;

/// A 32-byte transaction id in internal byte order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Txid([u8; TXID_SIZE]);

impl Txid {
    /// Wrap 32 bytes already in internal (wire) order.
    pub fn from_wire_bytes(bytes: [u8; TXID_SIZE]) -> Self {
        Txid(bytes)
    }

    /// Compute the id of a serialized transaction.
    pub fn hash_of(serialized: &[u8]) -> Self {
        Txid(sha256d(serialized))
    }

    /// Parse display-order hex (as shown by explorers).
    ///
    /// # Returns
    /// `Ok(Txid)` for exactly 64 hex characters, an error otherwise.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let decoded = hex::decode(hex_str)?;
        let mut bytes: [u8; TXID_SIZE] = decoded.as_slice().try_into().map_err(|_| {
            PrimitivesError::InvalidHash(format!(
                "txid must be {} bytes, got {}",
                TXID_SIZE,
                decoded.len()
            ))
        })?;
        bytes.reverse();
        Ok(Txid(bytes))
    }

    /// The bytes in internal (wire) order.
    pub fn as_wire_bytes(&self) -> &[u8; TXID_SIZE] {
        &self.0
    }

    /// The bytes in display order, as used for BIP69 input sorting.
    pub fn to_display_bytes(&self) -> [u8; TXID_SIZE] {
        let mut out = self.0;
        out.reverse();
        out
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_display_bytes()))
    }
}

impl fmt::Debug for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Txid({})", self)
    }
}

impl FromStr for Txid {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Txid::from_hex(s)
    }
}

impl Serialize for Txid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Txid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Txid::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISPLAY: &str = "cffea3f46c73d61c6ed1296494b3c85e9f498629a32d67367a0d9e1bafdd05df";

    #[test]
    fn test_from_hex_reverses_into_wire_order() {
        let txid = Txid::from_hex(DISPLAY).unwrap();
        assert_eq!(txid.as_wire_bytes()[0], 0xdf);
        assert_eq!(txid.as_wire_bytes()[31], 0xcf);
        assert_eq!(txid.to_string(), DISPLAY);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert!(matches!(
            Txid::from_hex("abcd"),
            Err(PrimitivesError::InvalidHash(_))
        ));
        assert!(Txid::from_hex("zz").is_err());
    }

    #[test]
    fn test_serde_uses_display_hex() {
        let txid: Txid = DISPLAY.parse().unwrap();
        let json = serde_json::to_string(&txid).unwrap();
        assert_eq!(json, format!("\"{}\"", DISPLAY));
        let back: Txid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, txid);
    }
}
