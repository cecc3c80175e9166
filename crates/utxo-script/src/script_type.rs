//! Closed set of locking script families.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Signature scheme of a bare pay-to-pubkey output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PubKeyScheme {
    /// 32-byte x-only key checked with a Schnorr signature.
    Schnorr,
    /// 33-byte compressed key checked with an ECDSA signature.
    Ecdsa,
}

/// Locking script family.
///
/// Each chain enables a subset of these in its `NetworkParameters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
    P2pk(PubKeyScheme),
}

impl ScriptType {
    /// True for types whose unlocking data lives in the witness.
    pub fn is_witness(&self) -> bool {
        matches!(self, ScriptType::P2wpkh | ScriptType::P2wsh | ScriptType::P2tr)
    }

    /// Length of the hash or key carried by a standard script of this type.
    ///
    /// `P2sh` is 20 on Bitcoin-format chains; Kaspa uses a 32-byte hash and
    /// is handled by the locking script builder.
    pub fn payload_len(&self) -> usize {
        match self {
            ScriptType::P2pkh | ScriptType::P2sh | ScriptType::P2wpkh => 20,
            ScriptType::P2wsh | ScriptType::P2tr => 32,
            ScriptType::P2pk(PubKeyScheme::Schnorr) => 32,
            ScriptType::P2pk(PubKeyScheme::Ecdsa) => 33,
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptType::P2pkh => "p2pkh",
            ScriptType::P2sh => "p2sh",
            ScriptType::P2wpkh => "p2wpkh",
            ScriptType::P2wsh => "p2wsh",
            ScriptType::P2tr => "p2tr",
            ScriptType::P2pk(PubKeyScheme::Schnorr) => "p2pk(schnorr)",
            ScriptType::P2pk(PubKeyScheme::Ecdsa) => "p2pk(ecdsa)",
        };
        f.write_str(name)
    }
}
