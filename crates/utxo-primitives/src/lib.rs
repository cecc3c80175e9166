/// UTXO chain primitives: hashing, checksummed text encodings, and wire helpers.
///
/// This crate provides the building blocks shared by address decoding and
/// transaction assembly:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160, BIP340 tagged hashes)
/// - Base58 and Base58Check encoding
/// - Bech32/Bech32m and CashAddr checksum engines
/// - Compact-size integers and little-endian byte readers/writers
/// - Transaction identifiers with display-order hex
/// - secp256k1 public keys and ECDSA signature encoding

pub mod hash;
pub mod txid;
pub mod util;
pub mod base58;
pub mod bech32;
pub mod cashaddr;
pub mod ec;

mod error;
pub use error::PrimitivesError;
