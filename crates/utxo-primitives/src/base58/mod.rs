//! Base58 and Base58Check encoding.
//!
//! Legacy addresses on Bitcoin-derived chains are a version byte followed by
//! a 20-byte hash, with a 4-byte double-SHA-256 checksum appended before
//! Base58 encoding.

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Length of the trailing Base58Check checksum.
pub const CHECKSUM_LEN: usize = 4;

/// Encode a byte slice to a Base58 string using the Bitcoin alphabet.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// Leading '1' characters decode to leading zero bytes.
///
/// # Arguments
/// * `s` - The Base58 string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or an error for characters outside the alphabet.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Compute the Base58Check checksum of `version || payload`.
fn checksum(version: u8, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    let digest = sha256d(&data);
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Encode a version byte and payload as Base58Check.
///
/// # Arguments
/// * `version` - The leading version byte (e.g. 0x00 for Bitcoin P2PKH).
/// * `payload` - The payload, typically a 20-byte hash.
///
/// # Returns
/// The Base58Check string `encode(version || payload || checksum)`.
pub fn check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(version, payload));
    encode(&data)
}

/// Decode a Base58Check string into its version byte and payload.
///
/// The trailing four bytes are compared against the first four bytes of
/// SHA-256d over everything before them.
///
/// # Returns
/// `Ok((version, payload))`, `Err(ChecksumMismatch)` when the checksum does
/// not verify, or `Err(InvalidBase58)` for bad characters or short input.
pub fn check_decode(s: &str) -> Result<(u8, Vec<u8>), PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < 1 + CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for version and checksum".to_string(),
        ));
    }
    let (body, check) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    let (version, payload) = (body[0], &body[1..]);
    if check != checksum(version, payload) {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok((version, payload.to_vec()))
}
