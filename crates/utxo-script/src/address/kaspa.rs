//! Kaspa addresses.
//!
//! Same checksum as CashAddr, but the version byte is a plain tag for the
//! key or hash that follows.

use utxo_primitives::cashaddr;

use super::primitives_error;
use crate::network::NetworkParameters;
use crate::script_type::{PubKeyScheme, ScriptType};
use crate::AddressError;

const VERSION_PUBKEY: u8 = 0;
const VERSION_PUBKEY_ECDSA: u8 = 1;
const VERSION_SCRIPT_HASH: u8 = 8;

/// Kaspa script hashes are BLAKE2b-256.
pub(crate) const SCRIPT_HASH_LEN: usize = 32;

fn payload_len(version: u8) -> Option<usize> {
    match version {
        VERSION_PUBKEY => Some(32),
        VERSION_PUBKEY_ECDSA => Some(33),
        VERSION_SCRIPT_HASH => Some(SCRIPT_HASH_LEN),
        _ => None,
    }
}

pub(super) fn decode(
    address: &str,
    network: &NetworkParameters,
) -> Result<(ScriptType, Vec<u8>), AddressError> {
    let prefix = network.cashaddr_prefix.as_deref().unwrap_or_default();
    let decoded = cashaddr::decode(address, prefix).map_err(primitives_error)?;
    if decoded.prefix != prefix {
        return Err(AddressError::WrongHrp {
            expected: prefix.to_string(),
            found: decoded.prefix,
        });
    }

    let (&version, body) = decoded
        .payload
        .split_first()
        .ok_or_else(|| AddressError::InvalidEncoding("empty kaspa payload".to_string()))?;
    let expected = payload_len(version).ok_or(AddressError::UnsupportedVersionByte(version))?;
    if body.len() != expected {
        return Err(AddressError::InvalidEncoding(format!(
            "kaspa version {} carries {} bytes, found {}",
            version,
            expected,
            body.len()
        )));
    }

    let script_type = match version {
        VERSION_PUBKEY => ScriptType::P2pk(PubKeyScheme::Schnorr),
        VERSION_PUBKEY_ECDSA => ScriptType::P2pk(PubKeyScheme::Ecdsa),
        _ => ScriptType::P2sh,
    };
    Ok((script_type, body.to_vec()))
}

pub(super) fn encode(
    script_type: ScriptType,
    payload: &[u8],
    prefix: &str,
) -> Result<String, AddressError> {
    let version = match script_type {
        ScriptType::P2pk(PubKeyScheme::Schnorr) => VERSION_PUBKEY,
        ScriptType::P2pk(PubKeyScheme::Ecdsa) => VERSION_PUBKEY_ECDSA,
        ScriptType::P2sh => VERSION_SCRIPT_HASH,
        other => {
            return Err(AddressError::UnsupportedAddressFamily(format!(
                "{} has no kaspa form",
                other
            )))
        }
    };
    if Some(payload.len()) != payload_len(version) {
        return Err(AddressError::InvalidEncoding(format!(
            "{} payload of {} bytes",
            script_type,
            payload.len()
        )));
    }

    let mut data = Vec::with_capacity(payload.len() + 1);
    data.push(version);
    data.extend_from_slice(payload);
    cashaddr::encode(prefix, &data).map_err(primitives_error)
}
