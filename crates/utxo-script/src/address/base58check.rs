//! Legacy Base58Check addresses: version byte, 20-byte hash, 4-byte checksum.

use utxo_primitives::base58;

use super::primitives_error;
use crate::network::NetworkParameters;
use crate::script_type::ScriptType;
use crate::AddressError;

const HASH_LEN: usize = 20;

pub(super) fn decode(
    address: &str,
    network: &NetworkParameters,
) -> Result<(ScriptType, Vec<u8>), AddressError> {
    let (version, payload) = base58::check_decode(address).map_err(primitives_error)?;

    let script_type = if network.p2pkh_versions.contains(&version) {
        ScriptType::P2pkh
    } else if network.p2sh_versions.contains(&version) {
        ScriptType::P2sh
    } else {
        return Err(AddressError::UnsupportedVersionByte(version));
    };

    if payload.len() != HASH_LEN {
        return Err(AddressError::InvalidEncoding(format!(
            "base58check payload must be {} bytes, got {}",
            HASH_LEN,
            payload.len()
        )));
    }
    Ok((script_type, payload))
}

pub(super) fn encode(
    script_type: ScriptType,
    payload: &[u8],
    network: &NetworkParameters,
) -> Result<String, AddressError> {
    let versions = match script_type {
        ScriptType::P2pkh => &network.p2pkh_versions,
        ScriptType::P2sh => &network.p2sh_versions,
        other => {
            return Err(AddressError::UnsupportedAddressFamily(format!(
                "{} has no base58check form",
                other
            )))
        }
    };
    let version = versions.first().ok_or_else(|| {
        AddressError::UnsupportedAddressFamily(format!(
            "{} has no {} version byte",
            network.id, script_type
        ))
    })?;
    Ok(base58::check_encode(*version, payload))
}
