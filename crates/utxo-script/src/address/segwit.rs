//! Segwit addresses: Bech32 for witness version 0, Bech32m for version 1.

use utxo_primitives::bech32::{self, Variant};
use utxo_primitives::PrimitivesError;

use crate::network::{AddressFamily, NetworkParameters};
use crate::script_type::ScriptType;
use crate::AddressError;

/// Highest witness version a Bech32 data part can carry.
const MAX_WITNESS_VERSION: u8 = 16;

fn expected_variant(version: u8) -> Variant {
    if version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    }
}

pub(super) fn decode(
    address: &str,
    network: &NetworkParameters,
) -> Result<(ScriptType, Vec<u8>), AddressError> {
    let decoded = bech32::decode(address).map_err(|e| match e {
        PrimitivesError::ChecksumMismatch => AddressError::InvalidChecksum,
        other => AddressError::InvalidEncoding(other.to_string()),
    })?;

    let expected_hrp = network.bech32_hrp.as_deref().unwrap_or_default();
    if decoded.hrp != expected_hrp {
        return Err(AddressError::WrongHrp {
            expected: expected_hrp.to_string(),
            found: decoded.hrp,
        });
    }

    let (&version, data) = decoded
        .data
        .split_first()
        .ok_or_else(|| AddressError::InvalidEncoding("empty witness data".to_string()))?;
    if version > MAX_WITNESS_VERSION {
        return Err(AddressError::InvalidEncoding(format!(
            "witness version {} out of range",
            version
        )));
    }
    if decoded.variant != expected_variant(version) {
        return Err(AddressError::InvalidChecksum);
    }

    let family = match version {
        0 => AddressFamily::SegwitV0,
        1 => AddressFamily::Taproot,
        other => return Err(AddressError::UnsupportedWitnessVersion(other)),
    };
    let program = bech32::convert_bits(data, 5, 8, false)
        .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
    let script_type = match (version, program.len()) {
        (0, 20) => ScriptType::P2wpkh,
        (0, 32) => ScriptType::P2wsh,
        (1, 32) => ScriptType::P2tr,
        (_, length) => return Err(AddressError::InvalidProgramLength { version, length }),
    };

    if !network.supports_family(family) {
        return Err(AddressError::UnsupportedAddressFamily(format!(
            "{} addresses are not enabled on {}",
            script_type, network.id
        )));
    }
    Ok((script_type, program))
}

pub(super) fn encode(
    script_type: ScriptType,
    payload: &[u8],
    network: &NetworkParameters,
) -> Result<String, AddressError> {
    let (version, family) = match script_type {
        ScriptType::P2wpkh | ScriptType::P2wsh => (0u8, AddressFamily::SegwitV0),
        ScriptType::P2tr => (1u8, AddressFamily::Taproot),
        other => {
            return Err(AddressError::UnsupportedAddressFamily(format!(
                "{} has no segwit form",
                other
            )))
        }
    };
    let hrp = match &network.bech32_hrp {
        Some(hrp) if network.supports_family(family) => hrp,
        _ => {
            return Err(AddressError::UnsupportedAddressFamily(format!(
                "{} addresses are not enabled on {}",
                script_type, network.id
            )))
        }
    };

    let mut data = vec![version];
    data.extend(
        bech32::convert_bits(payload, 8, 5, true)
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?,
    );
    bech32::encode(hrp, &data, expected_variant(version)).map_err(|e| AddressError::InvalidEncoding(e.to_string()))
}
