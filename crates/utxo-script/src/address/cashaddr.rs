//! CashAddr addresses.
//!
//! The version byte packs the script type in bits 3-6 and the hash size in
//! bits 0-2. Bit 7 is reserved and must be clear.

use utxo_primitives::cashaddr;

use super::primitives_error;
use crate::network::NetworkParameters;
use crate::script_type::ScriptType;
use crate::AddressError;

/// Hash length in bytes for each value of the size bits.
const HASH_SIZES: [usize; 8] = [20, 24, 28, 32, 40, 48, 56, 64];

const TYPE_P2PKH: u8 = 0;
const TYPE_P2SH: u8 = 1;

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

    let (&version, hash) = decoded
        .payload
        .split_first()
        .ok_or_else(|| AddressError::InvalidEncoding("empty cashaddr payload".to_string()))?;
    if version & 0x80 != 0 {
        return Err(AddressError::InvalidEncoding(format!(
            "reserved bit set in version byte 0x{:02x}",
            version
        )));
    }

    let script_type = match (version >> 3) & 0x0f {
        TYPE_P2PKH => ScriptType::P2pkh,
        TYPE_P2SH => ScriptType::P2sh,
        _ => return Err(AddressError::UnsupportedVersionByte(version)),
    };
    let size = HASH_SIZES[usize::from(version & 0x07)];
    if hash.len() != size {
        return Err(AddressError::InvalidEncoding(format!(
            "version byte declares {} hash bytes, found {}",
            size,
            hash.len()
        )));
    }
    if size != HASH_SIZES[0] {
        return Err(AddressError::UnsupportedHashSize(size * 8));
    }
    Ok((script_type, hash.to_vec()))
}

pub(super) fn encode(
    script_type: ScriptType,
    payload: &[u8],
    prefix: &str,
) -> Result<String, AddressError> {
    let kind = match script_type {
        ScriptType::P2pkh => TYPE_P2PKH,
        ScriptType::P2sh => TYPE_P2SH,
        other => {
            return Err(AddressError::UnsupportedAddressFamily(format!(
                "{} has no cashaddr form",
                other
            )))
        }
    };
    let size_bits = HASH_SIZES
        .iter()
        .position(|&len| len == payload.len())
        .ok_or(AddressError::UnsupportedHashSize(payload.len() * 8))?;

    let mut data = Vec::with_capacity(payload.len() + 1);
    data.push((kind << 3) | size_bits as u8);
    data.extend_from_slice(payload);
    cashaddr::encode(prefix, &data).map_err(primitives_error)
}
