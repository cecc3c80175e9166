//! Bech32 (BIP173) and Bech32m (BIP350) strings.
//!
//! Parsing, case rules and checksum arithmetic come from the `bech32` crate;
//! this module reports which of the two constants a string verified against
//! and hands back raw 5-bit groups, leaving witness version and program
//! splitting to the address layer. [`convert_bits`] and [`CHARSET`] are
//! shared with the CashAddr engine, which uses the same alphabet.

use ::bech32::primitives::decode::UncheckedHrpstring;
use ::bech32::primitives::iter::Fe32IterExt;
use ::bech32::{Fe32, Hrp};

use crate::PrimitivesError;

/// The 32-character base32 alphabet used by Bech32, Bech32m and CashAddr.
pub const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Number of 5-bit checksum groups at the end of a Bech32 string.
const CHECKSUM_LEN: usize = 6;

/// Upper bound on the total string length (BIP173).
const MAX_LEN: usize = 90;

/// Checksum flavour, distinguished by the constant the polymod must equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// BIP173, used by witness version 0.
    Bech32,
    /// BIP350, used by witness versions 1 through 16.
    Bech32m,
}

/// A checksum-verified Bech32 string split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32Data {
    /// Lowercased human-readable part.
    pub hrp: String,
    /// 5-bit data groups with the checksum stripped.
    pub data: Vec<u8>,
    /// Which checksum constant the string verified against.
    pub variant: Variant,
}

/// Map a base32 character to its 5-bit value.
pub(crate) fn charset_index(c: u8) -> Option<u8> {
    CHARSET.iter().position(|&x| x == c).map(|i| i as u8)
}

/// Reject strings that mix upper and lower case, then lowercase them.
pub(crate) fn normalize_case(s: &str) -> Result<String, PrimitivesError> {
    let has_lower = s.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = s.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(PrimitivesError::InvalidDataPart("mixed case".to_string()));
    }
    Ok(s.to_ascii_lowercase())
}

/// Decode and verify a Bech32 or Bech32m string.
///
/// # Arguments
/// * `s` - The full string, e.g. `bc1q...`.
///
/// # Returns
/// The lowercased HRP, the 5-bit payload and the matching variant, or
/// `ChecksumMismatch` when the polymod matches neither constant and
/// `InvalidDataPart` for structural problems.
pub fn decode(s: &str) -> Result<Bech32Data, PrimitivesError> {
    if s.len() > MAX_LEN {
        return Err(PrimitivesError::InvalidDataPart(format!(
            "string length {} exceeds {}",
            s.len(),
            MAX_LEN
        )));
    }
    let unchecked = UncheckedHrpstring::new(s).map_err(|e| PrimitivesError::InvalidDataPart(e.to_string()))?;
    let ascii = unchecked.data_part_ascii();
    if ascii.len() < CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidDataPart(
            "data part shorter than the checksum".to_string(),
        ));
    }

    let variant = if unchecked.has_valid_checksum::<::bech32::Bech32>() {
        Variant::Bech32
    } else if unchecked.has_valid_checksum::<::bech32::Bech32m>() {
        Variant::Bech32m
    } else {
        return Err(PrimitivesError::ChecksumMismatch);
    };

    let data = ascii[..ascii.len() - CHECKSUM_LEN]
        .iter()
        .map(|&c| {
            charset_index(c.to_ascii_lowercase()).ok_or_else(|| {
                PrimitivesError::InvalidDataPart(format!("invalid character '{}'", c as char))
            })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(Bech32Data {
        hrp: unchecked.hrp().to_lowercase(),
        data,
        variant,
    })
}

/// Encode 5-bit groups under `hrp` with the given checksum variant.
///
/// The output is lowercase. Fails on an invalid HRP or a group above 31.
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String, PrimitivesError> {
    let hrp = Hrp::parse(hrp).map_err(|e| PrimitivesError::InvalidDataPart(e.to_string()))?;
    let groups = data
        .iter()
        .map(|&d| Fe32::try_from(d))
        .collect::<Result<Vec<Fe32>, _>>()
        .map_err(|e| PrimitivesError::InvalidDataPart(e.to_string()))?;

    let encoded: String = match variant {
        Variant::Bech32 => groups.into_iter().with_checksum::<::bech32::Bech32>(&hrp).chars().collect(),
        Variant::Bech32m => groups.into_iter().with_checksum::<::bech32::Bech32m>(&hrp).chars().collect(),
    };
    Ok(encoded)
}

/// Regroup a bit stream between group widths (e.g. 8-bit bytes to 5-bit groups).
///
/// With `pad` set, a trailing partial group is zero-padded. Without it, any
/// leftover must be fewer than `from` bits and all zero, which is the strict
/// rule decoders apply.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, PrimitivesError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_value = (1u32 << to) - 1;
    let max_acc = (1u32 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        if u32::from(value) >> from != 0 {
            return Err(PrimitivesError::InvalidDataPart(format!(
                "value {} does not fit in {} bits",
                value, from
            )));
        }
        acc = ((acc << from) | u32::from(value)) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return Err(PrimitivesError::InvalidDataPart("invalid padding".to_string()));
    }

    Ok(out)
}
