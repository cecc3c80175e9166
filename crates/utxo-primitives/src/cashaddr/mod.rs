//! CashAddr checksum engine.
//!
//! CashAddr (Bitcoin Cash) and Kaspa addresses share this layout: a prefix,
//! a `:` separator, then base32 data ending in an 8-group (40-bit) BCH
//! checksum. The checksum covers the low five bits of every prefix
//! character, a zero separator group, and the data groups.

use crate::bech32::{charset_index, convert_bits, normalize_case, CHARSET};
use crate::PrimitivesError;

/// Number of 5-bit checksum groups at the end of a CashAddr payload.
const CHECKSUM_LEN: usize = 8;

const GENERATOR: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470,
];

/// Compute the 40-bit CashAddr polymod over 5-bit values.
///
/// A correctly checksummed sequence yields 0.
pub fn polymod(values: impl Iterator<Item = u8>) -> u64 {
    let mut c: u64 = 1;
    for d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (c0 >> i) & 1 == 1 {
                c ^= g;
            }
        }
    }
    c ^ 1
}

fn prefix_values(prefix: &str) -> impl Iterator<Item = u8> + '_ {
    prefix
        .bytes()
        .map(|b| b & 0x1f)
        .chain(std::iter::once(0))
}

/// A checksum-verified CashAddr string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashAddrData {
    /// The prefix the checksum was verified against (lowercase).
    pub prefix: String,
    /// Whether the prefix was written out in the input string.
    pub explicit_prefix: bool,
    /// The payload as 8-bit bytes: version byte followed by the hash or key.
    pub payload: Vec<u8>,
}

/// Decode and verify a CashAddr-style string.
///
/// When the string carries no `prefix:` part, `default_prefix` is used for
/// checksum verification.
///
/// # Returns
/// The verified prefix and 8-bit payload, `ChecksumMismatch` when the
/// polymod is non-zero, or `InvalidDataPart` for bad characters or padding.
pub fn decode(s: &str, default_prefix: &str) -> Result<CashAddrData, PrimitivesError> {
    let lower = normalize_case(s)?;
    let (prefix, body, explicit_prefix) = match lower.split_once(':') {
        Some((p, b)) => (p.to_string(), b, true),
        None => (default_prefix.to_ascii_lowercase(), lower.as_str(), false),
    };
    if prefix.is_empty() || body.len() <= CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidDataPart(
            "missing prefix or payload".to_string(),
        ));
    }

    let data = body
        .bytes()
        .map(|c| {
            charset_index(c).ok_or_else(|| {
                PrimitivesError::InvalidDataPart(format!("invalid character '{}'", c as char))
            })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if polymod(prefix_values(&prefix).chain(data.iter().copied())) != 0 {
        return Err(PrimitivesError::ChecksumMismatch);
    }

    let payload = convert_bits(&data[..data.len() - CHECKSUM_LEN], 5, 8, false)?;
    Ok(CashAddrData {
        prefix,
        explicit_prefix,
        payload,
    })
}

/// Encode an 8-bit payload (version byte + hash or key) under `prefix`.
///
/// # Returns
/// The full `prefix:payload` string in lowercase.
pub fn encode(prefix: &str, payload: &[u8]) -> Result<String, PrimitivesError> {
    let data = convert_bits(payload, 8, 5, true)?;
    let checksum = polymod(
        prefix_values(prefix)
            .chain(data.iter().copied())
            .chain(std::iter::repeat(0).take(CHECKSUM_LEN)),
    );

    let mut out = String::with_capacity(prefix.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(prefix);
    out.push(':');
    for &d in &data {
        out.push(CHARSET[usize::from(d)] as char);
    }
    for i in 0..CHECKSUM_LEN {
        let group = (checksum >> (5 * (CHECKSUM_LEN - 1 - i))) & 0x1f;
        out.push(CHARSET[group as usize] as char);
    }
    Ok(out)
}
