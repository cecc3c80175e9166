//! ECDSA signature encoding.
//!
//! Signers hand back either DER or a raw 64-byte `r || s` pair. Script
//! consensus wants strict DER with a low S value, so both inputs are parsed
//! into [`Signature`] and re-encoded through [`Signature::to_der`].

use k256::ecdsa;
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar};

use crate::PrimitivesError;

/// An ECDSA signature with R and S components (32 bytes each, big-endian).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Build a signature from a raw 64-byte `r || s` encoding.
    ///
    /// # Returns
    /// `Ok(Signature)` when both halves are in `[1, n)`, otherwise
    /// `InvalidSignature`.
    pub fn from_compact(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != 64 {
            return Err(PrimitivesError::InvalidSignature(format!(
                "raw signature must be 64 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        let sig = Signature { r, s };
        sig.validate()?;
        Ok(sig)
    }

    /// Parse a strict DER signature: `0x30 len 0x02 rlen r 0x02 slen s`.
    ///
    /// Trailing bytes after the DER structure are rejected; the caller strips
    /// any sighash flag first.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let malformed = |msg: &str| PrimitivesError::InvalidSignature(format!("malformed DER: {}", msg));

        if bytes.len() < 8 || bytes.len() > 72 {
            return Err(malformed("bad length"));
        }
        if bytes[0] != 0x30 {
            return Err(malformed("no sequence marker"));
        }
        if usize::from(bytes[1]) != bytes.len() - 2 {
            return Err(malformed("sequence length does not match"));
        }

        let (r, rest) = read_der_int(&bytes[2..]).ok_or_else(|| malformed("bad R"))?;
        let (s, rest) = read_der_int(rest).ok_or_else(|| malformed("bad S"))?;
        if !rest.is_empty() {
            return Err(malformed("trailing bytes"));
        }

        let sig = Signature { r, s };
        sig.validate()?;
        Ok(sig)
    }

    /// The R component.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The S component as stored (not normalized).
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Whether S lies in the upper half of the curve order.
    pub fn has_high_s(&self) -> bool {
        self.s_scalar().map(|s| bool::from(s.is_high())).unwrap_or(false)
    }

    /// Return a copy with S replaced by `n - S` when S is high (BIP62).
    pub fn normalize_s(&self) -> Self {
        match self.s_scalar() {
            Some(s) if bool::from(s.is_high()) => Signature {
                r: self.r,
                s: (-s).to_bytes().into(),
            },
            _ => self.clone(),
        }
    }

    /// Serialize as strict DER with low-S normalization.
    pub fn to_der(&self) -> Vec<u8> {
        let normalized = self.normalize_s();
        let r = der_int(&normalized.r);
        let s = der_int(&normalized.s);

        let mut out = Vec::with_capacity(6 + r.len() + s.len());
        out.push(0x30);
        out.push((4 + r.len() + s.len()) as u8);
        out.push(0x02);
        out.push(r.len() as u8);
        out.extend_from_slice(&r);
        out.push(0x02);
        out.push(s.len() as u8);
        out.extend_from_slice(&s);
        out
    }

    /// Convert to a k256 signature (low-S) for verification.
    pub(crate) fn to_k256(&self) -> Result<ecdsa::Signature, PrimitivesError> {
        let normalized = self.normalize_s();
        ecdsa::Signature::from_scalars(FieldBytes::from(normalized.r), FieldBytes::from(normalized.s))
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))
    }

    fn s_scalar(&self) -> Option<Scalar> {
        Option::from(Scalar::from_repr(FieldBytes::from(self.s)))
    }

    fn validate(&self) -> Result<(), PrimitivesError> {
        for (name, half) in [("R", &self.r), ("S", &self.s)] {
            let scalar: Option<Scalar> = Option::from(Scalar::from_repr(FieldBytes::from(*half)));
            match scalar {
                Some(v) if !bool::from(v.is_zero()) => {}
                _ => {
                    return Err(PrimitivesError::InvalidSignature(format!(
                        "signature {} is zero or not below the curve order",
                        name
                    )))
                }
            }
        }
        Ok(())
    }
}

/// Minimal big-endian DER integer: leading zeros stripped, 0x00 prepended
/// when the high bit would otherwise mark it negative.
fn der_int(value: &[u8; 32]) -> Vec<u8> {
    let start = value.iter().position(|&b| b != 0).unwrap_or(31);
    let trimmed = &value[start..];
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

/// Read one `0x02 len value` integer, enforcing minimal encoding.
fn read_der_int(data: &[u8]) -> Option<([u8; 32], &[u8])> {
    if data.len() < 2 || data[0] != 0x02 {
        return None;
    }
    let len = usize::from(data[1]);
    if len == 0 || data.len() < 2 + len {
        return None;
    }
    let value = &data[2..2 + len];
    // Negative numbers and superfluous leading zeros are not strict DER.
    if value[0] & 0x80 != 0 {
        return None;
    }
    if len > 1 && value[0] == 0 && value[1] & 0x80 == 0 {
        return None;
    }
    let digits = if value[0] == 0 { &value[1..] } else { value };
    if digits.len() > 32 {
        return None;
    }
    let mut out = [0u8; 32];
    out[32 - digits.len()..].copy_from_slice(digits);
    Some((out, &data[2 + len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// R has a leading zero byte, so its DER integer is 31 bytes long.
    #[test]
    fn test_compact_to_der_short_r() {
        let raw = hex::decode("00325BF907137BB6ED0A84D78C12F9680DD57AE374F45D43CDC7068ABF56F5B93C08BC1F9CD1E91E7A496DA2ECD54597B11AE0DDA4F6672235853C0CEF6BF8B4").unwrap();
        let sig = Signature::from_compact(&raw).unwrap();
        assert_eq!(
            hex::encode_upper(sig.to_der()),
            "3043021F325BF907137BB6ED0A84D78C12F9680DD57AE374F45D43CDC7068ABF56F5B902203C08BC1F9CD1E91E7A496DA2ECD54597B11AE0DDA4F6672235853C0CEF6BF8B4"
        );
    }

    /// R has its high bit set, so a 0x00 pad byte is added.
    #[test]
    fn test_compact_to_der_padded_r() {
        let raw = hex::decode("ED59AEECB1AC0BAF31B6D84BB51C060DBBC3E0321EEEE6FADEBF073099629A9A7247306451FD78488B1AAE38391DA6CAA72B52D2E6D9359F9C682EFCBF388B07").unwrap();
        let der = Signature::from_compact(&raw).unwrap().to_der();
        assert_eq!(
            hex::encode_upper(&der),
            "3045022100ED59AEECB1AC0BAF31B6D84BB51C060DBBC3E0321EEEE6FADEBF073099629A9A02207247306451FD78488B1AAE38391DA6CAA72B52D2E6D9359F9C682EFCBF388B07"
        );
        assert_eq!(Signature::from_der(&der).unwrap(), Signature::from_compact(&raw).unwrap());
    }

    #[test]
    fn test_high_s_is_normalized() {
        // s = n - 1 is high; its low counterpart is 1.
        let mut raw = [0u8; 64];
        raw[31] = 0x01;
        raw[32..].copy_from_slice(
            &hex::decode("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364140").unwrap(),
        );
        let sig = Signature::from_compact(&raw).unwrap();
        assert!(sig.has_high_s());
        assert_eq!(hex::encode(sig.to_der()), "3006020101020101");
        assert!(!sig.normalize_s().has_high_s());
    }

    #[test]
    fn test_rejects_zero_and_overflowing_scalars() {
        assert!(Signature::from_compact(&[0u8; 64]).is_err());
        let mut raw = [0xffu8; 64];
        raw[0] = 0x01;
        assert!(Signature::from_compact(&raw).is_err());
        assert!(Signature::from_compact(&[1u8; 63]).is_err());
    }

    #[test]
    fn test_from_der_rejects_malformed() {
        // Wrong sequence marker.
        assert!(Signature::from_der(&hex::decode("3106020101020101").unwrap()).is_err());
        // Length byte disagrees with the buffer.
        assert!(Signature::from_der(&hex::decode("3007020101020101").unwrap()).is_err());
        // Superfluous leading zero in R.
        assert!(Signature::from_der(&hex::decode("300702020001020101").unwrap()).is_err());
        // Trailing sighash byte left attached.
        assert!(Signature::from_der(&hex::decode("300602010102010101").unwrap()).is_err());
    }
}
