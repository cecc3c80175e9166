//! Externally produced signatures and their on-chain encoding.

use utxo_primitives::ec::Signature;
use utxo_script::ScriptType;

use crate::sighash::SighashAlgorithm;
use crate::TransactionError;

const SCHNORR_LEN: usize = 64;

/// A signature returned by the signer for one input's digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSignature {
    /// Strict DER ECDSA signature without a sighash flag byte.
    Der(Vec<u8>),
    /// ECDSA signature as raw `r || s`.
    RawEcdsa([u8; 64]),
    /// BIP340 signature. Key-path digests commit to `SIGHASH_DEFAULT`, so
    /// only the bare 64-byte form is accepted; a 65-byte signature's trailing
    /// byte must match the committed sighash type, which it never does here.
    Schnorr(Vec<u8>),
}

impl InputSignature {
    /// Produce the bytes pushed into the scriptSig or witness.
    ///
    /// ECDSA signatures are parsed, low-S normalized, re-encoded as DER and
    /// suffixed with the algorithm's flag byte. Schnorr signatures are only
    /// accepted for `p2tr` inputs and are used as given once their sighash
    /// byte, if any, agrees with the digest that was signed.
    pub(crate) fn encode(
        &self,
        script_type: ScriptType,
        algorithm: SighashAlgorithm,
    ) -> Result<Vec<u8>, TransactionError> {
        match (self, script_type) {
            (InputSignature::Schnorr(bytes), ScriptType::P2tr) => {
                match bytes.len() {
                    SCHNORR_LEN => Ok(bytes.clone()),
                    65 => {
                        let flag = bytes[SCHNORR_LEN];
                        // An explicit 0x00 is never valid and a non-zero byte
                        // must name the sighash type the digest committed to.
                        match algorithm.signature_flag() {
                            Some(committed) if flag != 0 && flag == committed => Ok(bytes.clone()),
                            _ => Err(malformed(&format!(
                                "schnorr sighash byte {:#04x} does not match the signed {:?} digest",
                                flag, algorithm
                            ))),
                        }
                    }
                    n => Err(malformed(&format!("schnorr signature must be 64 or 65 bytes, got {}", n))),
                }
            }
            (InputSignature::Schnorr(_), other) => {
                Err(malformed(&format!("schnorr signature cannot spend a {} input", other)))
            }
            (_, ScriptType::P2tr) => Err(malformed("taproot key path requires a schnorr signature")),
            (InputSignature::Der(bytes), _) => {
                let sig = Signature::from_der(bytes).map_err(|e| malformed(&e.to_string()))?;
                Ok(with_flag(sig, algorithm))
            }
            (InputSignature::RawEcdsa(bytes), _) => {
                let sig = Signature::from_compact(bytes).map_err(|e| malformed(&e.to_string()))?;
                Ok(with_flag(sig, algorithm))
            }
        }
    }
}

fn with_flag(sig: Signature, algorithm: SighashAlgorithm) -> Vec<u8> {
    let mut out = sig.to_der();
    if let Some(flag) = algorithm.signature_flag() {
        out.push(flag);
    }
    out
}

fn malformed(msg: &str) -> TransactionError {
    TransactionError::MalformedSignatureEncoding(msg.to_string())
}
