/// Failures from the primitives layer.
///
/// Address and transaction crates wrap this with `#[from]`, so every variant
/// names the input that was wrong rather than the caller's operation.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// Not a valid SEC1 point on secp256k1.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// ECDSA signature bytes that are neither valid DER nor a valid `r || s` pair.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A Base58Check, Bech32 or CashAddr checksum did not verify.
    #[error("checksum does not match payload")]
    ChecksumMismatch,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A hash or txid of the wrong length.
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid base58 string: {0}")]
    InvalidBase58(String),

    /// Bad separator, character or padding in a Bech32 or CashAddr data part.
    #[error("invalid address data part: {0}")]
    InvalidDataPart(String),

    #[error("compact size does not fit in usize")]
    VarIntTooLarge,

    /// A reader ran out of bytes before the field it was reading ended.
    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
