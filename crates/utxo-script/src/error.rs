use crate::script_type::ScriptType;

/// Errors from decoding or encoding an address against a network.
///
/// Every variant is a deterministic rejection of the input; retrying with
/// the same string cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Base58Check or CashAddr-style checksum did not verify.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// The version byte is not configured for this network.
    #[error("unsupported version byte 0x{0:02x}")]
    UnsupportedVersionByte(u8),

    /// Bech32/Bech32m checksum did not verify, or the wrong constant was
    /// used for the witness version.
    #[error("invalid bech32 checksum")]
    InvalidChecksum,

    /// The human-readable part or prefix belongs to another network.
    #[error("wrong human-readable prefix: expected '{expected}', found '{found}'")]
    WrongHrp { expected: String, found: String },

    /// Witness version that this engine cannot build scripts for.
    #[error("unsupported witness version {0}")]
    UnsupportedWitnessVersion(u8),

    /// Witness program length does not fit the witness version.
    #[error("invalid witness program length {length} for version {version}")]
    InvalidProgramLength { version: u8, length: usize },

    /// The address belongs to a family this network does not enable.
    #[error("unsupported address family: {0}")]
    UnsupportedAddressFamily(String),

    /// CashAddr hash size other than 160 bits.
    #[error("unsupported hash size of {0} bits")]
    UnsupportedHashSize(usize),

    /// Structurally invalid text (bad characters, bad padding, wrong length).
    #[error("invalid address encoding: {0}")]
    InvalidEncoding(String),
}

/// Errors from script construction and classification.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// The script family is not enabled for the target chain.
    #[error("script type {script_type} is not supported on {chain}")]
    UnsupportedScriptType { script_type: ScriptType, chain: String },

    /// A hash or key of the wrong size for the script type.
    #[error("{script_type} payload must be {expected} bytes, got {got}")]
    InvalidPayloadLength {
        script_type: ScriptType,
        expected: usize,
        got: usize,
    },

    /// Script bytes match none of the known locking script templates.
    #[error("unrecognized locking script")]
    UnrecognizedScript,

    /// A push announced more bytes than remain in the script.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds the largest encodable length.
    #[error("data too big")]
    DataTooBig,

    /// A push opcode was passed to `append_opcodes`.
    #[error("use append_push_data for push opcodes: 0x{0:02x}")]
    InvalidOpcodeType(u8),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A network table could not be parsed.
    #[error("invalid network configuration: {0}")]
    InvalidConfiguration(String),

    /// Error from the primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] utxo_primitives::PrimitivesError),
}

impl From<serde_json::Error> for ScriptError {
    fn from(e: serde_json::Error) -> Self {
        ScriptError::InvalidConfiguration(e.to_string())
    }
}
