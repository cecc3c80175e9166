use crate::builder::BuilderState;
use crate::input::OutPoint;

/// Error types for UTXO selection, transaction assembly and serialization.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The available outputs cannot cover the spend plus fee.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: u64, available: u64 },

    /// The change left over after the spend is below the chain's dust threshold.
    #[error("change of {change} is below the dust threshold of {dust}")]
    ChangeBelowDust { change: u64, dust: u64 },

    /// The requested spend amount is itself below the dust threshold.
    #[error("amount of {amount} is below the dust threshold of {dust}")]
    AmountBelowDust { amount: u64, dust: u64 },

    /// A signature's encoding does not fit the input it was attached to.
    #[error("malformed signature encoding: {0}")]
    MalformedSignatureEncoding(String),

    /// Selected input value does not cover outputs plus fee.
    #[error("inputs total {inputs}, outputs total {outputs} with fee {fee}")]
    InputOutputValueMismatch { inputs: u64, outputs: u64, fee: u64 },

    /// The selected input values do not fit in a 64-bit total.
    #[error("input values overflow a 64-bit total")]
    ValueOverflow,

    /// A builder step was called out of order.
    #[error("cannot {operation} while builder is {state}")]
    InvalidState {
        operation: &'static str,
        state: BuilderState,
    },

    #[error("input index {index} out of range ({count} inputs)")]
    InputIndexOutOfRange { index: usize, count: usize },

    /// Spent-output context does not line up with the transaction's inputs.
    #[error("{spent} spent outputs supplied for {inputs} inputs")]
    SpentOutputCount { inputs: usize, spent: usize },

    #[error("unsupported sighash type {0:#x}")]
    UnsupportedSighashType(u32),

    /// Serialization was requested before every input was signed.
    #[error("input {0} has no signature")]
    MissingSignature(usize),

    #[error("unknown outpoint {0}")]
    UnknownOutpoint(OutPoint),

    /// The outpoint is reserved by another build or already spent.
    #[error("outpoint {0} is not available")]
    OutpointUnavailable(OutPoint),

    /// The output being spent is not locked to the builder's public key.
    #[error("input {0} is not locked to the sender's public key")]
    PublicKeyMismatch(usize),

    /// A script-hash output was selected without its redeem script.
    #[error("input {0} spends a script hash but carries no redeem script")]
    MissingRedeemScript(usize),

    #[error("unsupported network for transaction building: {0}")]
    UnsupportedNetwork(String),

    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("script error: {0}")]
    Script(#[from] utxo_script::ScriptError),

    #[error("address error: {0}")]
    Address(#[from] utxo_script::AddressError),

    #[error("primitives error: {0}")]
    Primitives(#[from] utxo_primitives::PrimitivesError),
}
