/// UTXO transaction assembly: selection, sighash digests and serialization.
///
/// Provides the reservation arena for spendable outputs, the wire types for
/// legacy and segwit transactions, per-script-type sighash algorithms, and
/// the `TransactionBuilder` state machine that ties them together around an
/// external signer.

pub mod builder;
pub mod config;
pub mod input;
pub mod output;
pub mod sighash;
pub mod signature;
pub mod template;
pub mod transaction;
pub mod utxo;

mod error;
mod selection;
pub use builder::{BuilderState, SighashPreimage, TransactionBuilder};
pub use config::{BuilderConfig, DustPolicy, InputOrdering, SelectionStrategy};
pub use error::TransactionError;
pub use input::{OutPoint, TransactionInput};
pub use output::TransactionOutput;
pub use sighash::SighashAlgorithm;
pub use signature::InputSignature;
pub use transaction::Transaction;
pub use utxo::{Reservation, ReservationId, SlotStatus, UnspentOutput, UtxoSet};
