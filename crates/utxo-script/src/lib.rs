//! Network parameters, address decoding and locking script construction.
//!
//! Turns a human-readable address into the exact output script bytes a
//! chain's consensus rules expect, for Base58Check, Bech32 (segwit v0),
//! Bech32m (taproot), CashAddr and Kaspa address families.

pub mod opcodes;
pub mod chunk;
pub mod script;
pub mod script_type;
pub mod network;
pub mod address;
pub mod locking;

mod error;
pub use error::{AddressError, ScriptError};
pub use script::Script;
pub use chunk::ScriptChunk;
pub use script_type::{PubKeyScheme, ScriptType};
pub use network::{AddressFamily, NetworkParameters, NetworkRegistry, TransactionFormat};
pub use address::{AddressDecoder, DecodedAddress};
pub use locking::{single_key_redeem_script, LockingScript, LockingScriptBuilder};
