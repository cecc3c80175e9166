#![deny(missing_docs)]

//! UTXO SDK - address decoding and transaction assembly across chains.
//!
//! Re-exports the component crates for convenient single-crate usage.

pub use utxo_primitives as primitives;
pub use utxo_script as script;
pub use utxo_transaction as transaction;
