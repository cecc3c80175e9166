//! Unlocking templates, one per spendable script type.
//!
//! A template knows where a finished signature goes for its script type:
//! into the scriptSig next to a key or redeem script, or onto a witness
//! stack. Templates also report the expected unlocking size so fees can be
//! estimated before anything is signed.

pub mod p2pkh;
pub mod witness;

use utxo_script::{Script, ScriptType};

use crate::TransactionError;

/// Typical DER signature plus one sighash byte.
pub(crate) const ECDSA_SIG_ESTIMATE: usize = 72;

/// Unlocking data for one input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Unlocking {
    pub script_sig: Script,
    pub witness: Vec<Vec<u8>>,
}

/// Expected unlocking sizes in bytes, used for fee estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnlockingSize {
    /// scriptSig length, excluding its own length prefix.
    pub script_sig: usize,
    /// Full serialized witness stack, item count included. Zero when the
    /// input carries no witness.
    pub witness: usize,
}

/// Trait for templates that place a signature into unlocking data.
pub trait UnlockingScriptTemplate: Send + Sync {
    /// Build the unlocking data around an encoded signature (flag byte
    /// already appended where the algorithm uses one).
    fn unlock(&self, signature: &[u8]) -> Result<Unlocking, TransactionError>;

    /// Estimate the unlocking size before a signature exists.
    fn estimate_length(&self) -> UnlockingSize;
}

/// The key material an input needs to be unlocked, as resolved by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendKey {
    /// Public key serialized the way the locking script hashed it.
    Key(Vec<u8>),
    /// Redeem or witness script for script-hash outputs.
    Redeem(Script),
    /// Nothing beyond the signature (`p2pk`, taproot key path).
    None,
}

/// Pick the template for `script_type`.
pub fn template_for(script_type: ScriptType, key: SpendKey) -> Result<Box<dyn UnlockingScriptTemplate>, TransactionError> {
    let template: Box<dyn UnlockingScriptTemplate> = match (script_type, key) {
        (ScriptType::P2pkh, SpendKey::Key(public_key)) => Box::new(p2pkh::P2pkh::new(public_key)),
        (ScriptType::P2sh, SpendKey::Redeem(redeem)) => Box::new(p2pkh::P2sh::new(redeem)),
        (ScriptType::P2pk(_), SpendKey::None) => Box::new(p2pkh::P2pk),
        (ScriptType::P2wpkh, SpendKey::Key(public_key)) => Box::new(witness::P2wpkh::new(public_key)),
        (ScriptType::P2wsh, SpendKey::Redeem(redeem)) => Box::new(witness::P2wsh::new(redeem)),
        (ScriptType::P2tr, SpendKey::None) => Box::new(witness::P2trKeyPath),
        (script_type, key) => {
            return Err(TransactionError::MalformedSignatureEncoding(format!(
                "no unlocking template for {} with {:?}",
                script_type, key
            )))
        }
    };
    Ok(template)
}
