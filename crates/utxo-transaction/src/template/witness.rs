//! Witness templates: P2WPKH, single-key P2WSH and taproot key path.
//!
//! These leave the scriptSig empty and place the signature on the witness
//! stack.

use utxo_primitives::util::VarInt;
use utxo_script::Script;

use crate::template::{Unlocking, UnlockingScriptTemplate, UnlockingSize, ECDSA_SIG_ESTIMATE};
use crate::TransactionError;

const SCHNORR_SIG_LEN: usize = 64;

/// Serialized size of a witness stack with items of the given lengths.
fn stack_len(items: &[usize]) -> usize {
    VarInt::from(items.len()).length()
        + items
            .iter()
            .map(|len| VarInt::from(*len).length() + len)
            .sum::<usize>()
}

fn witness_only(witness: Vec<Vec<u8>>) -> Unlocking {
    Unlocking {
        script_sig: Script::new(),
        witness,
    }
}

/// Witness `[sig, compressed pubkey]`.
pub struct P2wpkh {
    public_key: Vec<u8>,
}

impl P2wpkh {
    pub fn new(public_key: Vec<u8>) -> Self {
        P2wpkh { public_key }
    }
}

impl UnlockingScriptTemplate for P2wpkh {
    fn unlock(&self, signature: &[u8]) -> Result<Unlocking, TransactionError> {
        Ok(witness_only(vec![signature.to_vec(), self.public_key.clone()]))
    }

    fn estimate_length(&self) -> UnlockingSize {
        UnlockingSize {
            script_sig: 0,
            witness: stack_len(&[ECDSA_SIG_ESTIMATE, self.public_key.len()]),
        }
    }
}

/// Witness `[sig, witness script]`.
pub struct P2wsh {
    witness_script: Script,
}

impl P2wsh {
    pub fn new(witness_script: Script) -> Self {
        P2wsh { witness_script }
    }
}

impl UnlockingScriptTemplate for P2wsh {
    fn unlock(&self, signature: &[u8]) -> Result<Unlocking, TransactionError> {
        Ok(witness_only(vec![
            signature.to_vec(),
            self.witness_script.as_bytes().to_vec(),
        ]))
    }

    fn estimate_length(&self) -> UnlockingSize {
        UnlockingSize {
            script_sig: 0,
            witness: stack_len(&[ECDSA_SIG_ESTIMATE, self.witness_script.len()]),
        }
    }
}

/// Taproot key-path spend: witness `[schnorr sig]`.
pub struct P2trKeyPath;

impl UnlockingScriptTemplate for P2trKeyPath {
    fn unlock(&self, signature: &[u8]) -> Result<Unlocking, TransactionError> {
        Ok(witness_only(vec![signature.to_vec()]))
    }

    fn estimate_length(&self) -> UnlockingSize {
        UnlockingSize {
            script_sig: 0,
            witness: stack_len(&[SCHNORR_SIG_LEN]),
        }
    }
}
