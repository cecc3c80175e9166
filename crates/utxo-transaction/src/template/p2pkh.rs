//! scriptSig templates: P2PKH, single-key P2SH and bare P2PK.
//!
//! P2PKH unlocks with `<sig> <pubkey>`, P2SH with `<sig> <redeem script>`
//! and P2PK with `<sig>` alone.

use utxo_script::chunk::push_data_prefix;
use utxo_script::Script;

use crate::template::{Unlocking, UnlockingScriptTemplate, UnlockingSize, ECDSA_SIG_ESTIMATE};
use crate::TransactionError;

/// Size of `data` once pushed, prefix included.
pub(crate) fn pushed_len(data_len: usize) -> usize {
    push_data_prefix(data_len).map(|p| p.len()).unwrap_or(5) + data_len
}

/// Pay-to-public-key-hash unlocker.
///
/// Holds the key in the serialization the locking script hashed
/// (compressed or uncompressed).
pub struct P2pkh {
    public_key: Vec<u8>,
}

impl P2pkh {
    pub fn new(public_key: Vec<u8>) -> Self {
        P2pkh { public_key }
    }
}

impl UnlockingScriptTemplate for P2pkh {
    fn unlock(&self, signature: &[u8]) -> Result<Unlocking, TransactionError> {
        let mut script_sig = Script::new();
        script_sig.append_push_data(signature)?;
        script_sig.append_push_data(&self.public_key)?;
        Ok(Unlocking {
            script_sig,
            witness: Vec::new(),
        })
    }

    fn estimate_length(&self) -> UnlockingSize {
        UnlockingSize {
            script_sig: 1 + ECDSA_SIG_ESTIMATE + pushed_len(self.public_key.len()),
            witness: 0,
        }
    }
}

/// Pay-to-script-hash unlocker for a single-key redeem script.
pub struct P2sh {
    redeem_script: Script,
}

impl P2sh {
    pub fn new(redeem_script: Script) -> Self {
        P2sh { redeem_script }
    }
}

impl UnlockingScriptTemplate for P2sh {
    fn unlock(&self, signature: &[u8]) -> Result<Unlocking, TransactionError> {
        let mut script_sig = Script::new();
        script_sig.append_push_data(signature)?;
        script_sig.append_push_data(self.redeem_script.as_bytes())?;
        Ok(Unlocking {
            script_sig,
            witness: Vec::new(),
        })
    }

    fn estimate_length(&self) -> UnlockingSize {
        UnlockingSize {
            script_sig: 1 + ECDSA_SIG_ESTIMATE + pushed_len(self.redeem_script.len()),
            witness: 0,
        }
    }
}

/// Bare pay-to-public-key unlocker.
pub struct P2pk;

impl UnlockingScriptTemplate for P2pk {
    fn unlock(&self, signature: &[u8]) -> Result<Unlocking, TransactionError> {
        let mut script_sig = Script::new();
        script_sig.append_push_data(signature)?;
        Ok(Unlocking {
            script_sig,
            witness: Vec::new(),
        })
    }

    fn estimate_length(&self) -> UnlockingSize {
        UnlockingSize {
            script_sig: 1 + ECDSA_SIG_ESTIMATE,
            witness: 0,
        }
    }
}
