//! Signature hash computation for transaction signing.
//!
//! Four digest algorithms are in use across the supported chains:
//! - legacy (pre-segwit) sighash for `p2pkh`, `p2sh` and bare `p2pk`,
//! - BIP143 for segwit v0 (`p2wpkh`, `p2wsh`),
//! - BIP143 with the FORKID flag for replay-protected forks (Bitcoin Cash),
//! - BIP341 key path for taproot (`p2tr`).
//!
//! Only whole-transaction signing is produced: `SIGHASH_ALL`, its FORKID
//! form, and `SIGHASH_DEFAULT` for taproot.
//!
//! See <https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki> and
//! <https://github.com/bitcoin/bips/blob/master/bip-0341.mediawiki>.

use serde::{Deserialize, Serialize};
use utxo_primitives::hash::{sha256, sha256d, tagged_hash};
use utxo_primitives::util::ByteWriter;

use crate::output::TransactionOutput;
use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Taproot default: commits to everything, encoded as a 64-byte signature.
pub const SIGHASH_DEFAULT: u32 = 0x00;

/// Sign all inputs and all outputs.
pub const SIGHASH_ALL: u32 = 0x01;

/// Replay-protection flag used by Bitcoin Cash style forks.
pub const SIGHASH_FORKID: u32 = 0x40;

pub const SIGHASH_ALL_FORKID: u32 = SIGHASH_ALL | SIGHASH_FORKID;

const TAP_SIGHASH_TAG: &str = "TapSighash";

/// Digest algorithm used to sign one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SighashAlgorithm {
    Legacy,
    Bip143,
    Bip143ForkId,
    Bip341,
}

impl SighashAlgorithm {
    /// The sighash type committed to in the preimage.
    ///
    /// FORKID chains place the fork id in the upper 24 bits.
    pub fn sighash_type(&self, fork_id: Option<u32>) -> u32 {
        match self {
            SighashAlgorithm::Legacy | SighashAlgorithm::Bip143 => SIGHASH_ALL,
            SighashAlgorithm::Bip143ForkId => (fork_id.unwrap_or(0) << 8) | SIGHASH_ALL_FORKID,
            SighashAlgorithm::Bip341 => SIGHASH_DEFAULT,
        }
    }

    /// The flag byte appended to a signature, if any.
    ///
    /// Taproot `SIGHASH_DEFAULT` signatures carry no flag byte.
    pub fn signature_flag(&self) -> Option<u8> {
        match self {
            SighashAlgorithm::Legacy | SighashAlgorithm::Bip143 => Some(SIGHASH_ALL as u8),
            SighashAlgorithm::Bip143ForkId => Some(SIGHASH_ALL_FORKID as u8),
            SighashAlgorithm::Bip341 => None,
        }
    }

    /// Hash a preimage produced by [`calc_preimage`] into the 32-byte digest
    /// handed to the signer.
    pub fn digest(&self, preimage: &[u8]) -> [u8; 32] {
        match self {
            SighashAlgorithm::Bip341 => tagged_hash(TAP_SIGHASH_TAG, &[preimage]),
            _ => sha256d(preimage),
        }
    }
}

/// Compute the preimage bytes for one input.
///
/// # Arguments
/// * `tx` - The unsigned transaction.
/// * `input_index` - Index of the input being signed.
/// * `algorithm` - Digest algorithm for the input's script type.
/// * `script_code` - Script substituted for the input: the previous locking
///   script, a redeem/witness script, or the implied `p2pkh` script for
///   `p2wpkh`. Ignored by BIP341.
/// * `spent_outputs` - The outputs being spent, one per input, in input order.
/// * `sighash_type` - Must match what [`SighashAlgorithm::sighash_type`] returns.
///
/// # Returns
/// The raw preimage, not yet hashed.
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    algorithm: SighashAlgorithm,
    script_code: &[u8],
    spent_outputs: &[TransactionOutput],
    sighash_type: u32,
) -> Result<Vec<u8>, TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InputIndexOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        });
    }
    if spent_outputs.len() != tx.inputs.len() {
        return Err(TransactionError::SpentOutputCount {
            inputs: tx.inputs.len(),
            spent: spent_outputs.len(),
        });
    }

    match algorithm {
        SighashAlgorithm::Legacy => {
            expect_type(sighash_type, sighash_type == SIGHASH_ALL)?;
            Ok(legacy_preimage(tx, input_index, script_code, sighash_type))
        }
        SighashAlgorithm::Bip143 => {
            expect_type(sighash_type, sighash_type == SIGHASH_ALL)?;
            Ok(bip143_preimage(tx, input_index, script_code, spent_outputs[input_index].value, sighash_type))
        }
        SighashAlgorithm::Bip143ForkId => {
            expect_type(sighash_type, sighash_type & 0xff == SIGHASH_ALL_FORKID)?;
            Ok(bip143_preimage(tx, input_index, script_code, spent_outputs[input_index].value, sighash_type))
        }
        SighashAlgorithm::Bip341 => {
            expect_type(sighash_type, sighash_type == SIGHASH_DEFAULT || sighash_type == SIGHASH_ALL)?;
            Ok(bip341_preimage(tx, input_index, spent_outputs, sighash_type as u8))
        }
    }
}

fn expect_type(sighash_type: u32, supported: bool) -> Result<(), TransactionError> {
    if supported {
        Ok(())
    } else {
        Err(TransactionError::UnsupportedSighashType(sighash_type))
    }
}

// -----------------------------------------------------------------------
// Legacy
// -----------------------------------------------------------------------

/// Original sighash: the whole transaction with the signed input's script
/// replaced by `script_code`, every other input's script blanked, and the
/// 4-byte sighash type appended.
fn legacy_preimage(tx: &Transaction, input_index: usize, script_code: &[u8], sighash_type: u32) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(256);
    writer.write_u32_le(tx.version);

    writer.write_varint(tx.inputs.len().into());
    for (i, input) in tx.inputs.iter().enumerate() {
        let script: &[u8] = if i == input_index { script_code } else { &[] };
        input.write_with_script(&mut writer, script);
    }

    writer.write_varint(tx.outputs.len().into());
    for output in &tx.outputs {
        output.write_to(&mut writer);
    }

    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);
    writer.into_bytes()
}

// -----------------------------------------------------------------------
// BIP143
// -----------------------------------------------------------------------

/// BIP143 preimage, shared by segwit v0 and FORKID chains:
///
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes)
/// 3. hashSequence (32 bytes)
/// 4. outpoint (32+4 bytes)
/// 5. scriptCode (varint + script)
/// 6. value (8 bytes LE)
/// 7. nSequence (4 bytes LE)
/// 8. hashOutputs (32 bytes)
/// 9. nLocktime (4 bytes LE)
/// 10. sighash type (4 bytes LE)
fn bip143_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    value: u64,
    sighash_type: u32,
) -> Vec<u8> {
    let input = &tx.inputs[input_index];

    let mut writer = ByteWriter::with_capacity(156 + script_code.len());
    writer.write_u32_le(tx.version);
    writer.write_bytes(&sha256d(&prevouts_bytes(tx)));
    writer.write_bytes(&sha256d(&sequences_bytes(tx)));
    input.previous_output.write_to(&mut writer);
    writer.write_var_bytes(script_code);
    writer.write_u64_le(value);
    writer.write_u32_le(input.sequence);
    writer.write_bytes(&sha256d(&outputs_bytes(tx)));
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);
    writer.into_bytes()
}

// -----------------------------------------------------------------------
// BIP341
// -----------------------------------------------------------------------

/// BIP341 `SigMsg` for a key-path spend with no annex, prefixed by the
/// zero epoch byte. The digest is `TapSighash(preimage)`.
fn bip341_preimage(tx: &Transaction, input_index: usize, spent_outputs: &[TransactionOutput], hash_type: u8) -> Vec<u8> {
    let mut amounts = ByteWriter::with_capacity(spent_outputs.len() * 8);
    let mut scripts = ByteWriter::new();
    for spent in spent_outputs {
        amounts.write_u64_le(spent.value);
        scripts.write_var_bytes(spent.locking_script.as_bytes());
    }

    let mut writer = ByteWriter::with_capacity(175);
    writer.write_u8(0x00); // epoch
    writer.write_u8(hash_type);
    writer.write_u32_le(tx.version);
    writer.write_u32_le(tx.lock_time);
    writer.write_bytes(&sha256(&prevouts_bytes(tx)));
    writer.write_bytes(&sha256(amounts.as_bytes()));
    writer.write_bytes(&sha256(scripts.as_bytes()));
    writer.write_bytes(&sha256(&sequences_bytes(tx)));
    writer.write_bytes(&sha256(&outputs_bytes(tx)));
    writer.write_u8(0x00); // spend type: key path, no annex
    writer.write_u32_le(input_index as u32);
    writer.into_bytes()
}

// -----------------------------------------------------------------------
// Internal helper functions
// -----------------------------------------------------------------------

/// All outpoints concatenated, txid (32 bytes) + vout (4 bytes LE) each.
fn prevouts_bytes(tx: &Transaction) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        input.previous_output.write_to(&mut writer);
    }
    writer.into_bytes()
}

fn sequences_bytes(tx: &Transaction) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence);
    }
    writer.into_bytes()
}

fn outputs_bytes(tx: &Transaction) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    for output in &tx.outputs {
        output.write_to(&mut writer);
    }
    writer.into_bytes()
}
