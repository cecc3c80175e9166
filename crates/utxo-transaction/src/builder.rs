//! Transaction assembly state machine.
//!
//! A [`TransactionBuilder`] walks one spend through
//! `Empty → InputsSelected → OutputsAssembled → PreimagesComputed → Signed → Serialized`.
//! Each step checks the current state, so calling them out of order is an
//! `InvalidState` error rather than a silently broken transaction.
//!
//! The builder never sees private keys: it hands out digests and accepts
//! signatures produced elsewhere.

use std::fmt;

use utxo_primitives::ec::PublicKey;
use utxo_primitives::hash::{hash160, sha256};
use utxo_script::opcodes::{OP_CHECKSIG, OP_DATA_20, OP_DUP, OP_EQUALVERIFY, OP_HASH160};
use utxo_script::{
    single_key_redeem_script, DecodedAddress, LockingScript, LockingScriptBuilder, NetworkParameters,
    PubKeyScheme, Script, ScriptError, ScriptType,
};

use crate::config::{BuilderConfig, DustPolicy, InputOrdering};
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::sighash::{self, SighashAlgorithm};
use crate::signature::InputSignature;
use crate::template::{template_for, SpendKey, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::utxo::{Reservation, UnspentOutput, UtxoSet};
use crate::TransactionError;

/// Where a builder is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Empty,
    InputsSelected,
    OutputsAssembled,
    PreimagesComputed,
    Signed,
    Serialized,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuilderState::Empty => "empty",
            BuilderState::InputsSelected => "inputs selected",
            BuilderState::OutputsAssembled => "outputs assembled",
            BuilderState::PreimagesComputed => "preimages computed",
            BuilderState::Signed => "signed",
            BuilderState::Serialized => "serialized",
        };
        f.write_str(name)
    }
}

/// The digest for one input, ready for an external signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SighashPreimage {
    pub input_index: usize,
    pub script_type: ScriptType,
    pub algorithm: SighashAlgorithm,
    /// Bytes that were hashed. For BIP341 this is the epoch-prefixed `SigMsg`.
    pub preimage: Vec<u8>,
    pub digest: [u8; 32],
}

/// A selected output with everything needed to sign for it.
struct ResolvedInput {
    utxo: UnspentOutput,
    script_type: ScriptType,
    algorithm: SighashAlgorithm,
    script_code: Script,
    template: Box<dyn UnlockingScriptTemplate>,
    signed: bool,
}

/// Builds, digests and serializes one spend from a [`UtxoSet`].
///
/// Selected outputs stay reserved for as long as the builder lives.
/// Dropping it releases them; [`commit`](Self::commit) marks them spent.
pub struct TransactionBuilder<'a> {
    network: &'a NetworkParameters,
    public_key: PublicKey,
    config: BuilderConfig,
    state: BuilderState,
    reservation: Option<Reservation<'a>>,
    inputs: Vec<ResolvedInput>,
    amount: u64,
    fee: u64,
    transaction: Option<Transaction>,
}

impl<'a> TransactionBuilder<'a> {
    /// Start a build for `public_key`'s outputs on `network`.
    ///
    /// Kaspa-format chains use a different transaction layout and sighash
    /// and are rejected with `UnsupportedNetwork`.
    pub fn new(
        network: &'a NetworkParameters,
        public_key: PublicKey,
        config: BuilderConfig,
    ) -> Result<Self, TransactionError> {
        if network.is_kaspa() {
            return Err(TransactionError::UnsupportedNetwork(network.id.clone()));
        }
        Ok(TransactionBuilder {
            network,
            public_key,
            config,
            state: BuilderState::Empty,
            reservation: None,
            inputs: Vec::new(),
            amount: 0,
            fee: 0,
            transaction: None,
        })
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// The assembled transaction, once outputs exist. Signed inputs carry
    /// their unlocking data.
    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    /// Outputs being spent, in transaction input order.
    pub fn spent_outputs(&self) -> Vec<&UnspentOutput> {
        self.inputs.iter().map(|i| &i.utxo).collect()
    }

    // -----------------------------------------------------------------
    // Input selection
    // -----------------------------------------------------------------

    /// Reserve outputs from `utxos` covering `amount + fee`.
    ///
    /// Inputs keep being added while the change would fall below the chain's
    /// dust threshold, so a change output can be emitted whenever the set
    /// allows it.
    ///
    /// # Returns
    /// `InsufficientFunds` when the available value falls short, or an error
    /// if a selected output is not spendable by this builder's key. In both
    /// cases nothing stays reserved.
    pub fn select_inputs(&mut self, utxos: &'a UtxoSet, amount: u64, fee: u64) -> Result<(), TransactionError> {
        self.expect_state(BuilderState::Empty, "select inputs")?;
        self.check_amount(amount)?;
        let reservation = utxos.reserve(
            amount.saturating_add(fee),
            self.network.dust_threshold,
            self.config.selection,
        )?;
        self.adopt(reservation, amount, fee)
    }

    /// Reserve exactly `outpoints` for a spend of `amount + fee`.
    pub fn select_outpoints(
        &mut self,
        utxos: &'a UtxoSet,
        outpoints: &[crate::input::OutPoint],
        amount: u64,
        fee: u64,
    ) -> Result<(), TransactionError> {
        self.expect_state(BuilderState::Empty, "select inputs")?;
        self.check_amount(amount)?;
        let reservation = utxos.reserve_outpoints(outpoints)?;
        let required = amount.saturating_add(fee);
        if reservation.total_value() < required {
            return Err(TransactionError::InsufficientFunds {
                required,
                available: reservation.total_value(),
            });
        }
        self.adopt(reservation, amount, fee)
    }

    fn check_amount(&self, amount: u64) -> Result<(), TransactionError> {
        if amount < self.network.dust_threshold {
            return Err(TransactionError::AmountBelowDust {
                amount,
                dust: self.network.dust_threshold,
            });
        }
        Ok(())
    }

    fn adopt(&mut self, reservation: Reservation<'a>, amount: u64, fee: u64) -> Result<(), TransactionError> {
        let inputs = reservation
            .outputs()
            .iter()
            .enumerate()
            .map(|(i, utxo)| self.resolve(i, utxo))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            chain = %self.network.id,
            inputs = inputs.len(),
            total = reservation.total_value(),
            amount,
            fee,
            "builder: inputs selected"
        );
        self.inputs = inputs;
        self.reservation = Some(reservation);
        self.amount = amount;
        self.fee = fee;
        self.state = BuilderState::InputsSelected;
        Ok(())
    }

    /// Work out how `utxo` is unlocked and which digest it signs.
    fn resolve(&self, index: usize, utxo: &UnspentOutput) -> Result<ResolvedInput, TransactionError> {
        let locking = LockingScript::classify(&utxo.locking_script)?;
        let script_type = locking.script_type();
        if !self.network.supports_script_type(script_type) {
            return Err(self.unsupported(script_type));
        }

        let key = &self.public_key;
        let payload = locking.payload();
        let (spend_key, script_code) = match script_type {
            ScriptType::P2pkh => {
                let serialized = if payload == key.hash160() {
                    key.to_compressed().to_vec()
                } else if payload == key.hash160_uncompressed() {
                    key.to_uncompressed().to_vec()
                } else {
                    return Err(TransactionError::PublicKeyMismatch(index));
                };
                (SpendKey::Key(serialized), utxo.locking_script.clone())
            }
            ScriptType::P2wpkh => {
                if payload != key.hash160() {
                    return Err(TransactionError::PublicKeyMismatch(index));
                }
                (SpendKey::Key(key.to_compressed().to_vec()), p2pkh_script_code(payload))
            }
            ScriptType::P2sh | ScriptType::P2wsh => {
                let redeem = utxo
                    .redeem_script
                    .clone()
                    .ok_or(TransactionError::MissingRedeemScript(index))?;
                let commits = if script_type == ScriptType::P2sh {
                    payload == hash160(redeem.as_bytes())
                } else {
                    payload == sha256(redeem.as_bytes())
                };
                if !commits || redeem != single_key_redeem_script(key) {
                    return Err(TransactionError::PublicKeyMismatch(index));
                }
                (SpendKey::Redeem(redeem.clone()), redeem)
            }
            ScriptType::P2tr => {
                if payload != key.taproot_output_key()? {
                    return Err(TransactionError::PublicKeyMismatch(index));
                }
                (SpendKey::None, Script::new())
            }
            ScriptType::P2pk(PubKeyScheme::Ecdsa) => {
                if payload != key.to_compressed() && payload != key.to_uncompressed() {
                    return Err(TransactionError::PublicKeyMismatch(index));
                }
                (SpendKey::None, utxo.locking_script.clone())
            }
            ScriptType::P2pk(PubKeyScheme::Schnorr) => return Err(self.unsupported(script_type)),
        };

        let algorithm = if self.network.fork_id.is_some() {
            SighashAlgorithm::Bip143ForkId
        } else {
            match script_type {
                ScriptType::P2wpkh | ScriptType::P2wsh => SighashAlgorithm::Bip143,
                ScriptType::P2tr => SighashAlgorithm::Bip341,
                _ => SighashAlgorithm::Legacy,
            }
        };

        Ok(ResolvedInput {
            utxo: utxo.clone(),
            script_type,
            algorithm,
            script_code,
            template: template_for(script_type, spend_key)?,
            signed: false,
        })
    }

    fn unsupported(&self, script_type: ScriptType) -> TransactionError {
        ScriptError::UnsupportedScriptType {
            script_type,
            chain: self.network.id.clone(),
        }
        .into()
    }

    // -----------------------------------------------------------------
    // Output assembly
    // -----------------------------------------------------------------

    /// Add the destination output and, when there is any, the change output.
    ///
    /// Change below the dust threshold is rejected or folded into the fee,
    /// per [`DustPolicy`]. With [`InputOrdering::Bip69`] inputs and outputs
    /// are sorted here.
    pub fn assemble_outputs(
        &mut self,
        destination: &DecodedAddress<'_>,
        change: &LockingScript,
    ) -> Result<(), TransactionError> {
        self.expect_state(BuilderState::InputsSelected, "assemble outputs")?;
        if destination.network.id != self.network.id {
            return Err(TransactionError::UnsupportedNetwork(format!(
                "{} address on {}",
                destination.network.id, self.network.id
            )));
        }
        if !self.network.supports_script_type(change.script_type()) {
            return Err(self.unsupported(change.script_type()));
        }
        let destination_script = LockingScriptBuilder::build(destination)?;

        let inputs_total = self
            .inputs
            .iter()
            .try_fold(0u64, |total, i| total.checked_add(i.utxo.value))
            .ok_or(TransactionError::ValueOverflow)?;
        let required = self.amount.saturating_add(self.fee);
        if inputs_total < required {
            return Err(TransactionError::InputOutputValueMismatch {
                inputs: inputs_total,
                outputs: self.amount,
                fee: self.fee,
            });
        }

        let mut outputs = vec![TransactionOutput::new(self.amount, destination_script.into_script())];
        let change_value = inputs_total - required;
        let dust = self.network.dust_threshold;
        if change_value >= dust {
            outputs.push(TransactionOutput::new(change_value, change.script().clone()));
        } else if change_value > 0 {
            match self.config.dust_policy {
                DustPolicy::Reject => {
                    return Err(TransactionError::ChangeBelowDust {
                        change: change_value,
                        dust,
                    })
                }
                DustPolicy::FoldIntoFee => {
                    tracing::warn!(change = change_value, dust, "change below dust folded into fee");
                    self.fee += change_value;
                }
            }
        }

        if self.config.ordering == InputOrdering::Bip69 {
            self.inputs.sort_by(|a, b| a.utxo.outpoint().cmp(&b.utxo.outpoint()));
            outputs.sort_by(|a, b| {
                a.value
                    .cmp(&b.value)
                    .then_with(|| a.locking_script.as_bytes().cmp(b.locking_script.as_bytes()))
            });
        }

        let mut tx = Transaction::new(self.config.version.unwrap_or(self.network.default_tx_version));
        tx.lock_time = self.config.lock_time;
        tx.inputs = self
            .inputs
            .iter()
            .map(|i| TransactionInput::new(i.utxo.outpoint(), self.config.sequence))
            .collect();
        tx.outputs = outputs;

        tracing::debug!(
            outputs = tx.outputs.len(),
            change = change_value,
            fee = self.fee,
            "builder: outputs assembled"
        );
        self.transaction = Some(tx);
        self.state = BuilderState::OutputsAssembled;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Digests and signatures
    // -----------------------------------------------------------------

    /// Compute the sighash preimage and digest of every input.
    pub fn compute_preimages(&mut self) -> Result<Vec<SighashPreimage>, TransactionError> {
        self.expect_state(BuilderState::OutputsAssembled, "compute preimages")?;
        let tx = self.assembled()?;

        let spent: Vec<TransactionOutput> = self
            .inputs
            .iter()
            .map(|i| TransactionOutput::new(i.utxo.value, i.utxo.locking_script.clone()))
            .collect();

        let mut preimages = Vec::with_capacity(self.inputs.len());
        for (index, input) in self.inputs.iter().enumerate() {
            let sighash_type = input.algorithm.sighash_type(self.network.fork_id);
            let preimage = sighash::calc_preimage(
                tx,
                index,
                input.algorithm,
                input.script_code.as_bytes(),
                &spent,
                sighash_type,
            )?;
            let digest = input.algorithm.digest(&preimage);
            tracing::trace!(
                index,
                algorithm = ?input.algorithm,
                digest = %hex::encode(digest),
                "computed sighash"
            );
            preimages.push(SighashPreimage {
                input_index: index,
                script_type: input.script_type,
                algorithm: input.algorithm,
                preimage,
                digest,
            });
        }

        self.state = BuilderState::PreimagesComputed;
        tracing::debug!(inputs = preimages.len(), "builder: preimages computed");
        Ok(preimages)
    }

    /// Attach the signer's signature for input `index`.
    ///
    /// The signature's encoding is checked against the input's script type
    /// and normalized; it is not verified against the digest. A signature
    /// for an already signed input replaces the earlier one.
    pub fn attach_signature(&mut self, index: usize, signature: InputSignature) -> Result<(), TransactionError> {
        if !matches!(self.state, BuilderState::PreimagesComputed | BuilderState::Signed) {
            return Err(TransactionError::InvalidState {
                operation: "attach signature",
                state: self.state,
            });
        }
        let count = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(TransactionError::InputIndexOutOfRange { index, count })?;

        let encoded = signature.encode(input.script_type, input.algorithm)?;
        let unlocking = input.template.unlock(&encoded)?;
        input.signed = true;

        let tx = self
            .transaction
            .as_mut()
            .ok_or(TransactionError::InvalidState {
                operation: "attach signature",
                state: self.state,
            })?;
        let tx_input = &mut tx.inputs[index];
        tx_input.unlocking_script = unlocking.script_sig;
        tx_input.witness = unlocking.witness;

        if self.inputs.iter().all(|i| i.signed) {
            self.state = BuilderState::Signed;
            tracing::debug!(inputs = count, "builder: all inputs signed");
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Serialization and settlement
    // -----------------------------------------------------------------

    /// Emit the raw signed transaction.
    pub fn serialize(&mut self) -> Result<Vec<u8>, TransactionError> {
        match self.state {
            BuilderState::Signed | BuilderState::Serialized => {}
            BuilderState::PreimagesComputed => {
                let missing = self.inputs.iter().position(|i| !i.signed).unwrap_or(0);
                return Err(TransactionError::MissingSignature(missing));
            }
            state => {
                return Err(TransactionError::InvalidState {
                    operation: "serialize",
                    state,
                })
            }
        }
        let bytes = self.assembled()?.to_bytes();
        self.state = BuilderState::Serialized;
        tracing::debug!(size = bytes.len(), "builder: serialized");
        Ok(bytes)
    }

    /// Mark the spent outputs as spent in the [`UtxoSet`], typically after
    /// a successful broadcast.
    pub fn commit(&mut self) -> Result<(), TransactionError> {
        self.expect_state(BuilderState::Serialized, "commit")?;
        if let Some(reservation) = self.reservation.take() {
            reservation.commit();
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Fee estimation
    // -----------------------------------------------------------------

    /// Expected virtual size of the signed transaction.
    ///
    /// Uses each input's typical unlocking size, so the result may differ
    /// from the final size by a byte or two per ECDSA signature.
    pub fn estimate_virtual_size(&self) -> Result<usize, TransactionError> {
        let tx = self.assembled()?;
        let mut base = tx.to_bytes_legacy().len();
        let mut witness = 0usize;
        let segwit = self.inputs.iter().any(|i| i.script_type.is_witness());

        for input in &self.inputs {
            let size = input.template.estimate_length();
            // the unsigned input already counts a one-byte empty script
            base += utxo_primitives::util::VarInt::from(size.script_sig).length() - 1 + size.script_sig;
            if segwit {
                witness += size.witness.max(1);
            }
        }
        if segwit {
            witness += 2; // marker and flag
        }

        let weight = base * 4 + witness;
        Ok((weight + 3) / 4)
    }

    /// Fee for `sat_per_vbyte` at the estimated virtual size.
    pub fn fee_for_rate(&self, sat_per_vbyte: u64) -> Result<u64, TransactionError> {
        Ok((self.estimate_virtual_size()? as u64).saturating_mul(sat_per_vbyte))
    }

    // -----------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------

    fn expect_state(&self, expected: BuilderState, operation: &'static str) -> Result<(), TransactionError> {
        if self.state != expected {
            return Err(TransactionError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn assembled(&self) -> Result<&Transaction, TransactionError> {
        self.transaction.as_ref().ok_or(TransactionError::InvalidState {
            operation: "read transaction",
            state: self.state,
        })
    }
}

impl fmt::Debug for TransactionBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionBuilder")
            .field("network", &self.network.id)
            .field("state", &self.state)
            .field("inputs", &self.inputs.len())
            .field("amount", &self.amount)
            .field("fee", &self.fee)
            .finish()
    }
}

/// `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`, the BIP143 script
/// code of a P2WPKH spend.
fn p2pkh_script_code(key_hash: &[u8]) -> Script {
    let mut bytes = Vec::with_capacity(25);
    bytes.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
    bytes.extend_from_slice(key_hash);
    bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    Script::from(bytes)
}
