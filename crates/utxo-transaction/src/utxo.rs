//! Unspent outputs and the reservation arena that hands them to builders.
//!
//! Every output lives in a slot that is `Available`, `Reserved` by exactly
//! one in-flight build, or `Spent`. Selection and marking happen under one
//! lock, so two concurrent builders can never pick the same output.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use utxo_primitives::txid::Txid;
use utxo_script::Script;

use crate::config::SelectionStrategy;
use crate::input::OutPoint;
use crate::selection::{select, SelectionTarget};
use crate::TransactionError;

/// An output as reported by a UTXO provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub vout: u32,
    pub value: u64,
    pub locking_script: Script,
    #[serde(default)]
    pub confirmation_height: Option<u64>,
    /// Redeem (p2sh) or witness (p2wsh) script, when the output is a script hash.
    #[serde(default)]
    pub redeem_script: Option<Script>,
}

impl UnspentOutput {
    pub fn new(txid: Txid, vout: u32, value: u64, locking_script: Script) -> Self {
        UnspentOutput {
            txid,
            vout,
            value,
            locking_script,
            confirmation_height: None,
            redeem_script: None,
        }
    }

    pub fn with_redeem_script(mut self, redeem_script: Script) -> Self {
        self.redeem_script = Some(redeem_script);
        self
    }

    pub fn outpoint(&self) -> OutPoint {
        OutPoint::new(self.txid, self.vout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReservationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Reserved(ReservationId),
    Spent,
}

struct Slot {
    output: UnspentOutput,
    status: SlotStatus,
}

#[derive(Default)]
struct Inner {
    slots: Vec<Slot>,
    index: HashMap<OutPoint, usize>,
    next_reservation: u64,
}

impl Inner {
    fn mark(&mut self, slots: &[usize], status: SlotStatus) {
        for &i in slots {
            self.slots[i].status = status;
        }
    }

    fn reservation_id(&mut self) -> ReservationId {
        self.next_reservation += 1;
        ReservationId(self.next_reservation)
    }

    fn available(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status == SlotStatus::Available)
    }
}

/// Thread-safe arena of spendable outputs.
#[derive(Default)]
pub struct UtxoSet {
    inner: Mutex<Inner>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from provider output, skipping duplicate outpoints.
    pub fn from_outputs(outputs: impl IntoIterator<Item = UnspentOutput>) -> Self {
        let set = Self::new();
        for output in outputs {
            set.insert(output);
        }
        set
    }

    /// Add an output. Returns false if its outpoint is already tracked,
    /// whatever its status.
    pub fn insert(&self, output: UnspentOutput) -> bool {
        let mut inner = self.inner.lock();
        let outpoint = output.outpoint();
        if inner.index.contains_key(&outpoint) {
            return false;
        }
        let slot = inner.slots.len();
        inner.slots.push(Slot {
            output,
            status: SlotStatus::Available,
        });
        inner.index.insert(outpoint, slot);
        true
    }

    /// Reserve available outputs until their value reaches `target` and the
    /// change above it is zero or at least `dust`.
    ///
    /// At least one output is always taken. When no subset leaves emittable
    /// change, the smallest covering selection is reserved and the caller
    /// decides what to do with the remainder. Nothing is reserved when the
    /// available value falls short.
    pub fn reserve(
        &self,
        target: u64,
        dust: u64,
        strategy: SelectionStrategy,
    ) -> Result<Reservation<'_>, TransactionError> {
        let mut inner = self.inner.lock();

        let candidates: Vec<(usize, u64)> = inner.available().map(|(i, s)| (i, s.output.value)).collect();
        let picked = match select(&candidates, SelectionTarget { target, dust }, strategy) {
            Some(picked) => picked,
            None => {
                let available = candidates.iter().map(|(_, v)| *v).fold(0u64, u64::saturating_add);
                tracing::debug!(target, available, "utxo reservation failed");
                return Err(TransactionError::InsufficientFunds {
                    required: target,
                    available,
                });
            }
        };

        let id = inner.reservation_id();
        inner.mark(&picked, SlotStatus::Reserved(id));
        let outputs: Vec<UnspentOutput> = picked.iter().map(|&i| inner.slots[i].output.clone()).collect();
        tracing::debug!(id = id.0, count = outputs.len(), target, ?strategy, "reserved utxos");
        Ok(Reservation::new(self, id, outputs))
    }

    /// Reserve exactly the given outpoints, all or nothing.
    pub fn reserve_outpoints(&self, outpoints: &[OutPoint]) -> Result<Reservation<'_>, TransactionError> {
        let mut inner = self.inner.lock();

        let mut picked: Vec<usize> = Vec::with_capacity(outpoints.len());
        for outpoint in outpoints {
            let slot = *inner
                .index
                .get(outpoint)
                .ok_or(TransactionError::UnknownOutpoint(*outpoint))?;
            if inner.slots[slot].status != SlotStatus::Available || picked.contains(&slot) {
                return Err(TransactionError::OutpointUnavailable(*outpoint));
            }
            picked.push(slot);
        }

        let id = inner.reservation_id();
        inner.mark(&picked, SlotStatus::Reserved(id));
        let outputs: Vec<UnspentOutput> = picked.iter().map(|&i| inner.slots[i].output.clone()).collect();
        tracing::debug!(id = id.0, count = outputs.len(), "reserved explicit utxos");
        Ok(Reservation::new(self, id, outputs))
    }

    /// Total value of outputs that are neither reserved nor spent.
    pub fn available_value(&self) -> u64 {
        self.inner
            .lock()
            .available()
            .map(|(_, s)| s.output.value)
            .fold(0u64, u64::saturating_add)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().slots.is_empty()
    }

    pub fn status(&self, outpoint: &OutPoint) -> Option<SlotStatus> {
        let inner = self.inner.lock();
        inner.index.get(outpoint).map(|&i| inner.slots[i].status)
    }

    /// Move every slot held by `id` to `status`.
    fn settle(&self, id: ReservationId, status: SlotStatus) -> usize {
        let mut inner = self.inner.lock();
        let mut count = 0;
        for slot in inner.slots.iter_mut() {
            if slot.status == SlotStatus::Reserved(id) {
                slot.status = status;
                count += 1;
            }
        }
        count
    }
}

/// Outputs held for one build.
///
/// Dropping the reservation releases its outputs back to the set;
/// [`commit`](Reservation::commit) marks them spent instead.
pub struct Reservation<'a> {
    set: &'a UtxoSet,
    id: ReservationId,
    outputs: Vec<UnspentOutput>,
    settled: bool,
}

impl<'a> Reservation<'a> {
    fn new(set: &'a UtxoSet, id: ReservationId, outputs: Vec<UnspentOutput>) -> Self {
        Reservation {
            set,
            id,
            outputs,
            settled: false,
        }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    /// The reserved outputs, in selection order.
    pub fn outputs(&self) -> &[UnspentOutput] {
        &self.outputs
    }

    /// Sum of the reserved values, saturating at `u64::MAX`.
    pub fn total_value(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).fold(0u64, u64::saturating_add)
    }

    /// Mark the outputs spent, typically after broadcast.
    pub fn commit(mut self) {
        let count = self.set.settle(self.id, SlotStatus::Spent);
        self.settled = true;
        tracing::debug!(id = self.id.0, count, "committed utxo reservation");
    }

    /// Return the outputs to the available pool.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if !self.settled {
            let count = self.set.settle(self.id, SlotStatus::Available);
            self.settled = true;
            tracing::debug!(id = self.id.0, count, "released utxo reservation");
        }
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for Reservation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reservation")
            .field("id", &self.id)
            .field("outputs", &self.outputs.len())
            .field("total_value", &self.total_value())
            .finish()
    }
}
