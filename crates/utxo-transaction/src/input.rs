//! Transaction input referencing a previous output.
//!
//! An input names the output it spends by [`OutPoint`], carries the
//! unlocking script (scriptSig) and sequence number, and, for segwit and
//! taproot spends, a witness stack that is serialized after the outputs.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use utxo_primitives::txid::Txid;
use utxo_primitives::util::{ByteReader, ByteWriter};
use utxo_script::Script;

use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A reference to one output of a previous transaction.
///
/// Ordering follows BIP69: display-order txid bytes first, then output index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: Txid,
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: Txid, vout: u32) -> Self {
        OutPoint { txid, vout }
    }

    /// Write the 36-byte wire form: txid in internal order, then LE index.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(self.txid.as_wire_bytes());
        writer.write_u32_le(self.vout);
    }
}

impl Ord for OutPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.txid
            .to_display_bytes()
            .cmp(&other.txid.to_display_bytes())
            .then(self.vout.cmp(&other.vout))
    }
}

impl PartialOrd for OutPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// A single transaction input.
///
/// # Wire format (base)
///
/// | Field            | Size          |
/// |------------------|---------------|
/// | previous txid    | 32 bytes      |
/// | previous index   | 4 bytes (LE)  |
/// | script length    | VarInt        |
/// | unlocking_script | variable      |
/// | sequence         | 4 bytes (LE)  |
///
/// The witness stack is not part of this record; [`Transaction`](crate::Transaction)
/// writes all witnesses together after the outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    pub previous_output: OutPoint,

    /// The unlocking script (scriptSig). Empty for native segwit spends and
    /// for inputs that have not been signed yet.
    pub unlocking_script: Script,

    pub sequence: u32,

    /// Witness stack items, bottom first.
    pub witness: Vec<Vec<u8>>,
}

impl TransactionInput {
    /// Create an unsigned input spending `previous_output`.
    pub fn new(previous_output: OutPoint, sequence: u32) -> Self {
        TransactionInput {
            previous_output,
            unlocking_script: Script::new(),
            sequence,
            witness: Vec::new(),
        }
    }

    /// Deserialize the base record of an input (no witness).
    ///
    /// # Returns
    /// `Ok(TransactionInput)` on success, or `Serialization` if the data is
    /// truncated.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let txid = reader.read_array::<32>().map_err(|e| {
            TransactionError::Serialization(format!("reading previous txid: {}", e))
        })?;

        let vout = reader.read_u32_le().map_err(|e| {
            TransactionError::Serialization(format!("reading output index: {}", e))
        })?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::Serialization(format!("reading unlocking script: {}", e))
        })?;

        let sequence = reader.read_u32_le().map_err(|e| {
            TransactionError::Serialization(format!("reading sequence number: {}", e))
        })?;

        Ok(TransactionInput {
            previous_output: OutPoint::new(Txid::from_wire_bytes(txid), vout),
            unlocking_script: Script::from_bytes(script_bytes),
            sequence,
            witness: Vec::new(),
        })
    }

    /// Serialize the base record of this input into `writer`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        self.write_with_script(writer, self.unlocking_script.as_bytes());
    }

    /// Serialize this input with `script` in place of its unlocking script.
    ///
    /// Legacy sighash preimages substitute the previous output's script for
    /// the input being signed and blank every other input.
    pub fn write_with_script(&self, writer: &mut ByteWriter, script: &[u8]) {
        self.previous_output.write_to(writer);
        writer.write_var_bytes(script);
        writer.write_u32_le(self.sequence);
    }

    /// Read one witness stack (item count followed by length-prefixed items).
    pub(crate) fn read_witness(reader: &mut ByteReader) -> Result<Vec<Vec<u8>>, TransactionError> {
        let count = reader.read_varint().map_err(|e| {
            TransactionError::Serialization(format!("reading witness item count: {}", e))
        })?;
        let mut items = Vec::with_capacity(count.value().min(64) as usize);
        for _ in 0..count.value() {
            let item = reader.read_var_bytes().map_err(|e| {
                TransactionError::Serialization(format!("reading witness item: {}", e))
            })?;
            items.push(item.to_vec());
        }
        Ok(items)
    }

    /// Write this input's witness stack. An empty stack is a single zero byte.
    pub(crate) fn write_witness(&self, writer: &mut ByteWriter) {
        writer.write_varint(self.witness.len().into());
        for item in &self.witness {
            writer.write_var_bytes(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outpoint(hex_txid: &str, vout: u32) -> OutPoint {
        OutPoint::new(Txid::from_hex(hex_txid).unwrap(), vout)
    }

    /// Outpoints sort by displayed txid, not by wire bytes.
    #[test]
    fn test_outpoint_order_uses_display_bytes() {
        // Wire order would put the cffe... id first (its first wire byte is 0xdf).
        let a = outpoint("8b907ad6ee8c6b1d25375ce9696089fec400851ca46260927d04892ec88807ef", 0);
        let b = outpoint("cffea3f46c73d61c6ed1296494b3c85e9f498629a32d67367a0d9e1bafdd05df", 1);
        assert!(a < b);
        assert!(a.txid.as_wire_bytes() > b.txid.as_wire_bytes());
    }

    /// Equal txids fall back to the output index.
    #[test]
    fn test_outpoint_order_by_vout() {
        let id = "0000000000000000000000000000000000000000000000000000000000000001";
        assert!(outpoint(id, 1) < outpoint(id, 2));
    }

    /// Display renders `txid:vout`.
    #[test]
    fn test_outpoint_display() {
        let op = outpoint("8b907ad6ee8c6b1d25375ce9696089fec400851ca46260927d04892ec88807ef", 7);
        assert_eq!(
            op.to_string(),
            "8b907ad6ee8c6b1d25375ce9696089fec400851ca46260927d04892ec88807ef:7"
        );
    }

    /// An input survives a write/read cycle through the byte helpers.
    #[test]
    fn test_input_wire_roundtrip() {
        let mut input = TransactionInput::new(
            outpoint("cffea3f46c73d61c6ed1296494b3c85e9f498629a32d67367a0d9e1bafdd05df", 1),
            0xffff_fffa,
        );
        input.unlocking_script = Script::from_hex("51").unwrap();

        let mut writer = ByteWriter::new();
        input.write_to(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 32 + 4 + 1 + 1 + 4);
        assert_eq!(&bytes[..4], &[0xdf, 0x05, 0xdd, 0xaf]);

        let mut reader = ByteReader::new(&bytes);
        let parsed = TransactionInput::read_from(&mut reader).unwrap();
        assert_eq!(parsed, input);
        assert_eq!(reader.remaining(), 0);
    }

    /// A truncated input reports a serialization error.
    #[test]
    fn test_input_truncated() {
        let mut reader = ByteReader::new(&[0u8; 20]);
        assert!(matches!(
            TransactionInput::read_from(&mut reader),
            Err(TransactionError::Serialization(_))
        ));
    }
}
