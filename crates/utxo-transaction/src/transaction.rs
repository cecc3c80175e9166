//! Core transaction type for Bitcoin-format chains.
//!
//! Represents a complete transaction with version, inputs, outputs and lock
//! time. Handles legacy and BIP144 (segwit marker + witness) serialization,
//! txid/wtxid computation and weight accounting.

use std::fmt;

use utxo_primitives::txid::Txid;
use utxo_primitives::util::{ByteReader, ByteWriter};

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::TransactionError;

const SEGWIT_MARKER: u8 = 0x00;
const SEGWIT_FLAG: u8 = 0x01;
const WITNESS_SCALE_FACTOR: usize = 4;

/// A transaction consisting of a version, inputs, outputs and a lock time.
///
/// # Wire format
///
/// | Field         | Size                        |
/// |---------------|-----------------------------|
/// | version       | 4 bytes (LE)                |
/// | marker, flag  | `00 01`, segwit only        |
/// | input count   | VarInt                      |
/// | inputs        | variable (per input)        |
/// | output count  | VarInt                      |
/// | outputs       | variable (per output)       |
/// | witnesses     | one stack per input, segwit only |
/// | lock_time     | 4 bytes (LE)                |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,

    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,
}

impl Transaction {
    /// Create an empty transaction with the given version and lock time 0.
    pub fn new(version: u32) -> Self {
        Transaction {
            version,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::Serialization(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes, legacy or segwit.
    ///
    /// The slice must hold exactly one transaction with no trailing data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::Serialization(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from `reader`.
    ///
    /// A zero byte where the input count would be is read as the BIP144
    /// marker; the following flag byte must then be `0x01`.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader
            .read_u32_le()
            .map_err(|e| TransactionError::Serialization(format!("reading version: {}", e)))?;

        let segwit = reader.peek_u8() == Some(SEGWIT_MARKER);
        if segwit {
            let _marker = reader.read_u8()?;
            let flag = reader
                .read_u8()
                .map_err(|e| TransactionError::Serialization(format!("reading segwit flag: {}", e)))?;
            if flag != SEGWIT_FLAG {
                return Err(TransactionError::Serialization(format!(
                    "unknown segwit flag {:#04x}",
                    flag
                )));
            }
        }

        let input_count = reader
            .read_varint()
            .map_err(|e| TransactionError::Serialization(format!("reading input count: {}", e)))?;
        let mut inputs = Vec::with_capacity(input_count.value().min(1024) as usize);
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader
            .read_varint()
            .map_err(|e| TransactionError::Serialization(format!("reading output count: {}", e)))?;
        let mut outputs = Vec::with_capacity(output_count.value().min(1024) as usize);
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        if segwit {
            for input in inputs.iter_mut() {
                input.witness = TransactionInput::read_witness(reader)?;
            }
            if inputs.iter().all(|i| i.witness.is_empty()) {
                return Err(TransactionError::Serialization(
                    "segwit marker present but every witness is empty".into(),
                ));
            }
        }

        let lock_time = reader
            .read_u32_le()
            .map_err(|e| TransactionError::Serialization(format!("reading lock time: {}", e)))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// True when any input carries witness data.
    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|i| !i.witness.is_empty())
    }

    /// Serialize to raw bytes, with marker, flag and witnesses when any
    /// input has a witness.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.serialize(self.has_witness())
    }

    /// Serialize without witness data. This is the form hashed for the txid.
    pub fn to_bytes_legacy(&self) -> Vec<u8> {
        self.serialize(false)
    }

    fn serialize(&self, with_witness: bool) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(256);
        writer.write_u32_le(self.version);
        if with_witness {
            writer.write_u8(SEGWIT_MARKER);
            writer.write_u8(SEGWIT_FLAG);
        }

        writer.write_varint(self.inputs.len().into());
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(self.outputs.len().into());
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        if with_witness {
            for input in &self.inputs {
                input.write_witness(&mut writer);
            }
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Serialize to a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Identifiers and size
    // -----------------------------------------------------------------

    /// The transaction id: SHA-256d of the witness-stripped serialization.
    pub fn txid(&self) -> Txid {
        Txid::hash_of(&self.to_bytes_legacy())
    }

    /// The witness transaction id. Equal to [`txid`](Self::txid) when there
    /// is no witness data.
    pub fn wtxid(&self) -> Txid {
        Txid::hash_of(&self.to_bytes())
    }

    /// Serialized size in bytes, witness included.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }

    /// BIP141 weight: base size times three plus total size.
    pub fn weight(&self) -> usize {
        self.to_bytes_legacy().len() * (WITNESS_SCALE_FACTOR - 1) + self.size()
    }

    /// Weight divided by four, rounded up.
    pub fn virtual_size(&self) -> usize {
        (self.weight() + WITNESS_SCALE_FACTOR - 1) / WITNESS_SCALE_FACTOR
    }

    pub fn total_output_value(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }
}

impl fmt::Display for Transaction {
    /// Display the transaction as its hex-encoded serialization.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
