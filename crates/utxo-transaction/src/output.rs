//! Transaction output with a value and locking script.

use utxo_primitives::util::{ByteReader, ByteWriter};
use utxo_script::Script;

use crate::TransactionError;

/// A single transaction output.
///
/// # Wire format
///
/// | Field            | Size           |
/// |------------------|----------------|
/// | value            | 8 bytes (LE)   |
/// | script length    | VarInt         |
/// | locking_script   | variable       |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// Value in the chain's smallest unit (satoshis).
    pub value: u64,

    /// The locking script (scriptPubKey) that defines spending conditions.
    pub locking_script: Script,
}

impl TransactionOutput {
    pub fn new(value: u64, locking_script: Script) -> Self {
        TransactionOutput {
            value,
            locking_script,
        }
    }

    /// Deserialize an output from `reader`.
    ///
    /// # Returns
    /// `Ok(TransactionOutput)` on success, or `Serialization` if the data is
    /// truncated.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let value = reader.read_u64_le().map_err(|e| {
            TransactionError::Serialization(format!("reading output value: {}", e))
        })?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::Serialization(format!("reading locking script: {}", e))
        })?;

        Ok(TransactionOutput {
            value,
            locking_script: Script::from_bytes(script_bytes),
        })
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.value);
        writer.write_var_bytes(self.locking_script.as_bytes());
    }

    /// Serialized size in bytes.
    pub fn size(&self) -> usize {
        let script_len = self.locking_script.len();
        8 + utxo_primitives::util::VarInt::from(script_len).length() + script_len
    }
}
