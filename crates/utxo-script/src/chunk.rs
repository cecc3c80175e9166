//! Script chunk parsing and push encoding.
//!
//! A chunk is either a bare opcode or a data push with its payload. Locking
//! script classification works on chunks so that push prefixes are checked
//! structurally instead of by byte offset.

use utxo_primitives::util::ByteReader;

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes) this is the length.
    pub op: u8,
    /// The pushed bytes, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// True when this chunk pushes exactly `len` bytes.
    pub fn is_push_of(&self, len: usize) -> bool {
        matches!(&self.data, Some(d) if d.len() == len)
    }

    /// ASM token: hex for pushes, the opcode name otherwise.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) => hex::encode(data),
            None => opcode_to_string(self.op),
        }
    }
}

/// Decode raw script bytes into chunks.
///
/// Truncated pushes fail with `DataTooSmall`. Unlike interpreters that treat
/// trailing bytes after OP_RETURN as opaque, every byte here is parsed as
/// an opcode, since only standard templates are ever classified.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut reader = ByteReader::new(bytes);
    let mut chunks = Vec::new();

    while reader.remaining() > 0 {
        let op = reader.read_u8().map_err(|_| ScriptError::DataTooSmall)?;
        let len = match op {
            OP_DATA_1..=OP_DATA_75 => Some(op as usize),
            OP_PUSHDATA1 => Some(reader.read_u8().map_err(|_| ScriptError::DataTooSmall)? as usize),
            OP_PUSHDATA2 => Some(reader.read_u16_le().map_err(|_| ScriptError::DataTooSmall)? as usize),
            OP_PUSHDATA4 => Some(reader.read_u32_le().map_err(|_| ScriptError::DataTooSmall)? as usize),
            _ => None,
        };
        let data = match len {
            Some(n) => Some(
                reader
                    .read_bytes(n)
                    .map_err(|_| ScriptError::DataTooSmall)?
                    .to_vec(),
            ),
            None => None,
        };
        chunks.push(ScriptChunk { op, data });
    }

    Ok(chunks)
}

/// Smallest push prefix for a payload of `data_len` bytes.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= u32::MAX as usize {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}
