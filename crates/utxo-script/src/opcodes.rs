//! Opcode constants used by the locking and unlocking scripts built here.
//!
//! Names follow the Bitcoin script table. Kaspa reuses two byte values with
//! different meanings; those get their own aliases below.

pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = 0x00;
pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_32: u8 = 0x20;
pub const OP_DATA_33: u8 = 0x21;
pub const OP_DATA_65: u8 = 0x41;
pub const OP_DATA_75: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_HASH256: u8 = 0xaa;
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// Kaspa: BLAKE2b-256 of the top stack item (Bitcoin's OP_HASH256 slot).
pub const OP_BLAKE2B: u8 = OP_HASH256;

/// Kaspa: ECDSA signature check (Bitcoin's OP_CODESEPARATOR slot).
pub const OP_CHECKSIGECDSA: u8 = OP_CODESEPARATOR;

/// Render an opcode by its Bitcoin name for ASM output.
pub fn opcode_to_string(op: u8) -> String {
    match op {
        OP_0 => "OP_0".to_string(),
        OP_DATA_1..=OP_DATA_75 => format!("OP_DATA_{}", op),
        OP_PUSHDATA1 => "OP_PUSHDATA1".to_string(),
        OP_PUSHDATA2 => "OP_PUSHDATA2".to_string(),
        OP_PUSHDATA4 => "OP_PUSHDATA4".to_string(),
        OP_1NEGATE => "OP_1NEGATE".to_string(),
        OP_1..=OP_16 => format!("OP_{}", op - OP_1 + 1),
        OP_RETURN => "OP_RETURN".to_string(),
        OP_DUP => "OP_DUP".to_string(),
        OP_EQUAL => "OP_EQUAL".to_string(),
        OP_EQUALVERIFY => "OP_EQUALVERIFY".to_string(),
        OP_SHA256 => "OP_SHA256".to_string(),
        OP_HASH160 => "OP_HASH160".to_string(),
        OP_HASH256 => "OP_HASH256".to_string(),
        OP_CODESEPARATOR => "OP_CODESEPARATOR".to_string(),
        OP_CHECKSIG => "OP_CHECKSIG".to_string(),
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY".to_string(),
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG".to_string(),
        other => format!("OP_UNKNOWN{}", other),
    }
}

/// Opcode that pushes the small integer `n` (0..=16), as used for witness versions.
pub fn small_int_opcode(n: u8) -> Option<u8> {
    match n {
        0 => Some(OP_0),
        1..=16 => Some(OP_1 + n - 1),
        _ => None,
    }
}
