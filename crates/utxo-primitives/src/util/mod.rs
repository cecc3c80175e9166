//! Binary serialization helpers for transaction wire formats.
//!
//! Provides the compact-size [`VarInt`], a cursor-based [`ByteReader`] and an
//! append-only [`ByteWriter`]. All fixed-width integers are little-endian.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A compact-size unsigned integer.
///
/// Encodes counts and lengths in 1, 3, 5 or 9 bytes:
/// values below `0xfd` are a single byte, then `0xfd` + u16, `0xfe` + u32,
/// and `0xff` + u64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from the front of a byte slice.
    ///
    /// # Returns
    /// The value and the number of bytes consumed, or `UnexpectedEof` when
    /// the slice is shorter than the encoding announces.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let mut reader = ByteReader::new(data);
        let value = reader.read_varint()?;
        Ok((value, data.len() - reader.remaining()))
    }

    /// Return the wire-format byte length of this VarInt.
    pub fn length(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    /// Encode the VarInt into a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut out = Vec::with_capacity(self.length());
        match self.length() {
            1 => out.push(v as u8),
            3 => {
                out.push(0xfd);
                out.extend_from_slice(&(v as u16).to_le_bytes());
            }
            5 => {
                out.push(0xfe);
                out.extend_from_slice(&(v as u32).to_le_bytes());
            }
            _ => {
                out.push(0xff);
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        out
    }

    /// Return the underlying u64 value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A cursor over a byte slice for parsing wire data.
///
/// Every read advances the cursor and fails with `UnexpectedEof` instead of
/// panicking when the slice runs out.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or an error if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(PrimitivesError::UnexpectedEof)?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a compact-size VarInt.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let value = match self.read_u8()? {
            0xff => self.read_u64_le()?,
            0xfe => u64::from(self.read_u32_le()?),
            0xfd => u64::from(self.read_u16_le()?),
            b => u64::from(b),
        };
        Ok(VarInt(value))
    }

    /// Read a VarInt length prefix followed by that many bytes.
    ///
    /// # Returns
    /// The byte slice, `VarIntTooLarge` if the length does not fit in memory,
    /// or `UnexpectedEof` if the data is truncated.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = usize::try_from(self.read_varint()?.value())
            .map_err(|_| PrimitivesError::VarIntTooLarge)?;
        self.read_bytes(len)
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Return the number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// An append-only buffer for building wire data.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create a new empty writer.
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    /// Create a new writer with a pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a little-endian u32.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian u64.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a compact-size VarInt.
    pub fn write_varint(&mut self, val: VarInt) {
        self.buf.extend_from_slice(&val.to_bytes());
    }

    /// Append a VarInt length prefix followed by `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    /// Consume the writer and return the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Borrow the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- VarInt boundaries --

    #[test]
    fn test_varint_size_classes() {
        let cases: &[(u64, &str)] = &[
            (0, "00"),
            (0xfc, "fc"),
            (0xfd, "fdfd00"),
            (0xffff, "fdffff"),
            (0x1_0000, "fe00000100"),
            (0xffff_ffff, "feffffffff"),
            (0x1_0000_0000, "ff0000000001000000"),
        ];
        for &(value, expected) in cases {
            let v = VarInt(value);
            assert_eq!(hex::encode(v.to_bytes()), expected, "value {:#x}", value);
            assert_eq!(v.length(), expected.len() / 2);
        }
    }

    #[test]
    fn test_varint_from_bytes_reports_consumed() {
        let (v, used) = VarInt::from_bytes(&[0xfe, 0x01, 0x00, 0x01, 0x00, 0xaa]).unwrap();
        assert_eq!(v.value(), 0x0001_0001);
        assert_eq!(used, 5);
    }

    #[test]
    fn test_varint_truncated() {
        assert!(matches!(
            VarInt::from_bytes(&[0xfd, 0x01]),
            Err(PrimitivesError::UnexpectedEof)
        ));
    }

    // -- Reader / writer --

    #[test]
    fn test_reader_reads_little_endian() {
        let data = hex::decode("0100000002000000000000000378797a").unwrap();
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u32_le().unwrap(), 1);
        assert_eq!(r.read_u64_le().unwrap(), 2);
        assert_eq!(r.peek_u8(), Some(3));
        assert_eq!(r.read_var_bytes().unwrap(), b"xyz");
        assert_eq!(r.remaining(), 0);
        assert!(r.read_u8().is_err());
    }

    #[test]
    fn test_writer_var_bytes() {
        let mut w = ByteWriter::with_capacity(8);
        w.write_u32_le(2);
        w.write_var_bytes(&[0xab; 3]);
        assert_eq!(hex::encode(w.as_bytes()), "0200000003ababab");
        assert_eq!(w.len(), 8);
        assert!(!w.is_empty());
    }
}
