//! Sequential binary reader/writer over a single payload buffer.
//!
//! Every integer on the wire is little-endian. Reads consume from the current
//! position and never move backwards; writes always append at the end.

use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CodecError, CodecResult};
use crate::string::WireString;

/// Width of a hash on the wire.
pub const HASH_LEN: usize = 16;

/// A 16-bit string length with this value is followed by the real `u32` length.
pub const STRING_LEN_ESCAPE: u16 = 0xFFFF;

/// Longest string the writer accepts (it only emits the 16-bit length form).
pub const MAX_WRITE_STRING_LEN: usize = STRING_LEN_ESCAPE as usize - 1;

/// Longest list a `u16` count prefix can describe.
pub const MAX_LIST_LEN: usize = u16::MAX as usize;

/// Fixed-width protocol hash (MD4 for eDonkey files and users).
pub type Hash = [u8; HASH_LEN];

/// A byte buffer paired with a read position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteCursor {
    data: BytesMut,
    pos: usize,
}

impl ByteCursor {
    /// Create an empty cursor for writing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            pos: 0,
        }
    }

    /// Create a cursor positioned at the start of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: BytesMut::from(data),
            pos: 0,
        }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total bytes held, read or not.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// All bytes held, including already consumed ones.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes not yet read.
    pub fn unread(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// A copy of this cursor with its position moved back to the start.
    pub fn rewound(&self) -> Self {
        Self {
            data: self.data.clone(),
            pos: 0,
        }
    }

    /// Consume the cursor, returning every byte it holds.
    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }

    fn take(&mut self, needed: usize) -> CodecResult<&[u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(CodecError::OutOfData { needed, remaining });
        }
        let start = self.pos;
        self.pos += needed;
        Ok(&self.data[start..self.pos])
    }

    fn take_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn get_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn get_u16(&mut self) -> CodecResult<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn get_u32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Native two's complement reinterpretation of a `u32`.
    pub fn get_i32(&mut self) -> CodecResult<i32> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    /// Two consecutive `u32` words, low word first.
    pub fn get_u64(&mut self) -> CodecResult<u64> {
        let lo = self.get_u32()?;
        let hi = self.get_u32()?;
        Ok(u64::from(lo) | (u64::from(hi) << 32))
    }

    /// One byte; anything nonzero is `true`.
    pub fn get_bool(&mut self) -> CodecResult<bool> {
        Ok(self.get_u8()? != 0)
    }

    /// A list count prefix.
    pub fn get_count(&mut self) -> CodecResult<usize> {
        Ok(usize::from(self.get_u16()?))
    }

    /// Raw bytes with no length prefix.
    pub fn get_bytes(&mut self, len: usize) -> CodecResult<Bytes> {
        Ok(Bytes::copy_from_slice(self.take(len)?))
    }

    /// Length-prefixed string, honoring the `0xFFFF` escape to a `u32` length.
    pub fn get_string(&mut self) -> CodecResult<WireString> {
        let short = self.get_u16()?;
        let len = if short == STRING_LEN_ESCAPE {
            self.get_u32()? as usize
        } else {
            usize::from(short)
        };
        Ok(WireString::from(self.get_bytes(len)?))
    }

    pub fn get_hash(&mut self) -> CodecResult<Hash> {
        self.take_array()
    }

    /// IPv4 address sent as a `u32` whose most significant byte is the first octet.
    pub fn get_ipv4(&mut self) -> CodecResult<Ipv4Addr> {
        Ok(Ipv4Addr::from(self.get_u32()?))
    }

    /// Decimal float sent as `"{integer}.{hundredths}"`.
    ///
    /// The hundredths field is not zero-padded, so `"7.3"` reads as 7.03 and
    /// `"7.30"` reads as 7.30. A string without a dot reads its integer part only.
    pub fn get_float(&mut self) -> CodecResult<f64> {
        let text = self.get_string()?;
        let bytes = text.as_bytes();
        let (integer, hundredths) = match bytes.iter().position(|&b| b == b'.') {
            Some(dot) => (&bytes[..dot], &bytes[dot + 1..]),
            None => (bytes, &[][..]),
        };
        Ok(leading_int(integer) as f64 + leading_int(hundredths) as f64 / 100.0)
    }

    pub fn put_u8(&mut self, value: u8) {
        self.data.put_u8(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.data.put_u16_le(value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.data.put_u32_le(value);
    }

    pub fn put_i32(&mut self, value: i32) {
        self.data.put_i32_le(value);
    }

    /// Low `u32` word first, then the high word.
    pub fn put_u64(&mut self, value: u64) {
        let hi = (value >> 32) as u32;
        let lo = (value & 0xFFFF_FFFF) as u32;
        self.put_u32(lo);
        self.put_u32(hi);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.put_u8(u8::from(value));
    }

    /// Write a list count prefix, refusing lists the prefix cannot describe.
    pub fn put_count(&mut self, len: usize) -> CodecResult<()> {
        let count = u16::try_from(len).map_err(|_| CodecError::ListTooLong {
            len,
            max: MAX_LIST_LEN,
        })?;
        self.put_u16(count);
        Ok(())
    }

    /// Raw bytes with no length prefix.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.data.put_slice(bytes);
    }

    /// Length-prefixed string. Only the 16-bit length form is ever written.
    pub fn put_string(&mut self, value: impl AsRef<[u8]>) -> CodecResult<()> {
        let value = value.as_ref();
        if value.len() > MAX_WRITE_STRING_LEN {
            return Err(CodecError::StringTooLong {
                len: value.len(),
                max: MAX_WRITE_STRING_LEN,
            });
        }
        self.put_u16(value.len() as u16);
        self.put_bytes(value);
        Ok(())
    }

    /// Fixed 16-byte hash; shorter input is padded with trailing spaces.
    pub fn put_hash(&mut self, hash: &[u8]) -> CodecResult<()> {
        if hash.len() > HASH_LEN {
            return Err(CodecError::HashTooLong { len: hash.len() });
        }
        self.put_bytes(hash);
        for _ in hash.len()..HASH_LEN {
            self.put_u8(b' ');
        }
        Ok(())
    }

    pub fn put_ipv4(&mut self, addr: Ipv4Addr) {
        self.put_u32(u32::from(addr));
    }

    /// Decimal float as `"{integer}.{hundredths}"` without zero padding.
    ///
    /// Hundredths are truncated, not rounded: 7.3 is written as `"7.30"`,
    /// 7.03 as `"7.3"` and 2.01 as `"2.0"` because `2.01 * 100` lands just
    /// under 201.
    pub fn put_float(&mut self, value: f64) -> CodecResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(CodecError::InvalidFloat(value));
        }
        let int_part = value.trunc();
        let hundredths = (value * 100.0 - int_part * 100.0).trunc().max(0.0);
        self.put_string(format!("{}.{}", int_part as u64, hundredths as u64))
    }
}

/// Leading optionally-signed decimal integer; 0 when there is none.
fn leading_int(text: &[u8]) -> i64 {
    let mut iter = text
        .iter()
        .copied()
        .skip_while(|b| b.is_ascii_whitespace())
        .peekable();

    let negative = match iter.peek() {
        Some(b'-') => {
            iter.next();
            true
        }
        Some(b'+') => {
            iter.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    for digit in iter.take_while(u8::is_ascii_digit) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    if negative {
        -value
    } else {
        value
    }
}
