use std::net::Ipv4Addr;

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{CodecError, CodecResult};
use crate::string::WireString;

const SIGN_BIT: u32 = 0x8000_0000;

/// Value half of a [`Tag`], selected by the type byte that follows the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TagValue {
    /// Type 0.
    Int32(u32),
    /// Type 1: sign-and-magnitude, high bit set means negative.
    Signed(i32),
    /// Type 2.
    String(WireString),
    /// Type 3.
    Ipv4(Ipv4Addr),
    /// Type 4.
    Int16(u16),
    /// Type 5.
    Int8(u8),
    /// Type 6.
    Pair(u32, u32),
    /// Any other type byte. Its value layout is unknown so nothing after the
    /// type byte is consumed, which leaves the cursor inside the value.
    Unknown { code: u8 },
}

impl TagValue {
    /// The type byte written before the value.
    pub fn type_code(&self) -> u8 {
        match self {
            Self::Int32(_) => 0,
            Self::Signed(_) => 1,
            Self::String(_) => 2,
            Self::Ipv4(_) => 3,
            Self::Int16(_) => 4,
            Self::Int8(_) => 5,
            Self::Pair(..) => 6,
            Self::Unknown { code } => *code,
        }
    }
}

/// Named, typed metadata entry attached to files, clients, servers and users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: WireString,
    pub value: TagValue,
}

impl Tag {
    pub fn new(name: impl Into<WireString>, value: TagValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

fn decode_signed(raw: u32) -> i32 {
    if raw > 0x7FFF_FFFF {
        -((raw & 0x7FFF_FFFF) as i32)
    } else {
        raw as i32
    }
}

fn encode_signed(value: i32) -> CodecResult<u32> {
    if value == i32::MIN {
        return Err(CodecError::SignedOutOfRange(value));
    }
    if value < 0 {
        Ok(SIGN_BIT | value.unsigned_abs())
    } else {
        Ok(value as u32)
    }
}

impl ByteCursor {
    pub fn get_tag(&mut self) -> CodecResult<Tag> {
        let name = self.get_string()?;
        let value = match self.get_u8()? {
            0 => TagValue::Int32(self.get_u32()?),
            1 => TagValue::Signed(decode_signed(self.get_u32()?)),
            2 => TagValue::String(self.get_string()?),
            3 => TagValue::Ipv4(self.get_ipv4()?),
            4 => TagValue::Int16(self.get_u16()?),
            5 => TagValue::Int8(self.get_u8()?),
            6 => {
                let first = self.get_u32()?;
                let second = self.get_u32()?;
                TagValue::Pair(first, second)
            }
            code => TagValue::Unknown { code },
        };
        Ok(Tag { name, value })
    }

    /// A `u16` count followed by that many tags.
    pub fn get_tags(&mut self) -> CodecResult<Vec<Tag>> {
        let count = self.get_count()?;
        let mut tags = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            tags.push(self.get_tag()?);
        }
        Ok(tags)
    }

    pub fn put_tag(&mut self, tag: &Tag) -> CodecResult<()> {
        self.put_string(&tag.name)?;
        self.put_u8(tag.value.type_code());
        match &tag.value {
            TagValue::Int32(v) => self.put_u32(*v),
            TagValue::Signed(v) => self.put_u32(encode_signed(*v)?),
            TagValue::String(v) => self.put_string(v)?,
            TagValue::Ipv4(v) => self.put_ipv4(*v),
            TagValue::Int16(v) => self.put_u16(*v),
            TagValue::Int8(v) => self.put_u8(*v),
            TagValue::Pair(a, b) => {
                self.put_u32(*a);
                self.put_u32(*b);
            }
            TagValue::Unknown { .. } => {}
        }
        Ok(())
    }

    pub fn put_tags(&mut self, tags: &[Tag]) -> CodecResult<()> {
        self.put_count(tags.len())?;
        for tag in tags {
            self.put_tag(tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_payload(raw: u32) -> ByteCursor {
        let mut cursor = ByteCursor::new();
        cursor.put_string("n").unwrap();
        cursor.put_u8(1);
        cursor.put_u32(raw);
        cursor
    }

    #[test]
    fn signed_tag_high_bit_means_negative() {
        let tag = signed_payload(0x8000_0001).get_tag().unwrap();
        assert_eq!(tag.name, "n");
        assert_eq!(tag.value, TagValue::Signed(-1));
    }

    #[test]
    fn signed_tag_positive_passes_through() {
        let tag = signed_payload(5).get_tag().unwrap();
        assert_eq!(tag.value, TagValue::Signed(5));
    }

    #[test]
    fn signed_tag_encodes_sign_and_magnitude() {
        let mut cursor = ByteCursor::new();
        cursor
            .put_tag(&Tag::new("n", TagValue::Signed(-1)))
            .unwrap();
        assert_eq!(&cursor.as_bytes()[3..], &[1, 0x01, 0, 0, 0x80]);
    }

    #[test]
    fn signed_min_is_not_representable() {
        let mut cursor = ByteCursor::new();
        let err = cursor
            .put_tag(&Tag::new("n", TagValue::Signed(i32::MIN)))
            .unwrap_err();
        assert_eq!(err, CodecError::SignedOutOfRange(i32::MIN));
    }

    #[test]
    fn every_known_type_roundtrips() {
        let tags = vec![
            Tag::new("availability", TagValue::Int32(0xFFFF_0000)),
            Tag::new("offset", TagValue::Signed(-300)),
            Tag::new("codec", TagValue::String(WireString::from("xvid"))),
            Tag::new("addr", TagValue::Ipv4(Ipv4Addr::new(1, 2, 3, 4))),
            Tag::new("port", TagValue::Int16(4662)),
            Tag::new("flag", TagValue::Int8(9)),
            Tag::new("range", TagValue::Pair(10, 20)),
        ];

        let mut cursor = ByteCursor::new();
        cursor.put_tags(&tags).unwrap();
        assert_eq!(cursor.get_tags().unwrap(), tags);
        assert!(!cursor.has_remaining());
    }

    #[test]
    fn unknown_type_consumes_only_name_and_code() {
        let mut cursor = ByteCursor::new();
        cursor.put_string("mystery").unwrap();
        cursor.put_u8(42);
        cursor.put_u32(0xAABB_CCDD);

        let tag = cursor.get_tag().unwrap();
        assert_eq!(tag.value, TagValue::Unknown { code: 42 });
        assert_eq!(tag.name, "mystery");
        assert_eq!(cursor.remaining(), 4);
    }

    #[test]
    fn truncated_tag_value_fails() {
        let mut cursor = ByteCursor::new();
        cursor.put_string("pair").unwrap();
        cursor.put_u8(6);
        cursor.put_u32(1);
        assert!(matches!(
            cursor.get_tag(),
            Err(CodecError::OutOfData { needed: 4, .. })
        ));
    }
}
