use mlgui_wire::Frame;
use serde::Serialize;

use crate::error::{ProtoError, Result};
use crate::message::{DecodeContext, RawMessage};
use crate::opcodes::OpcodeRegistry;
use crate::received::{CoreMessage, ReceivedMessage};

/// Outcome of converting a generic message.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The opcode is known and the payload decoded.
    Decoded(CoreMessage),
    /// No received kind is registered for the opcode. Returned unchanged.
    Unrecognized(RawMessage),
}

impl Dispatch {
    pub fn decoded(&self) -> Option<&CoreMessage> {
        match self {
            Self::Decoded(message) => Some(message),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn opcode_name(&self) -> String {
        match self {
            Self::Decoded(message) => message.kind().to_string(),
            Self::Unrecognized(raw) => format!("unrecognized({})", raw.opcode),
        }
    }
}

/// JSON shape used when printing a dispatch result.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DispatchView<'a> {
    Decoded(&'a CoreMessage),
    Unrecognized { unrecognized: u16, payload_len: usize },
}

impl<'a> From<&'a Dispatch> for DispatchView<'a> {
    fn from(dispatch: &'a Dispatch) -> Self {
        match dispatch {
            Dispatch::Decoded(message) => Self::Decoded(message),
            Dispatch::Unrecognized(raw) => Self::Unrecognized {
                unrecognized: raw.opcode,
                payload_len: raw.payload_len(),
            },
        }
    }
}

/// Turn a generic message into its typed form.
///
/// Decoding works on a rewound copy of the raw cursor; the opcode is re-read
/// from it and must agree with `message.opcode`. Unknown opcodes are logged
/// and handed back unchanged.
pub fn convert(
    message: RawMessage,
    registry: &OpcodeRegistry,
    ctx: &DecodeContext,
) -> Result<Dispatch> {
    let Some(kind) = registry.received_kind(message.opcode) else {
        tracing::warn!(
            opcode = message.opcode,
            payload_len = message.payload_len(),
            "unrecognized opcode"
        );
        return Ok(Dispatch::Unrecognized(message));
    };

    let raw = message
        .raw
        .as_ref()
        .ok_or(ProtoError::MissingPayload(message.opcode))?;
    let mut cursor = raw.rewound();
    let found = cursor.get_u16()?;
    if found != message.opcode {
        return Err(ProtoError::OpcodeMismatch {
            expected: message.opcode,
            found,
        });
    }

    let decoded = CoreMessage::decode_kind(kind, &mut cursor, ctx)?;
    if cursor.has_remaining() {
        tracing::debug!(
            opcode = message.opcode,
            kind = %kind,
            trailing = cursor.remaining(),
            "payload has trailing bytes"
        );
    }
    Ok(Dispatch::Decoded(decoded))
}

/// Convert a frame with the global registry.
pub fn convert_frame(frame: &Frame, ctx: &DecodeContext) -> Result<Dispatch> {
    convert(RawMessage::from(frame), OpcodeRegistry::global(), ctx)
}

/// Decode a frame whose kind is known in advance.
pub fn decode<T: ReceivedMessage>(frame: &Frame, ctx: &DecodeContext) -> Result<T> {
    let registry = OpcodeRegistry::global();
    let matches = registry
        .received_kind(frame.opcode)
        .is_some_and(|kind| T::KINDS.contains(&kind));
    if !matches {
        let expected = T::KINDS
            .first()
            .map(|kind| registry.received_opcode(*kind))
            .unwrap_or_default();
        return Err(ProtoError::OpcodeMismatch {
            expected,
            found: frame.opcode,
        });
    }

    let mut cursor = frame.to_cursor();
    cursor.get_u16()?;
    Ok(T::decode(&mut cursor, ctx)?)
}

#[cfg(test)]
mod tests {
    use mlgui_wire::{ByteCursor, CodecError, FrameReader};

    use super::*;
    use crate::received::{ConsoleMessage, CoreProtocol, FileSource};

    fn frame(opcode: u16, build: impl FnOnce(&mut ByteCursor)) -> Frame {
        let mut payload = ByteCursor::new();
        build(&mut payload);
        Frame::new(opcode, payload.into_bytes())
    }

    #[test]
    fn unknown_opcode_is_returned_unchanged() {
        let message = RawMessage::from(frame(0xBEEF, |c| c.put_u32(1)));
        let dispatch = convert(
            message.clone(),
            OpcodeRegistry::global(),
            &DecodeContext::default(),
        )
        .unwrap();

        assert_eq!(dispatch, Dispatch::Unrecognized(message));
        assert_eq!(dispatch.opcode_name(), "unrecognized(48879)");
    }

    #[test]
    fn core_protocol_is_decoded() {
        let frame = frame(0, |c| {
            c.put_u32(42);
            c.put_u32(59);
            c.put_u32(68);
        });
        let dispatch = convert_frame(&frame, &DecodeContext::default()).unwrap();

        let Dispatch::Decoded(CoreMessage::CoreProtocol(proto)) = dispatch else {
            panic!("expected CoreProtocol, got {dispatch:?}");
        };
        assert_eq!(proto.version, 42);
        assert_eq!(proto.max_opcode_accepted, 68);
    }

    #[test]
    fn core_protocol_from_stream_bytes() {
        #[rustfmt::skip]
        let wire: Vec<u8> = vec![
            0x0E, 0x00, 0x00, 0x00, // length: opcode + 12 payload bytes
            0x00, 0x00,             // opcode 0
            0x2A, 0x00, 0x00, 0x00, // version 42
            0x3B, 0x00, 0x00, 0x00, // max opcode sent 59
            0x44, 0x00, 0x00, 0x00, // max opcode accepted 68
        ];
        let mut reader = FrameReader::new(std::io::Cursor::new(wire));
        let frame = reader.read_frame().unwrap().into_frame().unwrap();
        assert_eq!(frame.opcode, 0);
        assert_eq!(frame.length_field(), 14);

        let dispatch = convert(
            RawMessage::from(frame),
            OpcodeRegistry::global(),
            &DecodeContext::default(),
        )
        .unwrap();
        assert_eq!(
            dispatch,
            Dispatch::Decoded(CoreMessage::CoreProtocol(CoreProtocol {
                version: 42,
                max_opcode_sent: 59,
                max_opcode_accepted: 68,
            }))
        );
    }

    #[test]
    fn truncated_payload_is_out_of_data() {
        let frame = frame(10, |c| c.put_u32(7));
        let err = convert_frame(&frame, &DecodeContext::default()).unwrap_err();

        assert!(matches!(
            err,
            ProtoError::Codec(CodecError::OutOfData {
                needed: 4,
                remaining: 0
            })
        ));
    }

    #[test]
    fn known_opcode_without_payload_fails() {
        let err = convert(
            RawMessage::new(19),
            OpcodeRegistry::global(),
            &DecodeContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ProtoError::MissingPayload(19)));
    }

    #[test]
    fn raw_cursor_is_not_consumed() {
        let message = RawMessage::from(frame(19, |c| c.put_string("hello").unwrap()));
        let before = message.raw.as_ref().unwrap().position();

        let registry = OpcodeRegistry::global();
        let ctx = DecodeContext::default();
        let first = convert(message.clone(), registry, &ctx).unwrap();
        let second = convert(message.clone(), registry, &ctx).unwrap();

        assert_eq!(first, second);
        assert_eq!(message.raw.as_ref().unwrap().position(), before);
    }

    #[test]
    fn mismatched_raw_opcode_is_rejected() {
        let mut message = RawMessage::from(frame(19, |c| c.put_string("x").unwrap()));
        message.opcode = 58;

        let err = convert(message, OpcodeRegistry::global(), &DecodeContext::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ProtoError::OpcodeMismatch {
                expected: 58,
                found: 19
            }
        ));
    }

    #[test]
    fn typed_decode_checks_opcode() {
        let console = frame(19, |c| c.put_string("ready").unwrap());
        let message: ConsoleMessage = decode(&console, &DecodeContext::default()).unwrap();
        assert_eq!(message.message, "ready");

        let err = decode::<CoreProtocol>(&console, &DecodeContext::default()).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::OpcodeMismatch {
                expected: 0,
                found: 19
            }
        ));
    }

    #[test]
    fn typed_decode_accepts_every_shared_kind() {
        let ctx = DecodeContext::default();
        for opcode in [10, 50] {
            let source: FileSource = decode(
                &frame(opcode, |c| {
                    c.put_u32(1);
                    c.put_u32(2);
                }),
                &ctx,
            )
            .unwrap();
            assert_eq!(source.client_id, 2);
        }
    }

    #[test]
    fn unrecognized_view_serializes_opcode() {
        let dispatch = Dispatch::Unrecognized(RawMessage::from(frame(2, |c| c.put_u8(0))));
        let json = serde_json::to_value(DispatchView::from(&dispatch)).unwrap();
        assert_eq!(json["unrecognized"], 2);
        assert_eq!(json["payload_len"], 1);
    }
}
