use crate::opcodes::SentKind;

/// Errors that can occur while dispatching, decoding or building messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// A payload primitive failed; the current message is abandoned.
    #[error("codec error: {0}")]
    Codec(#[from] mlgui_wire::CodecError),

    /// Frame-level error from the underlying stream.
    #[error("frame error: {0}")]
    Frame(#[from] mlgui_wire::FrameError),

    /// A decoder was handed a frame carrying a different opcode.
    #[error("opcode mismatch (expected {expected}, found {found})")]
    OpcodeMismatch { expected: u16, found: u16 },

    /// The generic message has no payload to decode.
    #[error("message with opcode {0} has no payload")]
    MissingPayload(u16),

    /// An outgoing message's encoder could not produce a payload.
    #[error("failed to build {kind:?} message: {reason}")]
    BuildFailed { kind: SentKind, reason: String },

    /// The message kind has no known wire layout.
    #[error("{0:?} has no documented payload layout")]
    Unsupported(SentKind),

    /// The name does not match any sent message kind.
    #[error("unknown message kind '{0}'")]
    UnknownKind(String),

    /// A field value cannot be expressed on the wire.
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
