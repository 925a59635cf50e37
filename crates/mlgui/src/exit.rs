use std::fmt;
use std::io;

use mlgui_proto::ProtoError;
use mlgui_wire::{CodecError, FrameError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => TRANSPORT_ERROR,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        FrameError::Codec(err) => codec_error(context, err),
        FrameError::PayloadTooLarge { .. }
        | FrameError::LengthTooShort(_)
        | FrameError::IncompleteFrame { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn proto_error(context: &str, err: ProtoError) -> CliError {
    match err {
        ProtoError::Frame(err) => frame_error(context, err),
        ProtoError::Codec(err) => codec_error(context, err),
        ProtoError::OpcodeMismatch { .. } | ProtoError::MissingPayload(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ProtoError::UnknownKind(_) | ProtoError::InvalidField { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_frame_is_data_invalid() {
        let err = frame_error(
            "read failed",
            FrameError::IncompleteFrame {
                expected: 10,
                received: 4,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("read failed: "));
    }

    #[test]
    fn refused_connection_is_transport() {
        let err = io_error(
            "connect failed",
            io::Error::from(io::ErrorKind::ConnectionRefused),
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
    }

    #[test]
    fn proto_errors_unwrap_layers() {
        let err = proto_error(
            "recv failed",
            ProtoError::Frame(FrameError::Io(io::Error::from(io::ErrorKind::TimedOut))),
        );
        assert_eq!(err.code, TIMEOUT);

        let err = proto_error(
            "decode failed",
            ProtoError::Codec(CodecError::OutOfData {
                needed: 4,
                remaining: 0,
            }),
        );
        assert_eq!(err.code, DATA_INVALID);
    }
}
