use std::io::{ErrorKind, Read};
use std::net::TcpStream;

use bytes::BytesMut;
use tracing::debug;

use crate::codec::{decode_frame, FrameConfig, ReadStatus, LENGTH_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally. A stream that reports `WouldBlock` or
/// `TimedOut` yields [`ReadStatus::Pending`] and keeps the bytes buffered so
/// far; the next call resumes where this one stopped.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next frame.
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` on EOF between frames and
    /// `Err(FrameError::IncompleteFrame)` on EOF inside one.
    pub fn read_frame(&mut self) -> Result<ReadStatus> {
        loop {
            match decode_frame(&mut self.buf, self.config.max_payload_size)? {
                ReadStatus::Frame(frame) => {
                    debug!(
                        opcode = frame.opcode,
                        size = frame.payload.len(),
                        "frame received"
                    );
                    return Ok(ReadStatus::Frame(frame));
                }
                ReadStatus::NoMessage => return Ok(ReadStatus::NoMessage),
                ReadStatus::Pending => {}
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    return Ok(ReadStatus::Pending)
                }
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(self.eof_error());
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    fn eof_error(&self) -> FrameError {
        let received = self.buf.len();
        if received == 0 {
            return FrameError::ConnectionClosed;
        }
        let expected = if received >= LENGTH_SIZE {
            let length = u32::from_le_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]]);
            LENGTH_SIZE + length as usize
        } else {
            LENGTH_SIZE
        };
        FrameError::IncompleteFrame { expected, received }
    }

    /// Bytes buffered but not yet returned as a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameReader<TcpStream> {
    /// Create a frame reader for a TCP stream and apply the read timeout from config.
    pub fn with_config_tcp(inner: TcpStream, config: FrameConfig) -> Result<Self> {
        inner.set_read_timeout(config.read_timeout)?;
        Ok(Self::with_config(inner, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use bytes::{BufMut, BytesMut};

    use super::*;
    use crate::codec::{encode_frame, Frame};

    fn frame(status: ReadStatus) -> Frame {
        status.into_frame().expect("expected a complete frame")
    }

    #[test]
    fn read_single_frame() {
        let mut wire = BytesMut::new();
        encode_frame(19, b"hello", &mut wire).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        let f = frame(reader.read_frame().unwrap());

        assert_eq!(f.opcode, 19);
        assert_eq!(f.payload.as_ref(), b"hello");
    }

    #[test]
    fn read_multiple_frames() {
        let mut wire = BytesMut::new();
        encode_frame(1, b"one", &mut wire).unwrap();
        encode_frame(2, b"two", &mut wire).unwrap();
        encode_frame(3, b"three", &mut wire).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));

        let f1 = frame(reader.read_frame().unwrap());
        let f2 = frame(reader.read_frame().unwrap());
        let f3 = frame(reader.read_frame().unwrap());

        assert_eq!((f1.opcode, f1.payload.as_ref()), (1, b"one".as_ref()));
        assert_eq!((f2.opcode, f2.payload.as_ref()), (2, b"two".as_ref()));
        assert_eq!((f3.opcode, f3.payload.as_ref()), (3, b"three".as_ref()));
    }

    #[test]
    fn read_frame_with_large_payload() {
        let payload = vec![0xAB; 64 * 1024];
        let mut wire = BytesMut::new();
        encode_frame(52, &payload, &mut wire).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        let f = frame(reader.read_frame().unwrap());

        assert_eq!(f.opcode, 52);
        assert_eq!(f.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let mut wire = BytesMut::new();
        encode_frame(4, b"slow", &mut wire).unwrap();

        let byte_reader = ByteByByteReader {
            bytes: wire.to_vec(),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);

        let f = frame(reader.read_frame().unwrap());
        assert_eq!(f.opcode, 4);
        assert_eq!(f.payload.as_ref(), b"slow");
    }

    #[test]
    fn zero_length_yields_no_message() {
        let mut wire = BytesMut::new();
        wire.put_u32_le(0);
        encode_frame(47, b"", &mut wire).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        assert_eq!(reader.read_frame().unwrap(), ReadStatus::NoMessage);
        assert_eq!(frame(reader.read_frame().unwrap()).opcode, 47);
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut partial = BytesMut::new();
        partial.put_u32_le(18);
        partial.put_u16_le(2);
        partial.put_slice(b"only-part");

        let mut reader = FrameReader::new(Cursor::new(partial.to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::IncompleteFrame {
                expected: 22,
                received: 15
            }
        ));
    }

    #[test]
    fn connection_closed_inside_length_field() {
        let mut reader = FrameReader::new(Cursor::new(vec![7u8, 0]));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::IncompleteFrame {
                expected: 4,
                received: 2
            }
        ));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let mut wire = BytesMut::new();
        wire.put_u32_le(1024);
        wire.put_u16_le(1);

        let cfg = FrameConfig {
            max_payload_size: 16,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(Cursor::new(wire.to_vec()), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            if buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn roundtrip_over_pipe() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::FrameWriter::new(left);
        let mut reader = FrameReader::new(right);

        writer.send(29, b"vd").unwrap();
        let f = frame(reader.read_frame().unwrap());

        assert_eq!(f.opcode, 29);
        assert_eq!(f.payload.as_ref(), b"vd");
    }

    #[test]
    fn concurrent_reader_writer_threads() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::FrameWriter::new(left);
        let reader = FrameReader::new(right);
        let reader = Arc::new(Mutex::new(reader));

        let reader_thread = {
            let reader = Arc::clone(&reader);
            std::thread::spawn(move || {
                for expected in 0..64u16 {
                    let status = reader.lock().unwrap().read_frame().unwrap();
                    let f = frame(status);
                    assert_eq!(f.opcode, expected % 5);
                    assert_eq!(f.payload.as_ref(), format!("msg-{expected}").as_bytes());
                }
            })
        };

        for i in 0..64u16 {
            let payload = format!("msg-{i}");
            writer.send(i % 5, payload.as_bytes()).unwrap();
        }

        reader_thread.join().unwrap();
    }

    #[test]
    fn empty_reader_hands_back_stream() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let reader = FrameReader::new(cursor);

        assert_eq!(reader.buffered(), 0);
        assert!(reader.into_inner().into_inner().is_empty());
    }

    #[test]
    fn would_block_is_pending_and_keeps_partial_bytes() {
        let mut wire = BytesMut::new();
        encode_frame(7, b"ok", &mut wire).unwrap();

        let reader = StallingReader {
            bytes: wire.to_vec(),
            pos: 0,
            stall_at: 3,
            stalled: false,
            kind: ErrorKind::WouldBlock,
        };
        let mut framed = FrameReader::new(reader);

        assert_eq!(framed.read_frame().unwrap(), ReadStatus::Pending);
        assert_eq!(framed.buffered(), 3);

        let f = frame(framed.read_frame().unwrap());
        assert_eq!(f.opcode, 7);
        assert_eq!(f.payload.as_ref(), b"ok");
    }

    #[test]
    fn timed_out_is_pending() {
        let reader = StallingReader {
            bytes: Vec::new(),
            pos: 0,
            stall_at: 0,
            stalled: false,
            kind: ErrorKind::TimedOut,
        };
        let mut framed = FrameReader::new(reader);
        assert_eq!(framed.read_frame().unwrap(), ReadStatus::Pending);
    }

    #[test]
    fn other_io_errors_propagate() {
        let reader = StallingReader {
            bytes: Vec::new(),
            pos: 0,
            stall_at: 0,
            stalled: false,
            kind: ErrorKind::ConnectionReset,
        };
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::ConnectionReset));
    }

    /// Delivers `stall_at` bytes, fails once with `kind`, then delivers the rest.
    struct StallingReader {
        bytes: Vec<u8>,
        pos: usize,
        stall_at: usize,
        stalled: bool,
        kind: ErrorKind,
    }

    impl Read for StallingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.stalled && self.pos == self.stall_at {
                self.stalled = true;
                return Err(std::io::Error::from(self.kind));
            }
            let end = if self.stalled {
                self.bytes.len()
            } else {
                self.stall_at
            };
            let n = (end - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn interrupted_read_retries() {
        let mut wire = BytesMut::new();
        encode_frame(8, b"ok", &mut wire).unwrap();

        let reader = InterruptedThenData {
            state: 0,
            bytes: wire.to_vec(),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let f = frame(framed.read_frame().unwrap());

        assert_eq!(f.opcode, 8);
        assert_eq!(f.payload.as_ref(), b"ok");
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn applies_read_timeout_for_tcp_stream() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let connector = std::thread::spawn(move || TcpStream::connect(addr).unwrap());
        let (stream, _) = listener.accept().unwrap();
        let _client = connector.join().unwrap();

        let cfg = FrameConfig {
            read_timeout: Some(std::time::Duration::from_millis(10)),
            ..FrameConfig::default()
        };

        let mut reader = FrameReader::with_config_tcp(stream, cfg).unwrap();
        assert_eq!(reader.read_frame().unwrap(), ReadStatus::Pending);
        assert_eq!(
            reader.into_inner().read_timeout().unwrap(),
            Some(std::time::Duration::from_millis(10))
        );
    }
}
