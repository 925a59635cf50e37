use std::io::{Read, Write};

use mlgui_wire::{FrameReader, FrameWriter, ReadStatus, SharedFrameWriter};

use crate::dispatch::{convert, Dispatch};
use crate::error::Result;
use crate::login::{login_messages, LoginConfig};
use crate::message::{DecodeContext, RawMessage, PROTOCOL_VERSION};
use crate::opcodes::OpcodeRegistry;
use crate::received::CoreMessage;
use crate::sent::{encode, GuiMessage, PreparedMessage};

/// A GUI connection to a core: one reader plus a writer that can be shared
/// with other threads.
pub struct CoreClient<R: Read, W: Write> {
    reader: FrameReader<R>,
    writer: SharedFrameWriter<W>,
    registry: &'static OpcodeRegistry,
    announced_version: u32,
    ctx: DecodeContext,
}

impl<R: Read, W: Write> CoreClient<R, W> {
    pub fn new(reader: FrameReader<R>, writer: FrameWriter<W>) -> Self {
        Self {
            reader,
            writer: SharedFrameWriter::new(writer),
            registry: OpcodeRegistry::global(),
            announced_version: PROTOCOL_VERSION,
            ctx: DecodeContext::default(),
        }
    }

    /// Send the login sequence. Its outcome arrives through [`recv`](Self::recv):
    /// `CoreProtocol` on success or `BadPassword`.
    pub fn login(&mut self, config: &LoginConfig) -> Result<()> {
        config.validate()?;
        self.announced_version = config.protocol_version;
        self.ctx.protocol_version = config.protocol_version;
        for message in login_messages(config) {
            PreparedMessage::new(message).send(&self.writer)?;
        }
        tracing::info!(
            user = %config.user,
            protocol_version = config.protocol_version,
            poll_mode = config.poll_mode,
            "login sent"
        );
        Ok(())
    }

    pub fn send(&self, message: &GuiMessage) -> Result<()> {
        let frame = encode(message)?;
        self.writer.write_frame(&frame)?;
        Ok(())
    }

    /// Read and dispatch one message.
    ///
    /// Returns `None` when the stream has nothing ready or the frame carried no
    /// message.
    pub fn recv(&mut self) -> Result<Option<Dispatch>> {
        let frame = match self.reader.read_frame()? {
            ReadStatus::Frame(frame) => frame,
            ReadStatus::NoMessage | ReadStatus::Pending => return Ok(None),
        };

        let dispatch = convert(RawMessage::from(frame), self.registry, &self.ctx)?;
        if let Dispatch::Decoded(CoreMessage::CoreProtocol(proto)) = &dispatch {
            self.ctx.protocol_version = self.announced_version.min(proto.version);
            tracing::info!(
                core_version = proto.version,
                negotiated = self.ctx.protocol_version,
                "core protocol received"
            );
        }
        Ok(Some(dispatch))
    }

    /// Negotiated decoding state.
    pub fn context(&self) -> &DecodeContext {
        &self.ctx
    }

    /// Another handle to the writer, for sending from other threads.
    pub fn writer(&self) -> SharedFrameWriter<W> {
        self.writer.clone()
    }

    pub fn reader_mut(&mut self) -> &mut FrameReader<R> {
        &mut self.reader
    }
}
