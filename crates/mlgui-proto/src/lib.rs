//! Typed messages for the MLDonkey GUI protocol.
//!
//! Frames read with [`mlgui_wire::FrameReader`] become [`RawMessage`]s, which
//! [`convert`] turns into a [`CoreMessage`] through the [`OpcodeRegistry`].
//! Outgoing [`GuiMessage`]s are encoded with their canonical opcode.
//! [`CoreClient`] ties both directions to one connection.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod login;
pub mod message;
pub mod opcodes;
pub mod received;
pub mod sent;

pub use client::CoreClient;
pub use dispatch::{convert, convert_frame, decode, Dispatch, DispatchView};
pub use error::{ProtoError, Result};
pub use login::{login_messages, LoginConfig};
pub use message::{Decode, DecodeContext, RawMessage, FILE_INFO_TAIL_VERSION, PROTOCOL_VERSION};
pub use opcodes::{OpcodeRegistry, ReceivedKind, SentKind};
pub use received::{CoreMessage, ReceivedMessage};
pub use sent::{encode, GuiMessage, MessageVersion, PreparedMessage, EXTENSION_POLL};
