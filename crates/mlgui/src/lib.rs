//! Client side of the MLDonkey GUI protocol.
//!
//! # Crate Structure
//!
//! - [`wire`]: Byte cursor, tagged values, query trees and frame envelope
//! - [`proto`]: Opcode registry, typed message catalog and blocking client

/// Re-export wire types.
pub mod wire {
    pub use mlgui_wire::*;
}

/// Re-export protocol types.
pub mod proto {
    pub use mlgui_proto::*;
}

pub use mlgui_proto::{
    convert, decode, encode, CoreClient, CoreMessage, DecodeContext, Dispatch, GuiMessage,
    LoginConfig, OpcodeRegistry,
};
pub use mlgui_wire::{ByteCursor, Frame, FrameReader, FrameWriter, ReadStatus};
