//! Messages the core sends to the GUI.
//!
//! Every payload layout has a [`Decode`] impl in one of the submodules;
//! [`CoreMessage`] ties each [`ReceivedKind`] to the type it decodes into.

mod client;
pub(crate) mod file;
mod host;
mod network;
mod options;
mod room;
mod search;
mod server;
mod session;
mod upload;

use std::fmt::Write as _;

use mlgui_wire::{ByteCursor, CodecResult, Hash};
use serde::{Serialize, Serializer};

pub use client::{ClientInfo, ClientState, ClientStats, MessageFromClient, NetworkServers, UserInfo};
pub use file::{
    FileComment, FileDownloadUpdate, FileFormat, FileInfo, FileInfoExtras, FileList, FileSource,
    FileUpdateAvailability, NetworkAvailability, OggBitrate, OggStream, OggTag, OggTagValue,
    SubFile,
};
pub use host::{ClientKind, HostState};
pub use network::{NetworkFlag, NetworkInfo, Stats, StatsRow, StatsTable};
pub use options::{OptionDefinition, OptionValue, OptionsInfo};
pub use room::{RoomAddUser, RoomInfo, RoomMessage};
pub use search::{DefineSearches, ResultInfo, SearchForm, SearchPayload, SearchResult};
pub use server::{ConnectedServers, ServerInfo, ServerState, ServerUser};
pub use session::{CleanTables, ConsoleMessage, CoreProtocol, CoreVersion};
pub use upload::{ClientIdList, SharedFileInfo, SharedFileUnshared, SharedFileUpload};

use crate::message::{Decode, DecodeContext};
use crate::opcodes::ReceivedKind;

/// Hashes serialize as lowercase hex.
pub(crate) fn serialize_hash<S: Serializer>(
    hash: &Hash,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut hex = String::with_capacity(hash.len() * 2);
    for byte in hash {
        let _ = write!(hex, "{byte:02x}");
    }
    serializer.serialize_str(&hex)
}

/// A payload type with a fixed set of received kinds it can decode.
///
/// Used by [`crate::decode`] to check a frame's opcode before decoding.
pub trait ReceivedMessage: Decode {
    const KINDS: &'static [ReceivedKind];
}

macro_rules! received_message {
    ($ty:ty => $($kind:ident),+) => {
        impl ReceivedMessage for $ty {
            const KINDS: &'static [ReceivedKind] = &[$(ReceivedKind::$kind),+];
        }
    };
}

received_message!(CoreProtocol => CoreProtocol);
received_message!(OptionsInfo => OptionsInfo);
received_message!(DefineSearches => DefineSearches);
received_message!(ResultInfo => ResultInfo);
received_message!(SearchResult => SearchResult);
received_message!(FileUpdateAvailability => FileUpdateAvailability);
received_message!(FileSource => FileAddSource, FileRemoveSource);
received_message!(ServerUser => ServerUser);
received_message!(ServerState => ServerState);
received_message!(ClientInfo => ClientInfo);
received_message!(ClientState => ClientState);
received_message!(ConsoleMessage => ConsoleMessage);
received_message!(NetworkInfo => NetworkInfo);
received_message!(UserInfo => UserInfo);
received_message!(RoomInfo => RoomInfo);
received_message!(RoomMessage => RoomMessage);
received_message!(RoomAddUser => RoomAddUser);
received_message!(ServerInfo => ServerInfo);
received_message!(MessageFromClient => MessageFromClient);
received_message!(ConnectedServers => ConnectedServers);
received_message!(SharedFileUpload => SharedFileUpload);
received_message!(SharedFileUnshared => SharedFileUnshared);
received_message!(OptionDefinition => AddSectionOption, AddPluginOption);
received_message!(FileDownloadUpdate => FileDownloadUpdate);
received_message!(SharedFileInfo => SharedFileInfo);
received_message!(ClientStats => ClientStats);
received_message!(CleanTables => CleanTables);
received_message!(FileInfo => FileInfo);
received_message!(FileList => DownloadingFiles, DownloadedFiles);
received_message!(ClientIdList => Uploaders, Pending);
received_message!(SearchPayload => Search);
received_message!(CoreVersion => Version);
received_message!(Stats => Stats);

/// A decoded core-to-GUI message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body")]
pub enum CoreMessage {
    CoreProtocol(CoreProtocol),
    OptionsInfo(OptionsInfo),
    DefineSearches(DefineSearches),
    ResultInfo(ResultInfo),
    SearchResult(SearchResult),
    FileUpdateAvailability(FileUpdateAvailability),
    FileAddSource(FileSource),
    ServerUser(ServerUser),
    ServerState(ServerState),
    ClientInfo(ClientInfo),
    ClientState(ClientState),
    ConsoleMessage(ConsoleMessage),
    NetworkInfo(NetworkInfo),
    UserInfo(UserInfo),
    RoomInfo(RoomInfo),
    RoomMessage(RoomMessage),
    RoomAddUser(RoomAddUser),
    ServerInfo(ServerInfo),
    MessageFromClient(MessageFromClient),
    ConnectedServers(ConnectedServers),
    SharedFileUpload(SharedFileUpload),
    SharedFileUnshared(SharedFileUnshared),
    AddSectionOption(OptionDefinition),
    AddPluginOption(OptionDefinition),
    FileDownloadUpdate(FileDownloadUpdate),
    BadPassword,
    SharedFileInfo(SharedFileInfo),
    ClientStats(ClientStats),
    FileRemoveSource(FileSource),
    CleanTables(CleanTables),
    FileInfo(Box<FileInfo>),
    DownloadingFiles(FileList),
    DownloadedFiles(FileList),
    Uploaders(ClientIdList),
    Pending(ClientIdList),
    Search(SearchPayload),
    Version(CoreVersion),
    Stats(Stats),
}

impl CoreMessage {
    pub fn kind(&self) -> ReceivedKind {
        match self {
            Self::CoreProtocol(_) => ReceivedKind::CoreProtocol,
            Self::OptionsInfo(_) => ReceivedKind::OptionsInfo,
            Self::DefineSearches(_) => ReceivedKind::DefineSearches,
            Self::ResultInfo(_) => ReceivedKind::ResultInfo,
            Self::SearchResult(_) => ReceivedKind::SearchResult,
            Self::FileUpdateAvailability(_) => ReceivedKind::FileUpdateAvailability,
            Self::FileAddSource(_) => ReceivedKind::FileAddSource,
            Self::ServerUser(_) => ReceivedKind::ServerUser,
            Self::ServerState(_) => ReceivedKind::ServerState,
            Self::ClientInfo(_) => ReceivedKind::ClientInfo,
            Self::ClientState(_) => ReceivedKind::ClientState,
            Self::ConsoleMessage(_) => ReceivedKind::ConsoleMessage,
            Self::NetworkInfo(_) => ReceivedKind::NetworkInfo,
            Self::UserInfo(_) => ReceivedKind::UserInfo,
            Self::RoomInfo(_) => ReceivedKind::RoomInfo,
            Self::RoomMessage(_) => ReceivedKind::RoomMessage,
            Self::RoomAddUser(_) => ReceivedKind::RoomAddUser,
            Self::ServerInfo(_) => ReceivedKind::ServerInfo,
            Self::MessageFromClient(_) => ReceivedKind::MessageFromClient,
            Self::ConnectedServers(_) => ReceivedKind::ConnectedServers,
            Self::SharedFileUpload(_) => ReceivedKind::SharedFileUpload,
            Self::SharedFileUnshared(_) => ReceivedKind::SharedFileUnshared,
            Self::AddSectionOption(_) => ReceivedKind::AddSectionOption,
            Self::AddPluginOption(_) => ReceivedKind::AddPluginOption,
            Self::FileDownloadUpdate(_) => ReceivedKind::FileDownloadUpdate,
            Self::BadPassword => ReceivedKind::BadPassword,
            Self::SharedFileInfo(_) => ReceivedKind::SharedFileInfo,
            Self::ClientStats(_) => ReceivedKind::ClientStats,
            Self::FileRemoveSource(_) => ReceivedKind::FileRemoveSource,
            Self::CleanTables(_) => ReceivedKind::CleanTables,
            Self::FileInfo(_) => ReceivedKind::FileInfo,
            Self::DownloadingFiles(_) => ReceivedKind::DownloadingFiles,
            Self::DownloadedFiles(_) => ReceivedKind::DownloadedFiles,
            Self::Uploaders(_) => ReceivedKind::Uploaders,
            Self::Pending(_) => ReceivedKind::Pending,
            Self::Search(_) => ReceivedKind::Search,
            Self::Version(_) => ReceivedKind::Version,
            Self::Stats(_) => ReceivedKind::Stats,
        }
    }

    /// Decode the payload of `kind` from a cursor positioned after the opcode.
    pub fn decode_kind(
        kind: ReceivedKind,
        cursor: &mut ByteCursor,
        ctx: &DecodeContext,
    ) -> CodecResult<Self> {
        Ok(match kind {
            ReceivedKind::CoreProtocol => Self::CoreProtocol(Decode::decode(cursor, ctx)?),
            ReceivedKind::OptionsInfo => Self::OptionsInfo(Decode::decode(cursor, ctx)?),
            ReceivedKind::DefineSearches => Self::DefineSearches(Decode::decode(cursor, ctx)?),
            ReceivedKind::ResultInfo => Self::ResultInfo(Decode::decode(cursor, ctx)?),
            ReceivedKind::SearchResult => Self::SearchResult(Decode::decode(cursor, ctx)?),
            ReceivedKind::FileUpdateAvailability => {
                Self::FileUpdateAvailability(Decode::decode(cursor, ctx)?)
            }
            ReceivedKind::FileAddSource => Self::FileAddSource(Decode::decode(cursor, ctx)?),
            ReceivedKind::ServerUser => Self::ServerUser(Decode::decode(cursor, ctx)?),
            ReceivedKind::ServerState => Self::ServerState(Decode::decode(cursor, ctx)?),
            ReceivedKind::ClientInfo => Self::ClientInfo(Decode::decode(cursor, ctx)?),
            ReceivedKind::ClientState => Self::ClientState(Decode::decode(cursor, ctx)?),
            ReceivedKind::ConsoleMessage => Self::ConsoleMessage(Decode::decode(cursor, ctx)?),
            ReceivedKind::NetworkInfo => Self::NetworkInfo(Decode::decode(cursor, ctx)?),
            ReceivedKind::UserInfo => Self::UserInfo(Decode::decode(cursor, ctx)?),
            ReceivedKind::RoomInfo => Self::RoomInfo(Decode::decode(cursor, ctx)?),
            ReceivedKind::RoomMessage => Self::RoomMessage(Decode::decode(cursor, ctx)?),
            ReceivedKind::RoomAddUser => Self::RoomAddUser(Decode::decode(cursor, ctx)?),
            ReceivedKind::ServerInfo => Self::ServerInfo(Decode::decode(cursor, ctx)?),
            ReceivedKind::MessageFromClient => {
                Self::MessageFromClient(Decode::decode(cursor, ctx)?)
            }
            ReceivedKind::ConnectedServers => Self::ConnectedServers(Decode::decode(cursor, ctx)?),
            ReceivedKind::SharedFileUpload => Self::SharedFileUpload(Decode::decode(cursor, ctx)?),
            ReceivedKind::SharedFileUnshared => {
                Self::SharedFileUnshared(Decode::decode(cursor, ctx)?)
            }
            ReceivedKind::AddSectionOption => Self::AddSectionOption(Decode::decode(cursor, ctx)?),
            ReceivedKind::AddPluginOption => Self::AddPluginOption(Decode::decode(cursor, ctx)?),
            ReceivedKind::FileDownloadUpdate => {
                Self::FileDownloadUpdate(Decode::decode(cursor, ctx)?)
            }
            ReceivedKind::BadPassword => Self::BadPassword,
            ReceivedKind::SharedFileInfo => Self::SharedFileInfo(Decode::decode(cursor, ctx)?),
            ReceivedKind::ClientStats => Self::ClientStats(Decode::decode(cursor, ctx)?),
            ReceivedKind::FileRemoveSource => Self::FileRemoveSource(Decode::decode(cursor, ctx)?),
            ReceivedKind::CleanTables => Self::CleanTables(Decode::decode(cursor, ctx)?),
            ReceivedKind::FileInfo => Self::FileInfo(Box::new(FileInfo::decode(cursor, ctx)?)),
            ReceivedKind::DownloadingFiles => Self::DownloadingFiles(Decode::decode(cursor, ctx)?),
            ReceivedKind::DownloadedFiles => Self::DownloadedFiles(Decode::decode(cursor, ctx)?),
            ReceivedKind::Uploaders => Self::Uploaders(Decode::decode(cursor, ctx)?),
            ReceivedKind::Pending => Self::Pending(Decode::decode(cursor, ctx)?),
            ReceivedKind::Search => Self::Search(Decode::decode(cursor, ctx)?),
            ReceivedKind::Version => Self::Version(Decode::decode(cursor, ctx)?),
            ReceivedKind::Stats => Self::Stats(Decode::decode(cursor, ctx)?),
        })
    }
}
