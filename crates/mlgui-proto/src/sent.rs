//! Messages the GUI sends to the core.

use std::io::Write;
use std::net::Ipv4Addr;

use bytes::Bytes;
use mlgui_wire::{ByteCursor, Frame, FrameWriter, QueryNode, SharedFrameWriter};

use crate::error::{ProtoError, Result};
use crate::message::encode_list;
use crate::opcodes::{OpcodeRegistry, SentKind};

/// Extension id that switches the core to poll mode.
pub const EXTENSION_POLL: u32 = 1;

/// One entry of a `MessageVersions` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageVersion {
    pub opcode: u32,
    pub from_gui: bool,
    pub version: u32,
}

/// A GUI-to-core message with its fields.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiMessage {
    ProtocolVersion { version: u32 },
    ConnectMore,
    CleanOldServers,
    KillServer,
    ExtendedSearch,
    DlLink { url: String },
    RemoveServer { server_id: u32 },
    SaveOptions { options: Vec<(String, String)> },
    RemoveDownload { file_id: u32 },
    GetServerUsers { server_id: u32 },
    SaveFileAs { file_id: u32, name: String },
    AddClientFriend { client_id: u32 },
    AddUserFriend { user_id: u32 },
    RemoveFriend { client_id: u32 },
    RemoveAllFriends,
    FindFriend { name: String },
    ViewUsers { server_id: u32 },
    ConnectAll { file_id: u32 },
    ConnectServer { server_id: u32 },
    DisconnectServer { server_id: u32 },
    /// Written as a resume flag: `paused: true` sends 0.
    SwitchDownload { file_id: u32, paused: bool },
    VerifyAllChunks { file_id: u32 },
    QueryFormat,
    ModifyMp3Tags,
    SetOption { name: String, value: String },
    ConsoleCommand { command: String },
    Preview { file_id: u32 },
    ConnectFriend { client_id: u32 },
    GetClientFiles { client_id: u32 },
    GetFileLocations { file_id: u32 },
    GetServerInfo { server_id: u32 },
    GetClientInfo { client_id: u32 },
    GetFileInfo { file_id: u32 },
    GetUserInfo { user_id: u32 },
    EnableNetwork { network_id: u32, enabled: bool },
    BrowseUser { user_id: u32 },
    SearchQuery {
        search_id: u32,
        query: QueryNode,
        max_results: u32,
        search_type: u8,
        network: u32,
    },
    MessageToClient { client_id: u32, message: String },
    GetConnectedServers,
    GetDownloadingFiles,
    GetDownloadedFiles,
    GuiExtensions { extensions: Vec<(u32, bool)> },
    RefreshUploadStats,
    Download { names: Vec<String>, result_id: u32, force: bool },
    SetFilePriority { file_id: u32, priority: i32 },
    PassWord { password: String, user: String },
    CloseSearch { search_id: u32, forget: bool },
    AddServer { network_id: u32, ip: Ipv4Addr, port: u16 },
    MessageVersions { versions: Vec<MessageVersion> },
    RenameFile { file_id: u32, name: String },
    GetUploaders,
    GetPending,
    GetSearches,
    GetSearch { search_id: u32 },
    ConnectClient { client_id: u32 },
    DisconnectClient { client_id: u32 },
    NetworkMessage { network_id: u32, message: String },
    InterestedInSources { interested: bool },
    GetVersion,
    ServerRename { server_id: u32, name: String },
    ServerSetPreferred { server_id: u32, preferred: bool },
    GetStats { network_id: u32 },
}

impl GuiMessage {
    pub fn kind(&self) -> SentKind {
        match self {
            Self::ProtocolVersion { .. } => SentKind::ProtocolVersion,
            Self::ConnectMore => SentKind::ConnectMore,
            Self::CleanOldServers => SentKind::CleanOldServers,
            Self::KillServer => SentKind::KillServer,
            Self::ExtendedSearch => SentKind::ExtendedSearch,
            Self::DlLink { .. } => SentKind::DlLink,
            Self::RemoveServer { .. } => SentKind::RemoveServer,
            Self::SaveOptions { .. } => SentKind::SaveOptions,
            Self::RemoveDownload { .. } => SentKind::RemoveDownload,
            Self::GetServerUsers { .. } => SentKind::GetServerUsers,
            Self::SaveFileAs { .. } => SentKind::SaveFileAs,
            Self::AddClientFriend { .. } => SentKind::AddClientFriend,
            Self::AddUserFriend { .. } => SentKind::AddUserFriend,
            Self::RemoveFriend { .. } => SentKind::RemoveFriend,
            Self::RemoveAllFriends => SentKind::RemoveAllFriends,
            Self::FindFriend { .. } => SentKind::FindFriend,
            Self::ViewUsers { .. } => SentKind::ViewUsers,
            Self::ConnectAll { .. } => SentKind::ConnectAll,
            Self::ConnectServer { .. } => SentKind::ConnectServer,
            Self::DisconnectServer { .. } => SentKind::DisconnectServer,
            Self::SwitchDownload { .. } => SentKind::SwitchDownload,
            Self::VerifyAllChunks { .. } => SentKind::VerifyAllChunks,
            Self::QueryFormat => SentKind::QueryFormat,
            Self::ModifyMp3Tags => SentKind::ModifyMp3Tags,
            Self::SetOption { .. } => SentKind::SetOption,
            Self::ConsoleCommand { .. } => SentKind::ConsoleCommand,
            Self::Preview { .. } => SentKind::Preview,
            Self::ConnectFriend { .. } => SentKind::ConnectFriend,
            Self::GetClientFiles { .. } => SentKind::GetClientFiles,
            Self::GetFileLocations { .. } => SentKind::GetFileLocations,
            Self::GetServerInfo { .. } => SentKind::GetServerInfo,
            Self::GetClientInfo { .. } => SentKind::GetClientInfo,
            Self::GetFileInfo { .. } => SentKind::GetFileInfo,
            Self::GetUserInfo { .. } => SentKind::GetUserInfo,
            Self::EnableNetwork { .. } => SentKind::EnableNetwork,
            Self::BrowseUser { .. } => SentKind::BrowseUser,
            Self::SearchQuery { .. } => SentKind::SearchQuery,
            Self::MessageToClient { .. } => SentKind::MessageToClient,
            Self::GetConnectedServers => SentKind::GetConnectedServers,
            Self::GetDownloadingFiles => SentKind::GetDownloadingFiles,
            Self::GetDownloadedFiles => SentKind::GetDownloadedFiles,
            Self::GuiExtensions { .. } => SentKind::GuiExtensions,
            Self::RefreshUploadStats => SentKind::RefreshUploadStats,
            Self::Download { .. } => SentKind::Download,
            Self::SetFilePriority { .. } => SentKind::SetFilePriority,
            Self::PassWord { .. } => SentKind::PassWord,
            Self::CloseSearch { .. } => SentKind::CloseSearch,
            Self::AddServer { .. } => SentKind::AddServer,
            Self::MessageVersions { .. } => SentKind::MessageVersions,
            Self::RenameFile { .. } => SentKind::RenameFile,
            Self::GetUploaders => SentKind::GetUploaders,
            Self::GetPending => SentKind::GetPending,
            Self::GetSearches => SentKind::GetSearches,
            Self::GetSearch { .. } => SentKind::GetSearch,
            Self::ConnectClient { .. } => SentKind::ConnectClient,
            Self::DisconnectClient { .. } => SentKind::DisconnectClient,
            Self::NetworkMessage { .. } => SentKind::NetworkMessage,
            Self::InterestedInSources { .. } => SentKind::InterestedInSources,
            Self::GetVersion => SentKind::GetVersion,
            Self::ServerRename { .. } => SentKind::ServerRename,
            Self::ServerSetPreferred { .. } => SentKind::ServerSetPreferred,
            Self::GetStats { .. } => SentKind::GetStats,
        }
    }

    /// Append this message's payload (not the opcode) to `cursor`.
    pub fn encode(&self, cursor: &mut ByteCursor) -> Result<()> {
        match self {
            Self::ConnectMore
            | Self::CleanOldServers
            | Self::KillServer
            | Self::ExtendedSearch
            | Self::RemoveAllFriends
            | Self::GetConnectedServers
            | Self::GetDownloadingFiles
            | Self::GetDownloadedFiles
            | Self::RefreshUploadStats
            | Self::GetUploaders
            | Self::GetPending
            | Self::GetSearches
            | Self::GetVersion => {}

            Self::QueryFormat | Self::ModifyMp3Tags => {
                return Err(ProtoError::Unsupported(self.kind()));
            }

            Self::ProtocolVersion { version } => cursor.put_u32(*version),

            Self::DlLink { url } => cursor.put_string(url)?,
            Self::FindFriend { name } => cursor.put_string(name)?,
            Self::ConsoleCommand { command } => cursor.put_string(command)?,

            Self::RemoveServer { server_id }
            | Self::GetServerUsers { server_id }
            | Self::ViewUsers { server_id }
            | Self::ConnectServer { server_id }
            | Self::DisconnectServer { server_id }
            | Self::GetServerInfo { server_id } => cursor.put_u32(*server_id),

            Self::RemoveDownload { file_id }
            | Self::ConnectAll { file_id }
            | Self::VerifyAllChunks { file_id }
            | Self::Preview { file_id }
            | Self::GetFileLocations { file_id }
            | Self::GetFileInfo { file_id } => cursor.put_u32(*file_id),

            Self::AddClientFriend { client_id }
            | Self::RemoveFriend { client_id }
            | Self::ConnectFriend { client_id }
            | Self::GetClientFiles { client_id }
            | Self::GetClientInfo { client_id }
            | Self::ConnectClient { client_id }
            | Self::DisconnectClient { client_id } => cursor.put_u32(*client_id),

            Self::AddUserFriend { user_id }
            | Self::GetUserInfo { user_id }
            | Self::BrowseUser { user_id } => cursor.put_u32(*user_id),

            Self::GetSearch { search_id } => cursor.put_u32(*search_id),
            Self::GetStats { network_id } => cursor.put_u32(*network_id),

            Self::SaveOptions { options } => encode_list(cursor, options, |c, (name, value)| {
                c.put_string(name)?;
                c.put_string(value)
            })?,

            Self::SaveFileAs { file_id, name } | Self::RenameFile { file_id, name } => {
                cursor.put_u32(*file_id);
                cursor.put_string(name)?;
            }

            Self::SwitchDownload { file_id, paused } => {
                cursor.put_u32(*file_id);
                cursor.put_bool(!paused);
            }

            Self::SetOption { name, value } => {
                cursor.put_string(name)?;
                cursor.put_string(value)?;
            }

            Self::EnableNetwork {
                network_id,
                enabled,
            } => {
                cursor.put_u32(*network_id);
                cursor.put_bool(*enabled);
            }

            Self::SearchQuery {
                search_id,
                query,
                max_results,
                search_type,
                network,
            } => {
                cursor.put_u32(*search_id);
                cursor.put_query(query)?;
                cursor.put_u32(*max_results);
                cursor.put_u8(*search_type);
                cursor.put_u32(*network);
            }

            Self::MessageToClient { client_id, message } => {
                cursor.put_u32(*client_id);
                cursor.put_string(message)?;
            }

            Self::GuiExtensions { extensions } => {
                encode_list(cursor, extensions, |c, (id, enabled)| {
                    c.put_u32(*id);
                    c.put_bool(*enabled);
                    Ok(())
                })?
            }

            Self::Download {
                names,
                result_id,
                force,
            } => {
                encode_list(cursor, names, |c, name| c.put_string(name))?;
                cursor.put_u32(*result_id);
                cursor.put_bool(*force);
            }

            Self::SetFilePriority { file_id, priority } => {
                cursor.put_u32(*file_id);
                cursor.put_i32(*priority);
            }

            Self::PassWord { password, user } => {
                cursor.put_string(password)?;
                cursor.put_string(user)?;
            }

            Self::CloseSearch { search_id, forget } => {
                cursor.put_u32(*search_id);
                cursor.put_bool(*forget);
            }

            Self::AddServer {
                network_id,
                ip,
                port,
            } => {
                cursor.put_u32(*network_id);
                cursor.put_ipv4(*ip);
                cursor.put_u16(*port);
            }

            Self::MessageVersions { versions } => encode_list(cursor, versions, |c, v| {
                c.put_u32(v.opcode);
                c.put_bool(v.from_gui);
                c.put_u32(v.version);
                Ok(())
            })?,

            Self::NetworkMessage {
                network_id,
                message,
            } => {
                cursor.put_u32(*network_id);
                cursor.put_string(message)?;
            }

            Self::InterestedInSources { interested } => cursor.put_bool(*interested),

            Self::ServerRename { server_id, name } => {
                cursor.put_u32(*server_id);
                cursor.put_string(name)?;
            }

            Self::ServerSetPreferred {
                server_id,
                preferred,
            } => {
                cursor.put_u32(*server_id);
                cursor.put_bool(*preferred);
            }
        }
        Ok(())
    }
}

/// Encode `message` into a frame carrying its canonical opcode.
pub fn encode(message: &GuiMessage) -> Result<Frame> {
    let kind = message.kind();
    let mut cursor = ByteCursor::new();
    message
        .encode(&mut cursor)
        .map_err(|err| build_failed(kind, err))?;
    Ok(Frame::new(
        OpcodeRegistry::global().opcode_value(kind),
        cursor.into_bytes(),
    ))
}

fn build_failed(kind: SentKind, err: ProtoError) -> ProtoError {
    ProtoError::BuildFailed {
        kind,
        reason: err.to_string(),
    }
}

/// An outgoing message whose payload is built once and reused.
#[derive(Debug, Clone)]
pub struct PreparedMessage {
    message: GuiMessage,
    payload: Option<Bytes>,
}

impl PreparedMessage {
    pub fn new(message: GuiMessage) -> Self {
        Self {
            message,
            payload: None,
        }
    }

    pub fn kind(&self) -> SentKind {
        self.message.kind()
    }

    pub fn message(&self) -> &GuiMessage {
        &self.message
    }

    pub fn is_built(&self) -> bool {
        self.payload.is_some()
    }

    /// Build the payload if it has not been built yet.
    pub fn build(&mut self) -> Result<&Bytes> {
        let payload = match self.payload.take() {
            Some(payload) => payload,
            None => {
                let mut cursor = ByteCursor::new();
                self.message
                    .encode(&mut cursor)
                    .map_err(|err| build_failed(self.message.kind(), err))?;
                cursor.into_bytes()
            }
        };
        Ok(self.payload.insert(payload))
    }

    /// Build if needed and write one frame. Sending twice writes the same bytes.
    pub fn send<W: Write>(&mut self, writer: &SharedFrameWriter<W>) -> Result<()> {
        let opcode = OpcodeRegistry::global().opcode_value(self.kind());
        let payload = self.build()?;
        writer.send(opcode, payload)?;
        Ok(())
    }

    /// Same as [`send`](Self::send) for an unshared writer.
    pub fn write_to<W: Write>(&mut self, writer: &mut FrameWriter<W>) -> Result<()> {
        let opcode = OpcodeRegistry::global().opcode_value(self.kind());
        let payload = self.build()?;
        writer.send(opcode, payload)?;
        Ok(())
    }
}

impl From<GuiMessage> for PreparedMessage {
    fn from(message: GuiMessage) -> Self {
        Self::new(message)
    }
}
