//! Opcode tables for both directions of the GUI protocol.
//!
//! Received (core to GUI) and sent (GUI to core) opcodes live in independent
//! numeric spaces: opcode 0 is `CoreProtocol` one way and `ProtocolVersion`
//! the other.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::{ProtoError, Result};

macro_rules! message_kinds {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every kind, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|kind| kind.name() == name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

message_kinds! {
    /// Message kinds the core sends to the GUI.
    ReceivedKind {
        CoreProtocol,
        OptionsInfo,
        DefineSearches,
        ResultInfo,
        SearchResult,
        FileUpdateAvailability,
        FileAddSource,
        ServerUser,
        ServerState,
        ClientInfo,
        ClientState,
        ConsoleMessage,
        NetworkInfo,
        UserInfo,
        RoomInfo,
        RoomMessage,
        RoomAddUser,
        ServerInfo,
        MessageFromClient,
        ConnectedServers,
        SharedFileUpload,
        SharedFileUnshared,
        AddSectionOption,
        AddPluginOption,
        FileDownloadUpdate,
        BadPassword,
        SharedFileInfo,
        ClientStats,
        FileRemoveSource,
        CleanTables,
        FileInfo,
        DownloadingFiles,
        DownloadedFiles,
        Uploaders,
        Pending,
        Search,
        Version,
        Stats,
    }
}

message_kinds! {
    /// Message kinds the GUI sends to the core.
    SentKind {
        ProtocolVersion,
        ConnectMore,
        CleanOldServers,
        KillServer,
        ExtendedSearch,
        DlLink,
        RemoveServer,
        SaveOptions,
        RemoveDownload,
        GetServerUsers,
        SaveFileAs,
        AddClientFriend,
        AddUserFriend,
        RemoveFriend,
        RemoveAllFriends,
        FindFriend,
        ViewUsers,
        ConnectAll,
        ConnectServer,
        DisconnectServer,
        SwitchDownload,
        VerifyAllChunks,
        QueryFormat,
        ModifyMp3Tags,
        SetOption,
        ConsoleCommand,
        Preview,
        ConnectFriend,
        GetClientFiles,
        GetFileLocations,
        GetServerInfo,
        GetClientInfo,
        GetFileInfo,
        GetUserInfo,
        EnableNetwork,
        BrowseUser,
        SearchQuery,
        MessageToClient,
        GetConnectedServers,
        GetDownloadingFiles,
        GetDownloadedFiles,
        GuiExtensions,
        RefreshUploadStats,
        Download,
        SetFilePriority,
        PassWord,
        CloseSearch,
        AddServer,
        MessageVersions,
        RenameFile,
        GetUploaders,
        GetPending,
        GetSearches,
        GetSearch,
        ConnectClient,
        DisconnectClient,
        NetworkMessage,
        InterestedInSources,
        GetVersion,
        ServerRename,
        ServerSetPreferred,
        GetStats,
    }
}

/// Core to GUI. `RoomInfo` arrives under two opcodes depending on core age.
const RECEIVED_OPCODES: &[(u16, ReceivedKind)] = &[
    (0, ReceivedKind::CoreProtocol),
    (1, ReceivedKind::OptionsInfo),
    (3, ReceivedKind::DefineSearches),
    (4, ReceivedKind::ResultInfo),
    (5, ReceivedKind::SearchResult),
    (9, ReceivedKind::FileUpdateAvailability),
    (10, ReceivedKind::FileAddSource),
    (12, ReceivedKind::ServerUser),
    (13, ReceivedKind::ServerState),
    (15, ReceivedKind::ClientInfo),
    (16, ReceivedKind::ClientState),
    (19, ReceivedKind::ConsoleMessage),
    (20, ReceivedKind::NetworkInfo),
    (21, ReceivedKind::UserInfo),
    (22, ReceivedKind::RoomInfo),
    (23, ReceivedKind::RoomMessage),
    (24, ReceivedKind::RoomAddUser),
    (26, ReceivedKind::ServerInfo),
    (27, ReceivedKind::MessageFromClient),
    (28, ReceivedKind::ConnectedServers),
    (31, ReceivedKind::RoomInfo),
    (34, ReceivedKind::SharedFileUpload),
    (35, ReceivedKind::SharedFileUnshared),
    (36, ReceivedKind::AddSectionOption),
    (38, ReceivedKind::AddPluginOption),
    (46, ReceivedKind::FileDownloadUpdate),
    (47, ReceivedKind::BadPassword),
    (48, ReceivedKind::SharedFileInfo),
    (49, ReceivedKind::ClientStats),
    (50, ReceivedKind::FileRemoveSource),
    (51, ReceivedKind::CleanTables),
    (52, ReceivedKind::FileInfo),
    (53, ReceivedKind::DownloadingFiles),
    (54, ReceivedKind::DownloadedFiles),
    (55, ReceivedKind::Uploaders),
    (56, ReceivedKind::Pending),
    (57, ReceivedKind::Search),
    (58, ReceivedKind::Version),
    (59, ReceivedKind::Stats),
];

/// GUI to core, one canonical opcode per kind.
const SENT_OPCODES: &[(u16, SentKind)] = &[
    (0, SentKind::ProtocolVersion),
    (1, SentKind::ConnectMore),
    (2, SentKind::CleanOldServers),
    (3, SentKind::KillServer),
    (4, SentKind::ExtendedSearch),
    (8, SentKind::DlLink),
    (9, SentKind::RemoveServer),
    (10, SentKind::SaveOptions),
    (11, SentKind::RemoveDownload),
    (12, SentKind::GetServerUsers),
    (13, SentKind::SaveFileAs),
    (14, SentKind::AddClientFriend),
    (15, SentKind::AddUserFriend),
    (16, SentKind::RemoveFriend),
    (17, SentKind::RemoveAllFriends),
    (18, SentKind::FindFriend),
    (19, SentKind::ViewUsers),
    (20, SentKind::ConnectAll),
    (21, SentKind::ConnectServer),
    (22, SentKind::DisconnectServer),
    (23, SentKind::SwitchDownload),
    (24, SentKind::VerifyAllChunks),
    (25, SentKind::QueryFormat),
    (26, SentKind::ModifyMp3Tags),
    (28, SentKind::SetOption),
    (29, SentKind::ConsoleCommand),
    (30, SentKind::Preview),
    (31, SentKind::ConnectFriend),
    (33, SentKind::GetClientFiles),
    (34, SentKind::GetFileLocations),
    (35, SentKind::GetServerInfo),
    (36, SentKind::GetClientInfo),
    (37, SentKind::GetFileInfo),
    (38, SentKind::GetUserInfo),
    (40, SentKind::EnableNetwork),
    (41, SentKind::BrowseUser),
    (42, SentKind::SearchQuery),
    (43, SentKind::MessageToClient),
    (44, SentKind::GetConnectedServers),
    (45, SentKind::GetDownloadingFiles),
    (46, SentKind::GetDownloadedFiles),
    (47, SentKind::GuiExtensions),
    (49, SentKind::RefreshUploadStats),
    (50, SentKind::Download),
    (51, SentKind::SetFilePriority),
    (52, SentKind::PassWord),
    (53, SentKind::CloseSearch),
    (54, SentKind::AddServer),
    (55, SentKind::MessageVersions),
    (56, SentKind::RenameFile),
    (57, SentKind::GetUploaders),
    (58, SentKind::GetPending),
    (59, SentKind::GetSearches),
    (60, SentKind::GetSearch),
    (61, SentKind::ConnectClient),
    (62, SentKind::DisconnectClient),
    (63, SentKind::NetworkMessage),
    (64, SentKind::InterestedInSources),
    (65, SentKind::GetVersion),
    (66, SentKind::ServerRename),
    (67, SentKind::ServerSetPreferred),
    (68, SentKind::GetStats),
];

/// Legacy opcodes older cores still accept. Never used when sending.
const SENT_ALIASES: &[(u16, SentKind)] = &[
    (27, SentKind::CloseSearch),
    (32, SentKind::GetServerUsers),
];

/// Bidirectional opcode lookup, built once and read-only afterwards.
#[derive(Debug)]
pub struct OpcodeRegistry {
    received: HashMap<u16, ReceivedKind>,
    sent: HashMap<u16, SentKind>,
    sent_opcodes: HashMap<SentKind, u16>,
}

static GLOBAL: OnceLock<OpcodeRegistry> = OnceLock::new();

impl OpcodeRegistry {
    /// Build the tables.
    ///
    /// # Panics
    ///
    /// If the static tables are inconsistent: an opcode listed twice, or a
    /// sent kind without an opcode.
    pub fn new() -> Self {
        let mut received = HashMap::with_capacity(RECEIVED_OPCODES.len());
        for &(opcode, kind) in RECEIVED_OPCODES {
            assert!(
                received.insert(opcode, kind).is_none(),
                "received opcode {opcode} listed twice"
            );
        }

        let mut sent = HashMap::with_capacity(SENT_OPCODES.len() + SENT_ALIASES.len());
        let mut sent_opcodes = HashMap::with_capacity(SENT_OPCODES.len());
        for &(opcode, kind) in SENT_OPCODES {
            assert!(
                sent.insert(opcode, kind).is_none(),
                "sent opcode {opcode} listed twice"
            );
            assert!(
                sent_opcodes.insert(kind, opcode).is_none(),
                "sent kind {kind} has two canonical opcodes"
            );
        }
        for &(opcode, kind) in SENT_ALIASES {
            assert!(
                sent.insert(opcode, kind).is_none(),
                "sent alias {opcode} collides with another opcode"
            );
        }

        for kind in SentKind::ALL {
            assert!(
                sent_opcodes.contains_key(kind),
                "sent kind {kind} has no opcode"
            );
        }

        Self {
            received,
            sent,
            sent_opcodes,
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    pub fn received_kind(&self, opcode: u16) -> Option<ReceivedKind> {
        self.received.get(&opcode).copied()
    }

    /// First opcode the core uses for `kind`.
    pub fn received_opcode(&self, kind: ReceivedKind) -> u16 {
        RECEIVED_OPCODES
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(opcode, _)| *opcode)
            .unwrap_or_default()
    }

    /// Kind for an outgoing opcode, legacy aliases included.
    pub fn sent_kind(&self, opcode: u16) -> Option<SentKind> {
        self.sent.get(&opcode).copied()
    }

    /// Canonical opcode used when sending `kind`.
    pub fn opcode_value(&self, kind: SentKind) -> u16 {
        // Every kind is checked in `new`.
        self.sent_opcodes.get(&kind).copied().unwrap_or_default()
    }

    /// Canonical opcode for a sent kind given by name, e.g. `"GetVersion"`.
    pub fn opcode_value_by_name(&self, name: &str) -> Result<u16> {
        SentKind::from_name(name)
            .map(|kind| self.opcode_value(kind))
            .ok_or_else(|| ProtoError::UnknownKind(name.to_string()))
    }

    /// Opcodes the core may send, in ascending order.
    pub fn received_opcodes(&self) -> Vec<u16> {
        let mut opcodes: Vec<u16> = self.received.keys().copied().collect();
        opcodes.sort_unstable();
        opcodes
    }
}

impl Default for OpcodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
