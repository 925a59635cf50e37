//! Download list messages and the shared `FileInfo` layout.

use std::net::Ipv4Addr;

use mlgui_wire::{ByteCursor, CodecResult, Hash, WireString};
use serde::Serialize;

use crate::message::{decode_list, Decode, DecodeContext, FILE_INFO_TAIL_VERSION};

/// File state that is followed by an abort reason.
const STATE_ABORTED: u8 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub file_id: u32,
    pub network_id: u32,
    pub names: Vec<WireString>,
    #[serde(serialize_with = "super::serialize_hash")]
    pub md4: Hash,
    pub size: u64,
    pub downloaded: u64,
    pub sources: u32,
    pub clients: u32,
    pub state: u8,
    pub abort_reason: Option<WireString>,
    /// One byte per chunk: `'0'` missing, `'1'` partial, `'2'` complete, `'3'` verified.
    pub chunks: WireString,
    pub availability: Vec<NetworkAvailability>,
    pub rate: f64,
    pub chunk_ages: Vec<u32>,
    pub age: u32,
    pub format: FileFormat,
    pub name: WireString,
    pub last_seen: u32,
    pub priority: i32,
    pub comment: WireString,
    pub links: Vec<WireString>,
    pub subfiles: Vec<SubFile>,
    /// Present from protocol 40 on.
    pub extras: Option<FileInfoExtras>,
}

impl FileInfo {
    pub fn is_aborted(&self) -> bool {
        self.state == STATE_ABORTED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkAvailability {
    pub network_id: u32,
    /// One byte per chunk holding the number of sources that have it.
    pub chunks: WireString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubFile {
    pub name: WireString,
    pub size: u64,
    pub format: WireString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfoExtras {
    /// Format guessed by libmagic on the core side.
    pub magic: WireString,
    pub comments: Vec<FileComment>,
    pub user: WireString,
    pub group: WireString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileComment {
    pub ip: Ipv4Addr,
    pub geoip: u8,
    pub name: WireString,
    pub rating: u8,
    pub comment: WireString,
}

impl Decode for FileInfo {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self> {
        let file_id = cursor.get_u32()?;
        let network_id = cursor.get_u32()?;
        let names = decode_list(cursor, ByteCursor::get_string)?;
        let md4 = cursor.get_hash()?;
        let size = cursor.get_u64()?;
        let downloaded = cursor.get_u64()?;
        let sources = cursor.get_u32()?;
        let clients = cursor.get_u32()?;
        let state = cursor.get_u8()?;
        let abort_reason = if state == STATE_ABORTED {
            Some(cursor.get_string()?)
        } else {
            None
        };
        let chunks = cursor.get_string()?;
        let availability = decode_list(cursor, |c| {
            Ok(NetworkAvailability {
                network_id: c.get_u32()?,
                chunks: c.get_string()?,
            })
        })?;
        let rate = cursor.get_float()?;
        let chunk_ages = decode_list(cursor, ByteCursor::get_u32)?;
        let age = cursor.get_u32()?;
        let format = FileFormat::decode(cursor, ctx)?;
        let name = cursor.get_string()?;
        let last_seen = cursor.get_u32()?;
        let priority = cursor.get_i32()?;
        let comment = cursor.get_string()?;
        let links = decode_list(cursor, ByteCursor::get_string)?;
        let subfiles = decode_list(cursor, |c| {
            Ok(SubFile {
                name: c.get_string()?,
                size: c.get_u64()?,
                format: c.get_string()?,
            })
        })?;

        let extras = if ctx.protocol_version >= FILE_INFO_TAIL_VERSION {
            let magic = cursor.get_string()?;
            let comments = decode_list(cursor, |c| {
                Ok(FileComment {
                    ip: c.get_ipv4()?,
                    geoip: c.get_u8()?,
                    name: c.get_string()?,
                    rating: c.get_u8()?,
                    comment: c.get_string()?,
                })
            })?;
            let user = cursor.get_string()?;
            let group = cursor.get_string()?;
            Some(FileInfoExtras {
                magic,
                comments,
                user,
                group,
            })
        } else {
            None
        };

        Ok(Self {
            file_id,
            network_id,
            names,
            md4,
            size,
            downloaded,
            sources,
            clients,
            state,
            abort_reason,
            chunks,
            availability,
            rate,
            chunk_ages,
            age,
            format,
            name,
            last_seen,
            priority,
            comment,
            links,
            subfiles,
            extras,
        })
    }
}

/// Media details the core extracted from a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum FileFormat {
    /// Tag 1.
    Generic {
        extension: WireString,
        kind: WireString,
    },
    /// Tag 2.
    Video {
        codec: WireString,
        width: u32,
        height: u32,
        fps: u32,
        rate: u32,
    },
    /// Tag 3.
    Mp3 {
        title: WireString,
        artist: WireString,
        album: WireString,
        year: WireString,
        comment: WireString,
        track: u32,
        genre: u32,
    },
    /// Tag 4.
    Ogg { streams: Vec<OggStream> },
    /// Tag 0 or anything unknown; nothing follows the tag.
    Unknown { code: u8 },
}

impl Decode for FileFormat {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self> {
        let format = match cursor.get_u8()? {
            1 => FileFormat::Generic {
                extension: cursor.get_string()?,
                kind: cursor.get_string()?,
            },
            2 => FileFormat::Video {
                codec: cursor.get_string()?,
                width: cursor.get_u32()?,
                height: cursor.get_u32()?,
                fps: cursor.get_u32()?,
                rate: cursor.get_u32()?,
            },
            3 => FileFormat::Mp3 {
                title: cursor.get_string()?,
                artist: cursor.get_string()?,
                album: cursor.get_string()?,
                year: cursor.get_string()?,
                comment: cursor.get_string()?,
                track: cursor.get_u32()?,
                genre: cursor.get_u32()?,
            },
            4 => FileFormat::Ogg {
                streams: decode_list(cursor, |c| OggStream::decode(c, ctx))?,
            },
            code => FileFormat::Unknown { code },
        };
        Ok(format)
    }
}

const OGG_STREAM_TYPES: [&str; 6] = ["video", "audio", "text", "index", "vorbis", "theora"];

const OGG_TAG_NAMES: [&str; 21] = [
    "codec",
    "bits_per_sample",
    "duration",
    "",
    "",
    "audio_channels",
    "audio_sample_rate",
    "audio_block_align",
    "audio_average_bytes_per_second",
    "vorbis_version",
    "vorbis_sample_rate",
    "bitrate",
    "vorbis_block_size_0",
    "vorbis_block_size_1",
    "video_width",
    "video_height",
    "video_sample_rate",
    "video_aspect_ratio",
    "theora_cs",
    "theora_quality",
    "theora_average_bytes_per_second",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OggStream {
    pub number: u32,
    pub stream_type: u8,
    pub tags: Vec<OggTag>,
}

impl OggStream {
    pub fn type_name(&self) -> &'static str {
        OGG_STREAM_TYPES
            .get(usize::from(self.stream_type))
            .copied()
            .unwrap_or("unknown")
    }
}

impl Decode for OggStream {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        let number = cursor.get_u32()?;
        let stream_type = cursor.get_u8()?;
        let tags = decode_list(cursor, OggTag::read)?;
        Ok(Self {
            number,
            stream_type,
            tags,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OggTag {
    pub code: u8,
    pub value: OggTagValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OggTagValue {
    Text(WireString),
    Int(u32),
    Float(f64),
    Byte(u8),
    Bitrates(Vec<OggBitrate>),
    /// Unknown tag code; its value layout is unknown and nothing was consumed.
    Unknown,
}

/// Kind 0 is the maximum, 1 the nominal and 2 the minimum bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OggBitrate {
    pub kind: u8,
    pub value: f64,
}

impl OggTag {
    pub fn name(&self) -> &'static str {
        match OGG_TAG_NAMES.get(usize::from(self.code)) {
            Some(name) if !name.is_empty() => name,
            _ => "unknown",
        }
    }

    fn read(cursor: &mut ByteCursor) -> CodecResult<Self> {
        let code = cursor.get_u8()?;
        let value = match code {
            0 => OggTagValue::Text(cursor.get_string()?),
            1 | 2 | 5 | 7 | 12 | 13 | 19 | 20 => OggTagValue::Int(cursor.get_u32()?),
            6 | 8 | 9 | 10 | 14 | 15 | 16 | 17 => OggTagValue::Float(cursor.get_float()?),
            18 => OggTagValue::Byte(cursor.get_u8()?),
            11 => OggTagValue::Bitrates(decode_list(cursor, |c| {
                Ok(OggBitrate {
                    kind: c.get_u8()?,
                    value: c.get_float()?,
                })
            })?),
            _ => OggTagValue::Unknown,
        };
        Ok(Self { code, value })
    }
}

/// `DownloadingFiles` and `DownloadedFiles`: a counted list of `FileInfo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileList {
    pub files: Vec<FileInfo>,
}

impl Decode for FileList {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            files: decode_list(cursor, |c| FileInfo::decode(c, ctx))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDownloadUpdate {
    pub file_id: u32,
    pub downloaded: u64,
    pub rate: f64,
    pub last_seen: u32,
}

impl Decode for FileDownloadUpdate {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            file_id: cursor.get_u32()?,
            downloaded: cursor.get_u64()?,
            rate: cursor.get_float()?,
            last_seen: cursor.get_u32()?,
        })
    }
}

/// `FileAddSource` and `FileRemoveSource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileSource {
    pub file_id: u32,
    pub client_id: u32,
}

impl Decode for FileSource {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            file_id: cursor.get_u32()?,
            client_id: cursor.get_u32()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpdateAvailability {
    pub file_id: u32,
    pub client_id: u32,
    pub availability: WireString,
}

impl Decode for FileUpdateAvailability {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            file_id: cursor.get_u32()?,
            client_id: cursor.get_u32()?,
            availability: cursor.get_string()?,
        })
    }
}
