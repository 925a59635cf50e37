use mlgui_wire::{ByteCursor, CodecResult, QueryNode, Tag, WireString};
use serde::Serialize;

use crate::message::{decode_list, Decode, DecodeContext};

/// Search forms the core offers, each a named query template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefineSearches {
    pub searches: Vec<SearchForm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchForm {
    pub name: WireString,
    pub query: QueryNode,
}

impl Decode for DefineSearches {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            searches: decode_list(cursor, |c| {
                Ok(SearchForm {
                    name: c.get_string()?,
                    query: c.get_query()?,
                })
            })?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultInfo {
    pub result_id: u32,
    pub network_id: u32,
    pub names: Vec<WireString>,
    pub uids: Vec<WireString>,
    pub size: u64,
    pub format: WireString,
    pub file_type: WireString,
    pub metadata: Vec<Tag>,
    pub comment: WireString,
    pub already_downloaded: bool,
    pub time: u32,
}

impl Decode for ResultInfo {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            result_id: cursor.get_u32()?,
            network_id: cursor.get_u32()?,
            names: decode_list(cursor, ByteCursor::get_string)?,
            uids: decode_list(cursor, ByteCursor::get_string)?,
            size: cursor.get_u64()?,
            format: cursor.get_string()?,
            file_type: cursor.get_string()?,
            metadata: cursor.get_tags()?,
            comment: cursor.get_string()?,
            already_downloaded: cursor.get_bool()?,
            time: cursor.get_u32()?,
        })
    }
}

/// Links a search to one of its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub search_id: u32,
    pub result_id: u32,
}

impl Decode for SearchResult {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            search_id: cursor.get_u32()?,
            result_id: cursor.get_u32()?,
        })
    }
}

/// Search description sent back for `GetSearch`. Its layout is undocumented
/// so the payload is kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPayload {
    pub payload: Vec<u8>,
}

impl Decode for SearchPayload {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        let payload = cursor.get_bytes(cursor.remaining())?;
        Ok(Self {
            payload: payload.to_vec(),
        })
    }
}
