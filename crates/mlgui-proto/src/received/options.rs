use mlgui_wire::{ByteCursor, CodecResult, WireString};
use serde::Serialize;

use crate::message::{decode_list, Decode, DecodeContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionValue {
    pub name: WireString,
    pub value: WireString,
}

/// Current values of core options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionsInfo {
    pub options: Vec<OptionValue>,
}

impl Decode for OptionsInfo {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            options: decode_list(cursor, |c| {
                Ok(OptionValue {
                    name: c.get_string()?,
                    value: c.get_string()?,
                })
            })?,
        })
    }
}

/// Describes one option for a settings page.
///
/// Shared by `AddSectionOption` (core sections) and `AddPluginOption`
/// (network plugins), which use the same layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDefinition {
    pub section: WireString,
    pub description: WireString,
    pub name: WireString,
    pub option_type: WireString,
    pub help: WireString,
    pub current: WireString,
    pub default: WireString,
    pub advanced: bool,
}

impl Decode for OptionDefinition {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            section: cursor.get_string()?,
            description: cursor.get_string()?,
            name: cursor.get_string()?,
            option_type: cursor.get_string()?,
            help: cursor.get_string()?,
            current: cursor.get_string()?,
            default: cursor.get_string()?,
            advanced: cursor.get_bool()?,
        })
    }
}
