use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mlgui_proto::{Dispatch, DispatchView};
use serde::Serialize;

const SUMMARY_WIDTH: usize = 96;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    opcode: u16,
    name: String,
    #[serde(flatten)]
    message: DispatchView<'a>,
    timestamp: String,
}

pub fn print_message(opcode: u16, dispatch: &Dispatch, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                opcode,
                name: dispatch.opcode_name(),
                message: DispatchView::from(dispatch),
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OPCODE", "MESSAGE", "BODY"])
                .add_row(vec![
                    opcode.to_string(),
                    dispatch.opcode_name(),
                    summary(dispatch),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "opcode={} message={} body={}",
                opcode,
                dispatch.opcode_name(),
                summary(dispatch)
            );
        }
    }
}

/// One-line rendering of the message body, cut to a readable width.
fn summary(dispatch: &Dispatch) -> String {
    let text = match dispatch {
        Dispatch::Decoded(message) => serde_json::to_value(message)
            .ok()
            .and_then(|value| value.get("body").map(ToString::to_string))
            .unwrap_or_default(),
        Dispatch::Unrecognized(raw) => format!("<{} bytes>", raw.payload_len()),
    };
    truncate(text, SUMMARY_WIDTH)
}

fn truncate(text: String, width: usize) -> String {
    if text.chars().count() <= width {
        return text;
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
