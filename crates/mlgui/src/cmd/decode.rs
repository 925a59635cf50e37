use std::fs::File;
use std::io::{BufReader, Read};

use mlgui_proto::{convert, CoreMessage, DecodeContext, Dispatch, OpcodeRegistry, RawMessage};
use mlgui_wire::{FrameError, FrameReader, ReadStatus};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_message, OutputFormat};

#[derive(Debug, Default, PartialEq, Eq)]
struct DecodeSummary {
    messages: usize,
    failures: usize,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.file)
        .map_err(|err| io_error(&format!("cannot open {}", args.file.display()), err))?;

    let summary = decode_stream(
        BufReader::new(file),
        args.protocol_version,
        args.count,
        |opcode, dispatch| print_message(opcode, dispatch, format),
    )?;

    tracing::info!(
        messages = summary.messages,
        failures = summary.failures,
        "decode finished"
    );
    if summary.failures > 0 {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

/// Read frames until end of input, handing each dispatch result to `emit`.
///
/// A payload that fails to decode is logged and counted; the stream itself
/// stays usable because the frame boundary is already known.
fn decode_stream<R: Read>(
    input: R,
    protocol_version: u32,
    count: Option<usize>,
    mut emit: impl FnMut(u16, &Dispatch),
) -> CliResult<DecodeSummary> {
    let registry = OpcodeRegistry::global();
    let mut ctx = DecodeContext::new(protocol_version);
    let mut reader = FrameReader::new(input);
    let mut summary = DecodeSummary::default();

    loop {
        if count.is_some_and(|count| summary.messages >= count) {
            break;
        }

        let frame = match reader.read_frame() {
            Ok(ReadStatus::Frame(frame)) => frame,
            Ok(ReadStatus::NoMessage | ReadStatus::Pending) => continue,
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => return Err(frame_error("read failed", err)),
        };

        let opcode = frame.opcode;
        match convert(RawMessage::from(frame), registry, &ctx) {
            Ok(dispatch) => {
                if let Dispatch::Decoded(CoreMessage::CoreProtocol(proto)) = &dispatch {
                    ctx.protocol_version = protocol_version.min(proto.version);
                }
                emit(opcode, &dispatch);
                summary.messages += 1;
            }
            Err(err) => {
                tracing::warn!(opcode, error = %err, "message could not be decoded");
                summary.failures += 1;
            }
        }
    }

    Ok(summary)
}
