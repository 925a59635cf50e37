use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mlgui_proto::{CoreClient, CoreMessage, Dispatch, LoginConfig, OpcodeRegistry, ProtoError};
use mlgui_wire::{FrameConfig, FrameError, FrameReader, FrameWriter};

use crate::cmd::{parse_timeout, WatchArgs};
use crate::exit::{
    frame_error, io_error, proto_error, CliError, CliResult, FAILURE, INTERNAL, SUCCESS, USAGE,
};
use crate::output::{print_message, OutputFormat};

/// How long a read may block before the loop checks for Ctrl-C again.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_timeout(&args.timeout)?;
    let addr = resolve(&args.addr)?;

    let stream = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|err| io_error(&format!("connect to {addr} failed"), err))?;
    tracing::info!(%addr, "connected to core");

    let config = FrameConfig {
        read_timeout: Some(POLL_INTERVAL),
        write_timeout: Some(timeout),
        ..FrameConfig::default()
    };
    let read_half = stream
        .try_clone()
        .map_err(|err| io_error("socket clone failed", err))?;
    let reader = FrameReader::with_config_tcp(read_half, config.clone())
        .map_err(|err| frame_error("socket setup failed", err))?;
    let writer = FrameWriter::with_config_tcp(stream, config)
        .map_err(|err| frame_error("socket setup failed", err))?;

    let mut client = CoreClient::new(reader, writer);
    let login = LoginConfig {
        user: args.user.clone(),
        password: args.password.clone().unwrap_or_default(),
        poll_mode: args.poll,
        ..LoginConfig::default()
    };
    client
        .login(&login)
        .map_err(|err| proto_error("login failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let registry = OpcodeRegistry::global();
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let dispatch = match client.recv() {
            Ok(Some(dispatch)) => dispatch,
            Ok(None) => continue,
            Err(ProtoError::Frame(FrameError::ConnectionClosed)) => {
                tracing::info!("core closed the connection");
                break;
            }
            Err(err @ (ProtoError::Codec(_) | ProtoError::OpcodeMismatch { .. })) => {
                tracing::warn!(error = %err, "message could not be decoded");
                continue;
            }
            Err(err) => return Err(proto_error("receive failed", err)),
        };

        if let Dispatch::Decoded(CoreMessage::BadPassword) = dispatch {
            return Err(CliError::new(FAILURE, "core rejected password"));
        }

        let opcode = match &dispatch {
            Dispatch::Decoded(message) => registry.received_opcode(message.kind()),
            Dispatch::Unrecognized(raw) => raw.opcode,
        };
        print_message(opcode, &dispatch, format);
        printed = printed.saturating_add(1);

        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
    }

    Ok(SUCCESS)
}

fn resolve(addr: &str) -> CliResult<SocketAddr> {
    addr.to_socket_addrs()
        .map_err(|err| CliError::new(USAGE, format!("invalid address {addr}: {err}")))?
        .next()
        .ok_or_else(|| CliError::new(USAGE, format!("address {addr} did not resolve")))
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
