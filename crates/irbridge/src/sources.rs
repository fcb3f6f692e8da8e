use std::thread::JoinHandle;

use irbridge_frame::{FixedFrameReader, LineProtocolReader};
use irbridge_relay::{spawn_source, CodeBus, SourceEnd, SourceKind};
use tracing::info;

use crate::config::DeviceArgs;
use crate::exit::{relay_error, transport_error, CliResult};

enum Opened {
    Fixed(FixedFrameReader<std::fs::File>),
    Line(LineProtocolReader<std::fs::File>),
}

/// Open every requested device, then start one reader thread per device.
///
/// All devices are opened before any thread starts, so a bad path fails
/// startup without leaving half the readers running.
pub fn start_sources(args: &DeviceArgs, bus: &CodeBus) -> CliResult<Vec<JoinHandle<SourceEnd>>> {
    let mut opened = Vec::new();
    for kind in args.sources() {
        let reader = match kind {
            SourceKind::FixedFrame => {
                FixedFrameReader::open(&args.frame_device, args.frame_size)
                    .map(Opened::Fixed)
            }
            SourceKind::LineProtocol => LineProtocolReader::open(
                &args.line_device,
                &args.serial_config(),
                args.line_config(),
            )
            .map(Opened::Line),
        }
        .map_err(|err| transport_error(&format!("can't open {kind} receiver"), err))?;
        opened.push((kind, reader));
    }

    let mut handles = Vec::with_capacity(opened.len());
    for (kind, reader) in opened {
        let producer = bus.producer(kind);
        let handle = match reader {
            Opened::Fixed(reader) => spawn_source(reader, producer),
            Opened::Line(reader) => spawn_source(reader, producer),
        }
        .map_err(|err| relay_error("can't start reader", err))?;
        info!(source = %kind, "reader started");
        handles.push(handle);
    }
    Ok(handles)
}
