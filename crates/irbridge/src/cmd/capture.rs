use irbridge_relay::{CodeBus, CommandMap};

use crate::cmd::CaptureArgs;
use crate::exit::{relay_error, CliResult, SUCCESS};
use crate::output::{print_code, OutputFormat};
use crate::sources::start_sources;

pub fn run(args: CaptureArgs, format: OutputFormat) -> CliResult<i32> {
    let commands = match &args.commands {
        Some(path) => {
            Some(CommandMap::load(path).map_err(|err| relay_error("can't read command map", err))?)
        }
        None => None,
    };

    let bus = CodeBus::new();
    let readers = start_sources(&args.devices, &bus)?;
    let consumer = bus.into_consumer();

    let mut printed = 0usize;
    for event in consumer {
        let command = commands.as_ref().and_then(|map| map.get(&event.code));
        print_code(&event, command, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                // Readers may be parked in a device read; process exit reaps them.
                return Ok(SUCCESS);
            }
        }
    }

    for handle in readers {
        let _ = handle.join();
    }
    Ok(SUCCESS)
}
