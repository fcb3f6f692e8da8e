use irbridge_relay::{CodeBus, CommandMap, Dispatcher, ResilientSender};
use tracing::{error, info, warn};

use crate::cmd::RunArgs;
use crate::exit::{relay_error, CliError, CliResult, FAILURE};
use crate::sources::start_sources;

pub fn run(args: RunArgs) -> CliResult<i32> {
    let commands = CommandMap::load(&args.commands)
        .map_err(|err| relay_error("can't read command map", err))?;
    info!(path = ?args.commands, entries = commands.len(), "command map loaded");

    let endpoint = args.endpoint.endpoint()?;
    let sender = ResilientSender::with_policy(endpoint, args.endpoint.retry_policy());

    let bus = CodeBus::new();
    let readers = start_sources(&args.devices, &bus)?;
    let consumer = bus.into_consumer();

    let mut dispatcher = Dispatcher::new(commands, sender);
    let stats = dispatcher.run(consumer);
    dispatcher.sender_mut().disconnect();

    for handle in readers {
        if handle.join().is_err() {
            warn!("reader thread panicked");
        }
    }

    error!("all code sources ended");
    Err(CliError::new(
        FAILURE,
        format!(
            "all code sources ended (sent {}, dropped {}, unknown {})",
            stats.sent, stats.dropped, stats.unknown
        ),
    ))
}
