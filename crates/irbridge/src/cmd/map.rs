use irbridge_frame::Code;
use irbridge_relay::CommandMap;

use crate::cmd::MapArgs;
use crate::exit::{relay_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{print_command_map, print_raw_line, OutputFormat};

pub fn run(args: MapArgs, format: OutputFormat) -> CliResult<i32> {
    let map =
        CommandMap::load(&args.commands).map_err(|err| relay_error("can't read command map", err))?;

    let Some(code) = args.code else {
        print_command_map(&map, format);
        return Ok(SUCCESS);
    };

    match map.get(&Code::new(code.as_str())) {
        Some(command) => {
            print_raw_line(command);
            Ok(SUCCESS)
        }
        None => Err(CliError::new(FAILURE, format!("unknown code: {code}"))),
    }
}
