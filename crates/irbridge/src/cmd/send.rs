use irbridge_relay::ResilientSender;

use crate::cmd::SendArgs;
use crate::exit::{CliError, CliResult, SUCCESS, TRANSPORT_ERROR, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let payload = command_line(&args.command)?;
    let mut sender =
        ResilientSender::with_policy(args.endpoint.endpoint()?, args.endpoint.retry_policy());

    if !sender.attempt_send(payload.as_bytes()) {
        return Err(CliError::new(
            TRANSPORT_ERROR,
            format!(
                "command not delivered to {}",
                args.endpoint.socket.display()
            ),
        ));
    }
    sender.disconnect();
    Ok(SUCCESS)
}

fn command_line(command: &str) -> CliResult<String> {
    let command = command.trim_end_matches(['\r', '\n']);
    if command.trim().is_empty() {
        return Err(CliError::new(USAGE, "command must not be empty"));
    }
    if command.contains('\n') {
        return Err(CliError::new(USAGE, "command must be a single line"));
    }
    Ok(format!("{command}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_adds_single_newline() {
        assert_eq!(command_line("cycle pause").unwrap(), "cycle pause\n");
        assert_eq!(command_line("cycle pause\n").unwrap(), "cycle pause\n");
    }

    #[test]
    fn command_line_rejects_empty_and_multiline() {
        assert_eq!(command_line("  ").unwrap_err().code, USAGE);
        assert_eq!(command_line("a\nb").unwrap_err().code, USAGE);
    }
}
