//! Runtime settings shared by subcommands.
//!
//! Every path and tunable is a flag with an `IRBRIDGE_*` environment
//! fallback. The defaults match the stock receiver boards and the usual
//! `mpv --input-ipc-server=/tmp/mpv_rpc` setup.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{Args, ValueEnum};
use irbridge_frame::{LineConfig, DEFAULT_FRAME_SIZE, DEFAULT_SENTINEL};
use irbridge_relay::{RetryPolicy, SourceKind, UdsEndpoint};
use irbridge_transport::{SerialConfig, DEFAULT_BAUD};

use crate::exit::{CliError, CliResult, USAGE};

pub const DEFAULT_FRAME_DEVICE: &str = "/dev/mega8_vusb_ir_reader";
pub const DEFAULT_LINE_DEVICE: &str = "/dev/at90_ir_reader";
pub const DEFAULT_SOCKET: &str = "/tmp/mpv_rpc";
pub const DEFAULT_COMMANDS: &str = "commands.json";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    FixedFrame,
    LineProtocol,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::FixedFrame => SourceKind::FixedFrame,
            SourceArg::LineProtocol => SourceKind::LineProtocol,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Receivers to open (comma-separated).
    #[arg(
        long = "source",
        value_delimiter = ',',
        default_value = "fixed-frame,line-protocol",
        env = "IRBRIDGE_SOURCES"
    )]
    pub sources: Vec<SourceArg>,

    /// Fixed-frame receiver device.
    #[arg(long, env = "IRBRIDGE_FRAME_DEVICE", default_value = DEFAULT_FRAME_DEVICE)]
    pub frame_device: PathBuf,

    /// Frame size of the fixed-frame receiver, in bytes.
    #[arg(
        long,
        env = "IRBRIDGE_FRAME_SIZE",
        default_value_t = DEFAULT_FRAME_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub frame_size: usize,

    /// Line-protocol receiver serial device.
    #[arg(long, env = "IRBRIDGE_LINE_DEVICE", default_value = DEFAULT_LINE_DEVICE)]
    pub line_device: PathBuf,

    /// Baud rate of the line-protocol receiver.
    #[arg(long, env = "IRBRIDGE_BAUD", default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// Line that confirms the preceding code.
    #[arg(
        long,
        env = "IRBRIDGE_SENTINEL",
        default_value = DEFAULT_SENTINEL,
        value_parser = parse_sentinel
    )]
    pub sentinel: String,

    /// Drop confirmations that arrive before any code line instead of
    /// emitting an empty code.
    #[arg(long)]
    pub skip_empty: bool,
}

impl DeviceArgs {
    /// Requested sources, deduplicated, in the order given.
    pub fn sources(&self) -> Vec<SourceKind> {
        let mut kinds: Vec<SourceKind> = Vec::new();
        for kind in self.sources.iter().copied().map(SourceKind::from) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    pub fn serial_config(&self) -> SerialConfig {
        SerialConfig { baud: self.baud }
    }

    pub fn line_config(&self) -> LineConfig {
        LineConfig {
            sentinel: self.sentinel.clone(),
            emit_empty: !self.skip_empty,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Media player control socket.
    #[arg(long, env = "IRBRIDGE_SOCKET", default_value = DEFAULT_SOCKET)]
    pub socket: PathBuf,

    /// Connect attempts after a failed write before a command is dropped.
    #[arg(long, env = "IRBRIDGE_RECONNECT_ATTEMPTS", default_value_t = 1)]
    pub reconnect_attempts: u32,

    /// Writes retried on a fresh connection before a command is dropped.
    #[arg(long, env = "IRBRIDGE_WRITE_RETRIES", default_value_t = 1)]
    pub write_retries: u32,

    /// Write timeout on the control socket (e.g. 2s, 500ms). Default: none.
    #[arg(long, env = "IRBRIDGE_WRITE_TIMEOUT", value_name = "DURATION")]
    pub write_timeout: Option<String>,
}

impl EndpointArgs {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            reconnect_attempts: self.reconnect_attempts,
            write_retries: self.write_retries,
        }
    }

    pub fn endpoint(&self) -> CliResult<UdsEndpoint> {
        let timeout = self
            .write_timeout
            .as_deref()
            .map(parse_duration)
            .transpose()?;
        Ok(UdsEndpoint::new(&self.socket).with_write_timeout(timeout))
    }
}

/// Received lines are trimmed and blank ones skipped, so the sentinel must
/// be non-blank to ever match.
fn parse_sentinel(input: &str) -> Result<String, String> {
    let sentinel = input.trim();
    if sentinel.is_empty() {
        return Err("sentinel must not be blank".to_string());
    }
    Ok(sentinel.to_string())
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn sentinel_is_trimmed_and_must_not_be_blank() {
        assert_eq!(parse_sentinel(" ACK "), Ok("ACK".to_string()));
        assert!(parse_sentinel("").is_err());
        assert!(parse_sentinel(" \t").is_err());
    }

    #[test]
    fn sources_are_deduplicated() {
        let args = DeviceArgs {
            sources: vec![
                SourceArg::LineProtocol,
                SourceArg::FixedFrame,
                SourceArg::LineProtocol,
            ],
            frame_device: DEFAULT_FRAME_DEVICE.into(),
            frame_size: 7,
            line_device: DEFAULT_LINE_DEVICE.into(),
            baud: DEFAULT_BAUD,
            sentinel: DEFAULT_SENTINEL.to_string(),
            skip_empty: true,
        };
        assert_eq!(
            args.sources(),
            vec![SourceKind::LineProtocol, SourceKind::FixedFrame]
        );
        assert!(!args.line_config().emit_empty);
        assert_eq!(args.serial_config().baud, 9600);
    }

    #[test]
    fn endpoint_rejects_bad_timeout() {
        let args = EndpointArgs {
            socket: DEFAULT_SOCKET.into(),
            reconnect_attempts: 1,
            write_retries: 1,
            write_timeout: Some("soon".to_string()),
        };
        assert_eq!(args.endpoint().unwrap_err().code, USAGE);
        assert_eq!(args.retry_policy(), RetryPolicy::default());
    }
}
