use clap::builder::RangedU64ValueParser;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::{DeviceArgs, EndpointArgs, DEFAULT_COMMANDS};
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod capture;
pub mod map;
pub mod run;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode remote codes and forward mapped commands to the player.
    Run(RunArgs),
    /// Print decoded codes without sending anything.
    Capture(CaptureArgs),
    /// Send a single command to the player.
    Send(SendArgs),
    /// Show the command map, or look up one code.
    Map(MapArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args),
        Command::Capture(args) => capture::run(args, format),
        Command::Send(args) => send::run(args),
        Command::Map(args) => map::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Command map file (JSON object of code to command).
    #[arg(long, short = 'c', env = "IRBRIDGE_COMMANDS", default_value = DEFAULT_COMMANDS)]
    pub commands: PathBuf,
    #[command(flatten)]
    pub devices: DeviceArgs,
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    #[command(flatten)]
    pub devices: DeviceArgs,
    /// Annotate codes with commands from this map.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub commands: Option<PathBuf>,
    /// Exit after printing N codes.
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Command text; a trailing newline is added.
    pub command: String,
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

#[derive(Args, Debug)]
pub struct MapArgs {
    /// Command map file (JSON object of code to command).
    #[arg(long, short = 'c', env = "IRBRIDGE_COMMANDS", default_value = DEFAULT_COMMANDS)]
    pub commands: PathBuf,
    /// Look up a single code instead of listing the map.
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
