use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use irbridge_relay::{CodeEvent, CommandMap};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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
struct CodeOutput<'a> {
    #[serde(flatten)]
    event: &'a CodeEvent,
    command: Option<&'a str>,
    timestamp: String,
}

/// Print one captured code. `command` is the mapped command, if a map was given.
pub fn print_code(event: &CodeEvent, command: Option<&str>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = CodeOutput {
                event,
                command,
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
                .set_header(vec!["SOURCE", "CODE", "COMMAND"])
                .add_row(vec![
                    event.source.to_string(),
                    display_code(event.code.as_str()),
                    command.unwrap_or("-").to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match command {
            Some(command) => println!(
                "source={} code={} command={command}",
                event.source,
                display_code(event.code.as_str())
            ),
            None => println!(
                "source={} code={}",
                event.source,
                display_code(event.code.as_str())
            ),
        },
        OutputFormat::Raw => print_raw_line(event.code.as_str()),
    }
}

#[derive(Serialize)]
struct MapEntry<'a> {
    code: &'a str,
    command: &'a str,
}

#[derive(Serialize)]
struct MapOutput<'a> {
    count: usize,
    entries: Vec<MapEntry<'a>>,
}

pub fn print_command_map(map: &CommandMap, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MapOutput {
                count: map.len(),
                entries: map
                    .iter()
                    .map(|(code, command)| MapEntry { code, command })
                    .collect(),
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
                .set_header(vec!["CODE", "COMMAND"]);
            for (code, command) in map.iter() {
                table.add_row(vec![display_code(code), command.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (code, command) in map.iter() {
                println!("{} => {command}", display_code(code));
            }
        }
        OutputFormat::Raw => {
            for (code, command) in map.iter() {
                print_raw_line(&format!("{code}\t{command}"));
            }
        }
    }
}

pub fn print_raw_line(line: &str) {
    let mut out = std::io::stdout();
    let _ = out.write_all(line.as_bytes());
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}

fn display_code(code: &str) -> String {
    if code.is_empty() {
        "<empty>".to_string()
    } else {
        code.to_string()
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
