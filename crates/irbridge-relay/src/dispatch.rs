use serde::Serialize;
use tracing::{info, warn};

use crate::bus::{CodeConsumer, CodeEvent};
use crate::command_map::CommandMap;
use crate::endpoint::Endpoint;
use crate::sender::ResilientSender;

/// What happened to one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The mapped command was written to the endpoint.
    Sent,
    /// The code was mapped but the sender gave up on it.
    Dropped,
    /// No command is mapped to the code.
    Unknown,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub sent: u64,
    pub dropped: u64,
    pub unknown: u64,
}

impl DispatchStats {
    fn record(&mut self, outcome: Dispatch) {
        match outcome {
            Dispatch::Sent => self.sent += 1,
            Dispatch::Dropped => self.dropped += 1,
            Dispatch::Unknown => self.unknown += 1,
        }
    }
}

/// Turns codes into commands and delivers them.
pub struct Dispatcher<E: Endpoint> {
    commands: CommandMap,
    sender: ResilientSender<E>,
    stats: DispatchStats,
}

impl<E: Endpoint> Dispatcher<E> {
    pub fn new(commands: CommandMap, sender: ResilientSender<E>) -> Self {
        Self {
            commands,
            sender,
            stats: DispatchStats::default(),
        }
    }

    /// Look up one code and send its command, newline-terminated.
    pub fn dispatch(&mut self, event: &CodeEvent) -> Dispatch {
        let outcome = match self.commands.get(&event.code) {
            Some(command) => {
                info!(source = %event.source, code = %event.code, command, "got code");
                let payload = format!("{command}\n");
                if self.sender.attempt_send(payload.as_bytes()) {
                    Dispatch::Sent
                } else {
                    warn!(code = %event.code, command, "command dropped");
                    Dispatch::Dropped
                }
            }
            None => {
                info!(source = %event.source, code = %event.code, "got unknown code");
                Dispatch::Unknown
            }
        };
        self.stats.record(outcome);
        outcome
    }

    /// Dispatch everything the bus delivers until every producer is gone.
    pub fn run(&mut self, consumer: CodeConsumer) -> DispatchStats {
        for event in consumer {
            self.dispatch(&event);
        }
        info!(
            sent = self.stats.sent,
            dropped = self.stats.dropped,
            unknown = self.stats.unknown,
            "code bus closed"
        );
        self.stats
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn sender(&self) -> &ResilientSender<E> {
        &self.sender
    }

    pub fn sender_mut(&mut self) -> &mut ResilientSender<E> {
        &mut self.sender
    }
}
