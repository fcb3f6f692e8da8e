//! Fan-in point between the reader threads and the dispatcher.
//!
//! The bus is a zero-capacity channel: a reader blocks in [`CodeProducer::send`]
//! until the dispatcher takes the code, and only then goes back to its
//! device. Codes from one reader keep their order. Codes from different
//! readers interleave in arrival order. Nothing is ever dropped.

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use irbridge_frame::{Code, CodeSource, Codes, FrameError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{RelayError, Result};

/// Which receiver board a code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    FixedFrame,
    LineProtocol,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::FixedFrame => "fixed-frame",
            SourceKind::LineProtocol => "line-protocol",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A code tagged with its source, as carried by the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEvent {
    pub source: SourceKind,
    pub code: Code,
}

/// Returned by [`CodeProducer::send`] when the consumer has gone away.
#[derive(Debug, thiserror::Error)]
#[error("code bus closed; {0} not delivered")]
pub struct BusClosed(pub Code);

pub struct CodeBus {
    tx: SyncSender<CodeEvent>,
    rx: Receiver<CodeEvent>,
}

impl Default for CodeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeBus {
    /// Create a bus with synchronous (rendezvous) handoff.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a bus that buffers up to `capacity` codes before producers block.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::sync_channel(capacity);
        Self { tx, rx }
    }

    /// A producer handle tagging everything it sends with `source`.
    pub fn producer(&self, source: SourceKind) -> CodeProducer {
        CodeProducer {
            source,
            tx: self.tx.clone(),
        }
    }

    /// Give up the ability to create producers and take the consuming end.
    ///
    /// The consumer sees end-of-stream once every producer has been dropped.
    pub fn into_consumer(self) -> CodeConsumer {
        CodeConsumer { rx: self.rx }
    }
}

#[derive(Clone)]
pub struct CodeProducer {
    source: SourceKind,
    tx: SyncSender<CodeEvent>,
}

impl CodeProducer {
    /// Hand a code to the consumer, blocking until it is taken.
    pub fn send(&self, code: Code) -> std::result::Result<(), BusClosed> {
        self.tx
            .send(CodeEvent {
                source: self.source,
                code,
            })
            .map_err(|err| BusClosed(err.0.code))
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }
}

pub struct CodeConsumer {
    rx: Receiver<CodeEvent>,
}

impl CodeConsumer {
    /// Block for the next code. `None` once every producer is gone.
    pub fn recv(&self) -> Option<CodeEvent> {
        self.rx.recv().ok()
    }

    /// Block for the next code, up to `timeout`.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> std::result::Result<CodeEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

impl Iterator for CodeConsumer {
    type Item = CodeEvent;

    fn next(&mut self) -> Option<CodeEvent> {
        self.recv()
    }
}

/// How a reader thread ended.
#[derive(Debug)]
pub enum SourceEnd {
    /// The device failed or closed.
    Failed(FrameError),
    /// The consumer dropped the bus.
    ConsumerGone,
}

/// Move codes from `source` onto the bus until either side gives up.
pub fn pump<S: CodeSource>(source: S, producer: &CodeProducer) -> SourceEnd {
    let mut codes = Codes::new(source);
    for code in codes.by_ref() {
        if let Err(err) = producer.send(code) {
            debug!(source = %producer.source(), "{err}; stopping reader");
            return SourceEnd::ConsumerGone;
        }
    }

    let err = codes.into_termination().unwrap_or(FrameError::Closed);
    warn!(source = %producer.source(), error = %err, "end of stream");
    SourceEnd::Failed(err)
}

/// Run [`pump`] on a dedicated, named thread.
pub fn spawn_source<S>(source: S, producer: CodeProducer) -> Result<JoinHandle<SourceEnd>>
where
    S: CodeSource + Send + 'static,
{
    thread::Builder::new()
        .name(format!("irbridge-{}", producer.source()))
        .spawn(move || pump(source, &producer))
        .map_err(RelayError::Spawn)
}
