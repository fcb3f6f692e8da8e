use std::collections::VecDeque;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use bytes::BytesMut;
use irbridge_transport::SerialConfig;
use tracing::{debug, trace};

use crate::code::Code;
use crate::error::{FrameError, Result};
use crate::source::CodeSource;

/// Confirmation line sent by the line-protocol receiver after each code.
pub const DEFAULT_SENTINEL: &str = "OK";

const INITIAL_BUFFER_CAPACITY: usize = 256;
const READ_CHUNK_SIZE: usize = 128;

/// Line-protocol decoding options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineConfig {
    /// The line that confirms the pending code. Default: `OK`.
    pub sentinel: String,
    /// Emit an empty code when the sentinel arrives before any code line.
    /// Default: `true`.
    pub emit_empty: bool,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            emit_empty: true,
        }
    }
}

/// Incremental decoder for the line protocol, independent of any device.
///
/// Feed it raw chunks as they arrive. CR bytes count as line breaks, lines
/// are whitespace-trimmed and blank ones skipped. A non-sentinel line becomes
/// the pending code, replacing whatever was pending before. A sentinel line
/// emits the pending code. The pending code survives the confirmation, so a
/// repeated sentinel emits it again.
#[derive(Debug)]
pub struct LineDecoder {
    buf: BytesMut,
    pending: String,
    config: LineConfig,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::with_config(LineConfig::default())
    }

    pub fn with_config(config: LineConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            pending: String::new(),
            config,
        }
    }

    /// Decode one chunk and return the codes it confirmed, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Code> {
        let mut out = Vec::new();
        self.feed_into(chunk, &mut out);
        out
    }

    /// Like [`feed`](Self::feed), appending into an existing collection.
    pub fn feed_into<E: Extend<Code>>(&mut self, chunk: &[u8], out: &mut E) {
        self.buf
            .extend(chunk.iter().map(|&b| if b == b'\r' { b'\n' } else { b }));

        while let Some(end) = self.buf.iter().position(|&b| b == b'\n') {
            let line = self.buf.split_to(end + 1);
            let text = String::from_utf8_lossy(&line[..end]);
            let message = text.trim();
            if message.is_empty() {
                continue;
            }

            if message == self.config.sentinel {
                if self.pending.is_empty() && !self.config.emit_empty {
                    debug!("confirmation with no pending code");
                    continue;
                }
                out.extend(Some(Code::new(self.pending.as_str())));
            } else {
                if !self.pending.is_empty() && self.pending != message {
                    trace!(replaced = %self.pending, "pending code overwritten");
                }
                self.pending.clear();
                self.pending.push_str(message);
            }
        }
    }

    /// The code waiting for confirmation (empty if none seen yet).
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Bytes of an incomplete trailing line held for the next chunk.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn config(&self) -> &LineConfig {
        &self.config
    }
}

/// Reads the line protocol from a device and hands out confirmed codes.
///
/// Codes decoded from one chunk are handed out one at a time. The device is
/// only read again once they have all been taken, so a slow consumer stalls
/// ingestion instead of growing a queue.
pub struct LineProtocolReader<T> {
    inner: T,
    decoder: LineDecoder,
    ready: VecDeque<Code>,
}

impl<T: Read> LineProtocolReader<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, LineConfig::default())
    }

    pub fn with_config(inner: T, config: LineConfig) -> Self {
        Self {
            inner,
            decoder: LineDecoder::with_config(config),
            ready: VecDeque::new(),
        }
    }

    /// Return the next confirmed code, reading the device as needed (blocking).
    ///
    /// Returns `Err(FrameError::Closed)` when the device reports EOF.
    pub fn read_code(&mut self) -> Result<Code> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            if let Some(code) = self.ready.pop_front() {
                return Ok(code);
            }

            let read = match self.inner.read(&mut chunk) {
                Ok(0) => return Err(FrameError::Closed),
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            self.decoder.feed_into(&chunk[..read], &mut self.ready);
        }
    }

    pub fn decoder(&self) -> &LineDecoder {
        &self.decoder
    }

    /// Borrow the underlying device.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the underlying device.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl LineProtocolReader<File> {
    /// Open the serial device at `path`, configure it, and decode from it.
    pub fn open(
        path: impl AsRef<Path>,
        serial: &SerialConfig,
        config: LineConfig,
    ) -> irbridge_transport::Result<Self> {
        let device = irbridge_transport::open_serial(path, serial)?;
        Ok(Self::with_config(device, config))
    }
}

impl<T: Read> CodeSource for LineProtocolReader<T> {
    fn next_code(&mut self) -> Result<Code> {
        self.read_code()
    }
}
