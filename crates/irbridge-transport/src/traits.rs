use std::io::Write;

use crate::error::Result;

/// A connected control-endpoint stream. Write-only from irbridge's side:
/// commands go out, nothing is read back.
///
/// On Unix, this wraps a Unix domain socket stream.
pub struct ControlStream {
    inner: ControlStreamInner,
}

enum ControlStreamInner {
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Write for ControlStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            ControlStreamInner::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            ControlStreamInner::Unix(stream) => stream.flush(),
        }
    }
}

impl ControlStream {
    /// Create a ControlStream from a Unix domain socket stream.
    #[cfg(unix)]
    pub(crate) fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: ControlStreamInner::Unix(stream),
        }
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            #[cfg(unix)]
            ControlStreamInner::Unix(stream) => {
                stream.set_write_timeout(timeout).map_err(Into::into)
            }
        }
    }

    /// Shut down both directions. The peer sees EOF; the descriptor is
    /// released when the stream is dropped.
    pub fn shutdown(&self) -> Result<()> {
        match &self.inner {
            #[cfg(unix)]
            ControlStreamInner::Unix(stream) => stream
                .shutdown(std::net::Shutdown::Both)
                .map_err(Into::into),
        }
    }
}

impl std::fmt::Debug for ControlStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            #[cfg(unix)]
            ControlStreamInner::Unix(_) => f
                .debug_struct("ControlStream")
                .field("type", &"unix")
                .finish(),
        }
    }
}
