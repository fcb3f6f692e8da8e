use std::io::Write;
#[cfg(unix)]
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::time::Duration;

#[cfg(unix)]
use irbridge_transport::{ControlStream, UnixDomainSocket};
#[cfg(unix)]
use tracing::debug;

/// Somewhere commands can be delivered.
///
/// [`ResilientSender`](crate::ResilientSender) is generic over this so the
/// connect/close sequence can be observed without a real socket.
pub trait Endpoint {
    type Conn: Write;

    /// Open a fresh connection.
    fn connect(&mut self) -> irbridge_transport::Result<Self::Conn>;

    /// Tear down a connection that is no longer usable.
    fn close(&mut self, conn: Self::Conn) {
        drop(conn);
    }
}

/// The media player's control socket.
#[cfg(unix)]
#[derive(Debug, Clone)]
pub struct UdsEndpoint {
    path: PathBuf,
    write_timeout: Option<Duration>,
}

#[cfg(unix)]
impl UdsEndpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_timeout: None,
        }
    }

    /// Bound how long a single write may block on a stuck player.
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
impl Endpoint for UdsEndpoint {
    type Conn = ControlStream;

    fn connect(&mut self) -> irbridge_transport::Result<ControlStream> {
        let stream = UnixDomainSocket::connect(&self.path)?;
        stream.set_write_timeout(self.write_timeout)?;
        Ok(stream)
    }

    fn close(&mut self, conn: ControlStream) {
        // The peer may already be gone; shutdown errors are expected then.
        if let Err(err) = conn.shutdown() {
            debug!(path = ?self.path, error = %err, "shutdown of stale connection failed");
        }
    }
}
