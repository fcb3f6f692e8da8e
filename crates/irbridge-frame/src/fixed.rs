use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use tracing::warn;

use crate::code::Code;
use crate::error::{FrameError, Result};
use crate::source::CodeSource;

/// Frame size of the fixed-frame receiver board, in bytes.
pub const DEFAULT_FRAME_SIZE: usize = 7;

/// Reads fixed-width binary frames and encodes each one as a hex [`Code`].
///
/// Frame boundaries are implicit: the device is assumed to hand over exactly
/// one whole frame per read. A short read is not accumulated. The whole frame
/// buffer is encoded anyway, so the tail holds bytes left over from the
/// previous frame (or zeros before the first one). Such reads are logged but
/// otherwise passed through unchanged.
pub struct FixedFrameReader<T> {
    inner: T,
    frame: Vec<u8>,
}

impl<T: Read> FixedFrameReader<T> {
    /// Create a reader with the default 7-byte frame.
    pub fn new(inner: T) -> Self {
        Self::with_frame_size(inner, DEFAULT_FRAME_SIZE)
    }

    /// Create a reader with an explicit frame size. A size of zero is treated as one.
    pub fn with_frame_size(inner: T, frame_size: usize) -> Self {
        Self {
            inner,
            frame: vec![0u8; frame_size.max(1)],
        }
    }

    /// Read the next frame (blocking) and encode it.
    ///
    /// Returns `Err(FrameError::Closed)` when the device reports EOF.
    pub fn read_code(&mut self) -> Result<Code> {
        loop {
            match self.inner.read(&mut self.frame) {
                Ok(0) => return Err(FrameError::Closed),
                Ok(n) => {
                    if n < self.frame.len() {
                        warn!(read = n, expected = self.frame.len(), "short frame read");
                    }
                    return Ok(Code::from_frame(&self.frame));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame.len()
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

impl FixedFrameReader<File> {
    /// Open the device at `path` and read `frame_size`-byte frames from it.
    pub fn open(path: impl AsRef<Path>, frame_size: usize) -> irbridge_transport::Result<Self> {
        let device = irbridge_transport::open_device(path)?;
        Ok(Self::with_frame_size(device, frame_size))
    }
}

impl<T: Read> CodeSource for FixedFrameReader<T> {
    fn next_code(&mut self) -> Result<Code> {
        self.read_code()
    }
}
