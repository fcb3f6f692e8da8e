use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransportError};

/// Baud rate of the line-protocol decoder board.
pub const DEFAULT_BAUD: u32 = 9600;

/// Line settings applied to a serial input device.
///
/// Only the speed is tunable. The line is always raw 8N1 with blocking
/// reads (`VMIN=1`, `VTIME=0`), so a read returns as soon as one byte arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud: DEFAULT_BAUD }
    }
}

/// Open a device read-only, with no line configuration.
///
/// Used for the fixed-frame decoder, which exposes frames through a plain
/// character device.
pub fn open_device(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TransportError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(?path, "opened device");
    Ok(file)
}

/// Open a serial device and put it into raw mode at `config.baud`.
///
/// If the handle is not a terminal (a regular file or FIFO holding a
/// recorded capture), configuration is skipped and the handle is returned
/// as-is.
pub fn open_serial(path: impl AsRef<Path>, config: &SerialConfig) -> Result<File> {
    let path = path.as_ref();
    let speed = baud_constant(config.baud)?;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
        .map_err(|e| TransportError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

    let fd = file.as_raw_fd();
    // SAFETY: `fd` is an open descriptor owned by `file` for the duration of the call.
    if unsafe { libc::isatty(fd) } == 0 {
        debug!(?path, "not a terminal; skipping line configuration");
        return Ok(file);
    }

    configure_raw(fd, speed).map_err(|e| TransportError::Configure {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(?path, baud = config.baud, "serial line configured");
    Ok(file)
}

fn configure_raw(fd: RawFd, speed: libc::speed_t) -> io::Result<()> {
    // SAFETY: an all-zero termios is a valid out-parameter for tcgetattr.
    let mut tio: libc::termios = unsafe { std::mem::zeroed() };

    // SAFETY: `fd` is an open terminal descriptor and `tio` is a valid writable termios.
    if unsafe { libc::tcgetattr(fd, &mut tio) } != 0 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: `tio` was initialized by tcgetattr above.
    unsafe { libc::cfmakeraw(&mut tio) };
    tio.c_cflag &= !(libc::CSIZE | libc::PARENB | libc::CSTOPB);
    tio.c_cflag |= libc::CS8 | libc::CLOCAL | libc::CREAD;
    tio.c_cc[libc::VMIN] = 1;
    tio.c_cc[libc::VTIME] = 0;

    // SAFETY: `tio` is a valid termios; `speed` came from baud_constant.
    let rc = unsafe { libc::cfsetispeed(&mut tio, speed) | libc::cfsetospeed(&mut tio, speed) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: `fd` is an open terminal descriptor and `tio` is fully initialized.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tio) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn baud_constant(baud: u32) -> Result<libc::speed_t> {
    let speed = match baud {
        1200 => libc::B1200,
        2400 => libc::B2400,
        4800 => libc::B4800,
        9600 => libc::B9600,
        19200 => libc::B19200,
        38400 => libc::B38400,
        57600 => libc::B57600,
        115200 => libc::B115200,
        other => return Err(TransportError::UnsupportedBaud(other)),
    };
    Ok(speed)
}
