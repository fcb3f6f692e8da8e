//! Device and control-endpoint I/O for irbridge.
//!
//! Two kinds of handles live here:
//! - input devices: the fixed-frame reader (opened read-only as-is) and the
//!   line-protocol reader (a serial line put into raw mode at a fixed baud rate)
//! - the control endpoint: a Unix domain socket the media player listens on
//!
//! This is the lowest layer of irbridge. Nothing here knows about codes or
//! commands; it only opens, configures and connects.

pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod device;
#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use traits::ControlStream;

#[cfg(unix)]
pub use device::{open_device, open_serial, SerialConfig, DEFAULT_BAUD};
#[cfg(unix)]
pub use uds::UnixDomainSocket;
