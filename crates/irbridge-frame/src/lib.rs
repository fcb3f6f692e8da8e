//! Decoders turning IR receiver output into codes.
//!
//! Two receiver boards are supported, each with its own framing:
//! - [`FixedFrameReader`]: fixed-width binary frames (7 bytes by default),
//!   each encoded as lowercase hex
//! - [`LineProtocolReader`]: CR/LF separated text lines where a literal `OK`
//!   line confirms the line before it
//!
//! Both implement [`CodeSource`]. Wrap one in [`Codes`] to consume it as an
//! iterator that ends on the first device error and keeps that error as the
//! termination reason.

pub mod code;
pub mod error;
pub mod fixed;
pub mod line;
pub mod source;

pub use code::Code;
pub use error::{FrameError, Result};
pub use fixed::{FixedFrameReader, DEFAULT_FRAME_SIZE};
pub use line::{LineConfig, LineDecoder, LineProtocolReader, DEFAULT_SENTINEL};
pub use source::{CodeSource, Codes};
