//! Bridge infrared remote receivers to a media player control socket.
//!
//! Codes decoded from two receiver boards are merged, looked up in a
//! command map, and written as text lines to the player's control socket.
//!
//! # Crate Structure
//!
//! - [`transport`]: device opening (serial/termios) and the control socket client
//! - [`frame`]: fixed-frame and line-protocol decoders producing codes
//! - [`relay`]: code bus, command map, dispatcher and resilient sender

/// Re-export transport types.
pub mod transport {
    pub use irbridge_transport::*;
}

/// Re-export decoder types.
pub mod frame {
    pub use irbridge_frame::*;
}

/// Re-export relay types.
pub mod relay {
    pub use irbridge_relay::*;
}
