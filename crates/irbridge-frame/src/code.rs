use std::borrow::Borrow;
use std::fmt::{self, Write as _};

use serde::Serialize;

/// A decoded remote-control code, used as the command-map lookup key.
///
/// Immutable once built. Fixed-frame codes are lowercase hex of the frame
/// bytes; line-protocol codes are the trimmed text of the confirmed line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    /// Wrap a text token as a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Encode raw frame bytes as a code (two lowercase hex digits per byte).
    pub fn from_frame(frame: &[u8]) -> Self {
        let mut hex = String::with_capacity(frame.len() * 2);
        for byte in frame {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Code {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for Code {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for Code {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}
