use std::iter::FusedIterator;

use crate::code::Code;
use crate::error::{FrameError, Result};

/// Anything that yields codes from a device until the device fails.
pub trait CodeSource {
    /// Block until the next code is decoded.
    ///
    /// An `Err` is terminal: callers must not call `next_code` again.
    fn next_code(&mut self) -> Result<Code>;
}

impl<S: CodeSource + ?Sized> CodeSource for Box<S> {
    fn next_code(&mut self) -> Result<Code> {
        (**self).next_code()
    }
}

/// Iterator over a [`CodeSource`] that ends at the first error.
///
/// The error is not mixed into the items; it is kept aside and can be
/// inspected with [`Codes::termination`] once the iterator returns `None`.
pub struct Codes<S> {
    source: S,
    termination: Option<FrameError>,
}

impl<S: CodeSource> Codes<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            termination: None,
        }
    }

    /// Why the stream ended, or `None` while it is still live.
    pub fn termination(&self) -> Option<&FrameError> {
        self.termination.as_ref()
    }

    /// Consume the iterator and return the termination reason, if any.
    pub fn into_termination(self) -> Option<FrameError> {
        self.termination
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: CodeSource> Iterator for Codes<S> {
    type Item = Code;

    fn next(&mut self) -> Option<Code> {
        if self.termination.is_some() {
            return None;
        }
        match self.source.next_code() {
            Ok(code) => Some(code),
            Err(err) => {
                self.termination = Some(err);
                None
            }
        }
    }
}

impl<S: CodeSource> FusedIterator for Codes<S> {}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct Scripted {
        items: VecDeque<Result<Code>>,
        calls: usize,
    }

    impl CodeSource for Scripted {
        fn next_code(&mut self) -> Result<Code> {
            self.calls += 1;
            self.items.pop_front().unwrap_or(Err(FrameError::Closed))
        }
    }

    #[test]
    fn yields_until_error_then_keeps_reason() {
        let source = Scripted {
            items: VecDeque::from(vec![
                Ok(Code::new("a")),
                Ok(Code::new("b")),
                Err(FrameError::Io(std::io::Error::other("unplugged"))),
                Ok(Code::new("never")),
            ]),
            calls: 0,
        };
        let mut codes = Codes::new(source);

        let got: Vec<Code> = codes.by_ref().collect();
        assert_eq!(got, vec![Code::new("a"), Code::new("b")]);
        assert!(matches!(codes.termination(), Some(FrameError::Io(_))));

        // Fused: the source is not polled again after termination.
        assert!(codes.next().is_none());
        assert_eq!(codes.get_ref().calls, 3);
    }

    #[test]
    fn live_stream_has_no_termination() {
        let source = Scripted {
            items: VecDeque::from(vec![Ok(Code::new("a"))]),
            calls: 0,
        };
        let mut codes = Codes::new(source);
        assert_eq!(codes.next(), Some(Code::new("a")));
        assert!(codes.termination().is_none());
        assert!(codes.next().is_none());
        assert!(matches!(codes.into_termination(), Some(FrameError::Closed)));
    }
}
