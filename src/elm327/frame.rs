//! Reply framing.
//!
//! The chip ends every reply with its line terminator written twice, followed
//! by the `>` prompt. Which terminator it uses (`\r` or `\r\n`) depends on the
//! firmware and the linefeed setting, so it is learned from the first reply
//! and enforced on every reply after that.

use crate::error::{Elm327Error, Elm327Result};
use std::fmt;

/// Prompt byte the chip sends when it is ready for the next command.
pub const PROMPT: u8 = b'>';

/// Line terminator used by the chip in its replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminator {
    /// Carriage return followed by line feed (linefeeds enabled).
    CrLf,
    /// Bare carriage return.
    Cr,
}

impl Terminator {
    /// The terminator bytes.
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::CrLf => b"\r\n",
            Self::Cr => b"\r",
        }
    }

    /// Tail that closes every well-formed frame: the terminator twice, then
    /// the prompt.
    pub fn frame_suffix(self) -> &'static [u8] {
        match self {
            Self::CrLf => b"\r\n\r\n>",
            Self::Cr => b"\r\r>",
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrLf => f.write_str("\\r\\n"),
            Self::Cr => f.write_str("\\r"),
        }
    }
}

/// Work out which terminator a frame was written with.
pub fn detect_terminator(frame: &[u8]) -> Elm327Result<Terminator> {
    [Terminator::CrLf, Terminator::Cr]
        .into_iter()
        .find(|t| frame.ends_with(t.frame_suffix()))
        .ok_or_else(|| {
            Elm327Error::framing(format!(
                "reply terminator not recognized (tested \\r\\n\\r\\n> and \\r\\r>), frame ends with \"{}\"",
                tail(frame).escape_ascii()
            ))
        })
}

/// Check that `frame` ends with the doubled `terminator` and prompt, and
/// return the body in front of it.
pub fn strip_frame(frame: &[u8], terminator: Terminator) -> Elm327Result<&[u8]> {
    frame.strip_suffix(terminator.frame_suffix()).ok_or_else(|| {
        Elm327Error::framing(format!(
            "expected frame to end with \"{}\", got \"{}\"",
            terminator.frame_suffix().escape_ascii(),
            tail(frame).escape_ascii()
        ))
    })
}

fn tail(frame: &[u8]) -> &[u8] {
    &frame[frame.len().saturating_sub(8)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_detect_crlf() {
        let t = detect_terminator(b"AT Z\r\n\r\nELM327 v1.5\r\n\r\n>").unwrap();
        assert_eq!(t, Terminator::CrLf);
    }

    #[test]
    fn test_detect_cr() {
        let t = detect_terminator(b"AT I\r\r?\r\r>").unwrap();
        assert_eq!(t, Terminator::Cr);
    }

    #[test]
    fn test_detect_rejects_single_terminator() {
        let err = detect_terminator(b"AT I\rELM327 v1.5\r>").unwrap_err();
        assert!(matches!(err, Elm327Error::Framing(_)));
    }

    #[test]
    fn test_detect_rejects_lf_only() {
        assert!(detect_terminator(b"OK\n\n>").is_err());
        assert!(detect_terminator(b">").is_err());
        assert!(detect_terminator(b"").is_err());
    }

    #[test]
    fn test_strip_frame() {
        let body = strip_frame(b"AT RV\r12.4V\r\r>", Terminator::Cr).unwrap();
        assert_eq!(body, b"AT RV\r12.4V");
    }

    #[test]
    fn test_strip_frame_empty_body() {
        assert_eq!(strip_frame(b"\r\n\r\n>", Terminator::CrLf).unwrap(), b"");
    }

    #[test]
    fn test_strip_frame_terminator_mismatch() {
        let err = strip_frame(b"AT RV\r12.4V\r\r>", Terminator::CrLf).unwrap_err();
        assert!(err.to_string().contains("\\r\\n\\r\\n>"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Terminator::CrLf.to_string(), "\\r\\n");
        assert_eq!(Terminator::Cr.to_string(), "\\r");
    }

    proptest! {
        #[test]
        fn prop_detect_and_strip(
            body in proptest::collection::vec(any::<u8>(), 0..64),
            crlf in any::<bool>()
        ) {
            let terminator = if crlf { Terminator::CrLf } else { Terminator::Cr };
            let mut frame = body.clone();
            frame.extend_from_slice(terminator.frame_suffix());

            prop_assert_eq!(detect_terminator(&frame).unwrap(), terminator);
            prop_assert_eq!(strip_frame(&frame, terminator).unwrap(), body.as_slice());
        }
    }
}
