//! Baud rates accepted by `AT BRD`.

use super::command::Command;
use crate::error::{Elm327Error, Elm327Result};
use std::fmt;

/// A link speed the chip can be switched to, with its `AT BRD` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaudCandidate {
    Baud9600,
    Baud19200,
    Baud38400,
    Baud57600,
    Baud115200,
    Baud230400,
    Baud500000,
}

impl BaudCandidate {
    /// All candidates, slowest first.
    pub const ALL: [BaudCandidate; 7] = [
        Self::Baud9600,
        Self::Baud19200,
        Self::Baud38400,
        Self::Baud57600,
        Self::Baud115200,
        Self::Baud230400,
        Self::Baud500000,
    ];

    /// Two hex digits sent with `AT BRD`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Baud9600 => "00",
            Self::Baud19200 => "D0",
            Self::Baud38400 => "68",
            Self::Baud57600 => "45",
            Self::Baud115200 => "23",
            Self::Baud230400 => "11",
            Self::Baud500000 => "08",
        }
    }

    /// Nominal rate in bits per second.
    pub fn rate(self) -> u32 {
        match self {
            Self::Baud9600 => 9_600,
            Self::Baud19200 => 19_200,
            Self::Baud38400 => 38_400,
            Self::Baud57600 => 57_600,
            Self::Baud115200 => 115_200,
            Self::Baud230400 => 230_400,
            Self::Baud500000 => 500_000,
        }
    }

    /// Look up the candidate for a rate.
    pub fn from_rate(rate: u32) -> Elm327Result<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.rate() == rate)
            .ok_or_else(|| {
                Elm327Error::InvalidArgument(format!(
                    "baud rate {rate} is not one of {}",
                    Self::ALL
                        .iter()
                        .map(|c| c.rate().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    /// The `AT BRD <code>` command for this candidate.
    pub fn command(self) -> Command {
        Command::from_bytes(format!("AT BRD {}", self.code()).as_bytes())
    }
}

impl TryFrom<u32> for BaudCandidate {
    type Error = Elm327Error;

    fn try_from(rate: u32) -> Elm327Result<Self> {
        Self::from_rate(rate)
    }
}

impl fmt::Display for BaudCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} baud", self.rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rate() {
        assert_eq!(BaudCandidate::from_rate(57_600).unwrap(), BaudCandidate::Baud57600);
        assert_eq!(BaudCandidate::try_from(500_000).unwrap().code(), "08");
    }

    #[test]
    fn test_unknown_rate_rejected() {
        let err = BaudCandidate::from_rate(14_400).unwrap_err();
        assert!(matches!(err, Elm327Error::InvalidArgument(_)));
        assert!(err.to_string().contains("14400"));
    }

    #[test]
    fn test_brd_command() {
        assert_eq!(BaudCandidate::Baud115200.command().to_wire(), b"AT BRD 23\r\n");
    }

    #[test]
    fn test_codes_are_two_hex_digits() {
        for candidate in BaudCandidate::ALL {
            let code = candidate.code();
            assert_eq!(code.len(), 2);
            assert!(code.chars().all(|c| c.is_ascii_hexdigit()), "{candidate}");
        }
    }
}
