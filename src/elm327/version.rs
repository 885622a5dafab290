//! Reset banner and firmware version.

use crate::error::{Elm327Error, Elm327Result};
use std::fmt;

/// Every genuine (and most cloned) chips announce themselves with this.
pub const BANNER_PREFIX: &str = "ELM327";

/// Offset of the version digits in the banner, just past `ELM327 v`.
const VERSION_OFFSET: usize = 8;

/// Firmware version reported in the reset banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
}

impl FirmwareVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the version out of a reset banner such as `ELM327 v1.5`.
    ///
    /// A banner that does not start with [`BANNER_PREFIX`] is a protocol
    /// error; a banner whose version is not exactly `<major>.<minor>` is a
    /// version parse error.
    pub fn parse_banner(banner: &str) -> Elm327Result<Self> {
        if !banner.starts_with(BANNER_PREFIX) {
            return Err(Elm327Error::protocol(format!(
                "unexpected reset banner: {banner:?}"
            )));
        }

        let parse_error = || Elm327Error::VersionParse {
            banner: banner.to_string(),
        };

        let digits = banner.get(VERSION_OFFSET..).ok_or_else(parse_error)?;
        let mut fields = digits.split('.');
        let (Some(major), Some(minor), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(parse_error());
        };

        Ok(Self {
            major: major.trim().parse().map_err(|_| parse_error())?,
            minor: minor.trim().parse().map_err(|_| parse_error())?,
        })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_v15() {
        let version = FirmwareVersion::parse_banner("ELM327 v1.5").unwrap();
        assert_eq!(version, FirmwareVersion::new(1, 5));
        assert_eq!(version.to_string(), "1.5");
    }

    #[test]
    fn test_parse_v21() {
        assert_eq!(
            FirmwareVersion::parse_banner("ELM327 v2.1").unwrap(),
            FirmwareVersion::new(2, 1)
        );
    }

    #[test]
    fn test_wrong_prefix() {
        let err = FirmwareVersion::parse_banner("STN1110 v4.0").unwrap_err();
        assert!(matches!(err, Elm327Error::Protocol(_)));
    }

    #[test]
    fn test_non_numeric_version() {
        let err = FirmwareVersion::parse_banner("ELM327 vX.Y").unwrap_err();
        assert!(matches!(err, Elm327Error::VersionParse { .. }));
    }

    #[test]
    fn test_missing_version() {
        assert!(matches!(
            FirmwareVersion::parse_banner("ELM327"),
            Err(Elm327Error::VersionParse { .. })
        ));
        assert!(matches!(
            FirmwareVersion::parse_banner("ELM327 v15"),
            Err(Elm327Error::VersionParse { .. })
        ));
        assert!(matches!(
            FirmwareVersion::parse_banner("ELM327 v1.5.2"),
            Err(Elm327Error::VersionParse { .. })
        ));
    }

    #[test]
    fn test_ordering() {
        assert!(FirmwareVersion::new(1, 5) > FirmwareVersion::new(1, 4));
        assert!(FirmwareVersion::new(2, 0) > FirmwareVersion::new(1, 5));
    }
}
