use std::fmt;
use std::str::FromStr;

/// Graphics API level reported by the host, encoded as `major << 16 | minor`.
///
/// This is the same encoding the host uses for its required-version fields, so
/// `0x30000` is ES 3.0 and `0x30001` is ES 3.1. Ordering follows the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlesVersion(u32);

/// Lowest capability the surface initializer accepts.
pub const MIN_GLES_VERSION: GlesVersion = GlesVersion::ES_3_0;

/// Context client version requested once the capability check passes.
pub const CONTEXT_CLIENT_VERSION: u32 = 3;

impl GlesVersion {
    pub const ES_2_0: GlesVersion = GlesVersion::from_parts(2, 0);
    pub const ES_3_0: GlesVersion = GlesVersion::from_parts(3, 0);
    pub const ES_3_1: GlesVersion = GlesVersion::from_parts(3, 1);
    pub const ES_3_2: GlesVersion = GlesVersion::from_parts(3, 2);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn from_parts(major: u16, minor: u16) -> Self {
        Self(((major as u32) << 16) | minor as u32)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn major(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn minor(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    /// `true` when this version is at least `required`.
    pub fn meets(self, required: GlesVersion) -> bool {
        self >= required
    }
}

impl fmt::Display for GlesVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ES {}.{} ({:#x})", self.major(), self.minor(), self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseGlesVersionError {
    #[error("empty version string")]
    Empty,
    #[error("invalid version {0:?}: expected MAJOR[.MINOR] or a 0x-prefixed encoding")]
    Invalid(String),
}

impl FromStr for GlesVersion {
    type Err = ParseGlesVersionError;

    /// Accepts `3`, `3.1` or the raw encoding `0x30001`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseGlesVersionError::Empty);
        }
        let invalid = || ParseGlesVersionError::Invalid(s.to_string());

        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u32::from_str_radix(hex, 16)
                .map(GlesVersion::from_raw)
                .map_err(|_| invalid());
        }

        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, "0"),
        };
        let major: u16 = major.parse().map_err(|_| invalid())?;
        let minor: u16 = minor.parse().map_err(|_| invalid())?;
        Ok(GlesVersion::from_parts(major, minor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_matches_host_format() {
        assert_eq!(GlesVersion::ES_3_0.raw(), 0x30000);
        assert_eq!(GlesVersion::ES_3_1.raw(), 0x30001);
        assert_eq!(GlesVersion::ES_2_0.raw(), 0x20000);
        assert_eq!(GlesVersion::from_raw(0x30002), GlesVersion::ES_3_2);
    }

    #[test]
    fn major_minor_split() {
        let v = GlesVersion::from_raw(0x30001);
        assert_eq!(v.major(), 3);
        assert_eq!(v.minor(), 1);
    }

    #[test]
    fn meets_is_at_least() {
        assert!(GlesVersion::from_raw(0x30000).meets(MIN_GLES_VERSION));
        assert!(GlesVersion::from_raw(0x40000).meets(MIN_GLES_VERSION));
        assert!(GlesVersion::ES_3_1.meets(MIN_GLES_VERSION));
        assert!(!GlesVersion::from_raw(0x20000).meets(MIN_GLES_VERSION));
        assert!(!GlesVersion::from_raw(0x2ffff).meets(MIN_GLES_VERSION));
    }

    #[test]
    fn parse_forms() {
        assert_eq!("3".parse::<GlesVersion>().unwrap(), GlesVersion::ES_3_0);
        assert_eq!("3.1".parse::<GlesVersion>().unwrap(), GlesVersion::ES_3_1);
        assert_eq!("0x20000".parse::<GlesVersion>().unwrap(), GlesVersion::ES_2_0);
        assert_eq!(" 3.2 ".parse::<GlesVersion>().unwrap(), GlesVersion::ES_3_2);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<GlesVersion>(), Err(ParseGlesVersionError::Empty));
        assert!(matches!(
            "three".parse::<GlesVersion>(),
            Err(ParseGlesVersionError::Invalid(_))
        ));
        assert!("0xzz".parse::<GlesVersion>().is_err());
        assert!("3.x".parse::<GlesVersion>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(GlesVersion::ES_3_1.to_string(), "ES 3.1 (0x30001)");
    }
}
