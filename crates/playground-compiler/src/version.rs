//! Semantic versions of published compiler packages.
//!
//! Handles release versions ("1.7.26") as well as nightly builds with
//! dot-separated pre-release identifiers ("1.3.100-nightly-20231101.1").
//! Build metadata is accepted and ignored.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};

/// One dot-separated pre-release identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Digits only, compared numerically.
    Numeric(u64),
    /// Letters, digits and hyphens, compared lexically.
    AlphaNumeric(String),
}

impl Identifier {
    fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            return s.parse().ok().map(Identifier::Numeric);
        }
        if s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Some(Identifier::AlphaNumeric(s.to_string()));
        }
        None
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Numeric identifiers always have lower precedence than alphanumeric ones.
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{n}"),
            Identifier::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

/// A semantic version with optional pre-release identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    /// Major version number.
    pub major: u64,
    /// Minor version number.
    pub minor: u64,
    /// Patch version number.
    pub patch: u64,
    /// Pre-release identifiers; empty for releases.
    pub pre_release: Vec<Identifier>,
}

impl Version {
    /// Create a new release version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: Vec::new(),
        }
    }

    /// Check if this version is a release.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.pre_release.is_empty()
    }
}

impl FromStr for Version {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || LoadError::InvalidVersion(s.to_string());

        // Build metadata does not take part in precedence
        let without_build = s.split_once('+').map_or(s, |(version, _)| version);

        let (version_part, pre_release) = match without_build.split_once('-') {
            Some((version, pre)) => {
                let identifiers = pre
                    .split('.')
                    .map(Identifier::parse)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(invalid)?;
                (version, identifiers)
            }
            None => (without_build, Vec::new()),
        };

        let parts: Vec<&str> = version_part.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let parse_part = |part: &str| -> Result<u64> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        Ok(Self {
            major: parse_part(parts[0])?,
            minor: parse_part(parts[1])?,
            patch: parse_part(parts[2])?,
            pre_release,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = LoadError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (index, identifier) in self.pre_release.iter().enumerate() {
            let separator = if index == 0 { '-' } else { '.' };
            write!(f, "{separator}{identifier}")?;
        }
        Ok(())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare major.minor.patch first
        match self.major.cmp(&other.major) {
            Ordering::Equal => {}
            other => return other,
        }
        match self.minor.cmp(&other.minor) {
            Ordering::Equal => {}
            other => return other,
        }
        match self.patch.cmp(&other.patch) {
            Ordering::Equal => {}
            other => return other,
        }

        // Pre-release versions are always less than releases
        // e.g., 1.3.100-nightly-20231101.1 < 1.3.100
        match (self.pre_release.is_empty(), other.pre_release.is_empty()) {
            (true, true) => Ordering::Equal,
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            // Slice ordering is lexicographic, and a shorter prefix sorts first.
            (false, false) => self.pre_release.cmp(&other.pre_release),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stable_version() {
        let v = Version::from_str("1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert!(v.is_stable());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let v = Version::from_str(" 1.7.26\n").unwrap();
        assert_eq!(v, Version::new(1, 7, 26));
        assert!(Version::from_str("v1.7.26").is_err());
    }

    #[test]
    fn test_parse_nightly_version() {
        let v = Version::from_str("1.3.100-nightly-20231101.1").unwrap();
        assert_eq!(
            v.pre_release,
            vec![
                Identifier::AlphaNumeric("nightly-20231101".to_string()),
                Identifier::Numeric(1)
            ]
        );
        assert!(!v.is_stable());
    }

    #[test]
    fn test_build_metadata_ignored() {
        let v = Version::from_str("1.2.3+build.5").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_ordering() {
        let v1 = Version::from_str("1.2.165").unwrap();
        let v2 = Version::from_str("1.2.166").unwrap();
        let v3 = Version::from_str("1.3.0").unwrap();
        let v4 = Version::from_str("2.0.0").unwrap();

        assert!(v1 < v2);
        assert!(v2 < v3);
        assert!(v3 < v4);
    }

    #[test]
    fn test_prerelease_ordering() {
        // Precedence example chain from the semver documentation.
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];
        let versions: Vec<Version> = chain.iter().map(|s| s.parse().unwrap()).collect();
        for pair in versions.windows(2) {
            assert!(pair[0] < pair[1], "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_nightly_ordering() {
        let older = Version::from_str("1.3.100-nightly-20231101.1").unwrap();
        let newer = Version::from_str("1.3.100-nightly-20231102.1").unwrap();
        let release = Version::from_str("1.3.100").unwrap();

        assert!(older < newer);
        assert!(newer < release);
        assert!(Version::new(1, 3, 99) < older);
    }

    #[test]
    fn test_version_display() {
        let v = Version::from_str("1.2.3-nightly-20231101.4").unwrap();
        assert_eq!(v.to_string(), "1.2.3-nightly-20231101.4");
    }

    #[test]
    fn test_serde_as_string() {
        let v: Version = serde_json::from_str("\"1.7.1\"").unwrap();
        assert_eq!(v, Version::new(1, 7, 1));
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"1.7.1\"");
        assert!(serde_json::from_str::<Version>("\"latest\"").is_err());
    }

    #[test]
    fn test_invalid_version() {
        assert!(Version::from_str("invalid").is_err());
        assert!(Version::from_str("1.2").is_err());
        assert!(Version::from_str("1.2.3.4").is_err());
        assert!(Version::from_str("1.2.x").is_err());
        assert!(Version::from_str("1.2.3-").is_err());
        assert!(Version::from_str("1.2.3-a..b").is_err());
    }
}
