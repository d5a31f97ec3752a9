//! Dotted version values with a strict total order
//!
//! Parsing never fails: absent or unparseable input degrades to the null
//! version, which orders below every real version. Comparison against
//! strings, numbers, and named releases goes through coercion into
//! [`Version`] first; the comparator itself is strictly typed.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use regex_lite::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::release::MacosRelease;

/// Trailing non-component tail of a version string.
///
/// `12.4` carries no suffix, `12.4-1` a numeric one, `13.0-beta3` a token.
/// Suffix classes order numeric < token < none, so a tagged build sorts
/// below the plain release with the same components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Suffix {
    Numeric(u64),
    Token(String),
}

impl Suffix {
    fn rank(&self) -> u8 {
        match self {
            Suffix::Numeric(_) => 0,
            Suffix::Token(_) => 1,
        }
    }
}

fn suffix_cmp(a: Option<&Suffix>, b: Option<&Suffix>) -> Ordering {
    let rank = |s: Option<&Suffix>| s.map_or(2u8, Suffix::rank);
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Some(Suffix::Numeric(x)), Some(Suffix::Numeric(y))) => x.cmp(y),
        (Some(Suffix::Token(x)), Some(Suffix::Token(y))) => x.cmp(y),
        _ => Ordering::Equal,
    })
}

/// Markers that make a suffix count as a pre-release tag.
const PRERELEASE_MARKERS: &[&str] = &["alpha", "beta", "rc", "dev", "pre"];

/// An immutable dotted version.
///
/// Ordering is component-wise numeric, left to right; a missing trailing
/// component sorts below any present one, so `10.2 < 10.2.1`. Equality and
/// hashing ignore the original text, so `Version::from("10.02")` equals
/// `Version::from("10.2")`.
#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    components: Vec<u64>,
    suffix: Option<Suffix>,
}

impl Version {
    /// The null version: less than every real version, never a parse error.
    pub fn null() -> Self {
        Version {
            text: String::new(),
            components: Vec::new(),
            suffix: None,
        }
    }

    /// Parse an arbitrary dotted version string.
    ///
    /// Leading dotted-numeric segments become components; whatever trails
    /// them (minus a separating `.`, `-`, or `_`) becomes the suffix.
    /// Empty or whitespace-only input yields the null version.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Version::null();
        }

        let re = Regex::new(r"^(\d+(?:\.\d+)*)").unwrap();
        // No leading numeric run means nothing to order on; degrade to
        // null rather than invent a components-free version.
        let Some(m) = re.find(trimmed) else {
            return Version::null();
        };
        let components: Vec<u64> = m
            .as_str()
            .split('.')
            .filter_map(|s| s.parse::<u64>().ok())
            .collect();
        let rest = &trimmed[m.end()..];

        let rest = rest.trim_start_matches(['.', '-', '_']);
        let suffix = if rest.is_empty() {
            None
        } else {
            match rest.parse::<u64>() {
                Ok(n) => Some(Suffix::Numeric(n)),
                Err(_) => Some(Suffix::Token(rest.to_string())),
            }
        };

        Version {
            text: trimmed.to_string(),
            components,
            suffix,
        }
    }

    /// Extract the leading `<major>.<minor>` pattern from an OS version
    /// string, e.g. `"14.5"` out of `"14.5.1 (23F79)"`.
    ///
    /// Input without that pattern yields the null version.
    pub fn from_os_release(raw: &str) -> Self {
        let re = Regex::new(r"(\d+)\.(\d+)").unwrap();
        match re.captures(raw) {
            Some(caps) => Version::parse(&format!("{}.{}", &caps[1], &caps[2])),
            None => Version::null(),
        }
    }

    /// True for the null version only.
    pub fn is_null(&self) -> bool {
        self.components.is_empty() && self.suffix.is_none()
    }

    /// True when the suffix carries a pre-release marker (`beta`, `rc`, ...).
    ///
    /// Never panics; the null version is not a pre-release.
    pub fn is_prerelease(&self) -> bool {
        match &self.suffix {
            Some(Suffix::Token(tag)) => {
                let tag = tag.to_ascii_lowercase();
                PRERELEASE_MARKERS.iter().any(|m| tag.starts_with(m))
            }
            _ => false,
        }
    }

    /// First numeric component, if any.
    pub fn major(&self) -> Option<u64> {
        self.components.first().copied()
    }

    /// Second numeric component, if any.
    pub fn minor(&self) -> Option<u64> {
        self.components.get(1).copied()
    }

    /// The version truncated to its first two components, suffix dropped.
    pub fn major_minor(&self) -> Version {
        let components: Vec<u64> = self.components.iter().take(2).copied().collect();
        let text = components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".");
        Version {
            text,
            components,
            suffix: None,
        }
    }

    /// The original (trimmed) textual form; empty for the null version.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components && self.suffix == other.suffix
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
        self.suffix.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Vec<u64> already orders lexicographically with a shorter prefix
        // first, which is exactly "missing trailing component < present".
        self.components
            .cmp(&other.components)
            .then_with(|| suffix_cmp(self.suffix.as_ref(), other.suffix.as_ref()))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::null()
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Version::parse(raw)
    }
}

impl From<String> for Version {
    fn from(raw: String) -> Self {
        Version::parse(&raw)
    }
}

impl From<Option<&str>> for Version {
    fn from(raw: Option<&str>) -> Self {
        raw.map_or_else(Version::null, Version::parse)
    }
}

impl From<u64> for Version {
    fn from(major: u64) -> Self {
        Version {
            text: major.to_string(),
            components: vec![major],
            suffix: None,
        }
    }
}

impl From<(u64, u64)> for Version {
    fn from((major, minor): (u64, u64)) -> Self {
        Version {
            text: format!("{}.{}", major, minor),
            components: vec![major, minor],
            suffix: None,
        }
    }
}

impl From<MacosRelease> for Version {
    fn from(release: MacosRelease) -> Self {
        release.version()
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        *self == Version::parse(other)
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        *self == Version::parse(other)
    }
}

impl PartialOrd<str> for Version {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        Some(self.cmp(&Version::parse(other)))
    }
}

impl PartialOrd<&str> for Version {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        Some(self.cmp(&Version::parse(other)))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Version::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        let v = Version::parse("10.15.4");
        assert_eq!(v.major(), Some(10));
        assert_eq!(v.minor(), Some(15));
        assert_eq!(v.as_str(), "10.15.4");
        assert!(!v.is_null());
    }

    #[test]
    fn test_parse_empty_is_null() {
        assert!(Version::parse("").is_null());
        assert!(Version::parse("   ").is_null());
        assert!(Version::parse("garbage").is_null());
        assert!(Version::from(None::<&str>).is_null());
    }

    #[test]
    fn test_null_sorts_below_everything() {
        assert!(Version::null() < Version::parse("0.0"));
        assert!(Version::null() < Version::parse("0"));
        assert!(Version::null() == Version::null());
    }

    #[test]
    fn test_component_ordering() {
        assert!(Version::parse("10.4") < Version::parse("10.15"));
        assert!(Version::parse("10.15") < Version::parse("11"));
        assert!(Version::parse("10.2") < Version::parse("10.2.1"));
        assert!(Version::parse("16") < Version::parse("16.0"));
        assert_eq!(Version::parse("10.2"), Version::parse("10.02"));
    }

    #[test]
    fn test_suffix_precedence() {
        // numeric suffix < token suffix < no suffix
        let numeric = Version::parse("12.4-1");
        let token = Version::parse("12.4-beta3");
        let plain = Version::parse("12.4");
        assert!(numeric < token);
        assert!(token < plain);
        assert!(numeric < plain);
    }

    #[test]
    fn test_ordering_laws_over_corpus() {
        let corpus: Vec<Version> = [
            "", "0", "0.0", "1", "1.0", "1.0-1", "1.0-beta", "1.0.1", "9.9",
            "10.2", "10.2.1", "10.15", "11", "11.0", "12.4-beta3", "12.4",
        ]
        .iter()
        .map(|s| Version::parse(s))
        .collect();

        for a in &corpus {
            for b in &corpus {
                // antisymmetry
                if a < b {
                    assert!(b > a, "{} / {}", a, b);
                    assert_ne!(a, b);
                }
                for c in &corpus {
                    // transitivity
                    if a < b && b < c {
                        assert!(a < c, "{} < {} < {}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_from_os_release() {
        assert_eq!(Version::from_os_release("14.5"), Version::parse("14.5"));
        assert_eq!(
            Version::from_os_release("14.5.1 (23F79)"),
            Version::parse("14.5")
        );
        assert!(Version::from_os_release("Darwin").is_null());
    }

    #[test]
    fn test_heterogeneous_comparison() {
        let v = Version::parse("10.15");
        assert!(v > "10.14");
        assert!(v < "11");
        assert_eq!(v, "10.15");
        assert_eq!(Version::from(11u64), Version::parse("11"));
        assert_eq!(Version::from((10, 14)), Version::parse("10.14"));
        assert!(Version::from(MacosRelease::Sonoma) > Version::from(MacosRelease::Ventura));
    }

    #[test]
    fn test_prerelease() {
        assert!(Version::parse("13.0-beta3").is_prerelease());
        assert!(Version::parse("13.0-rc1").is_prerelease());
        assert!(!Version::parse("13.0").is_prerelease());
        assert!(!Version::parse("13.0-1").is_prerelease());
        assert!(!Version::null().is_prerelease());
    }

    #[test]
    fn test_major_minor() {
        assert_eq!(Version::parse("10.15.4").major_minor(), Version::parse("10.15"));
        assert_eq!(Version::parse("12.4-beta3").major_minor(), Version::parse("12.4"));
        assert_eq!(Version::parse("11").major_minor(), Version::parse("11"));
    }

    #[test]
    fn test_serde_round_trip() {
        let v = Version::parse("10.15.4");
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#""10.15.4""#);
        let parsed: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, v);
    }
}
