//! Named macOS releases
//!
//! Maps marketing names to versions so callers can compare against a
//! symbolic release instead of a literal string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// A named macOS release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacosRelease {
    HighSierra,
    Mojave,
    Catalina,
    BigSur,
    Monterey,
    Ventura,
    Sonoma,
    Sequoia,
    Tahoe,
}

impl MacosRelease {
    /// All known releases, oldest first.
    pub const ALL: [MacosRelease; 9] = [
        MacosRelease::HighSierra,
        MacosRelease::Mojave,
        MacosRelease::Catalina,
        MacosRelease::BigSur,
        MacosRelease::Monterey,
        MacosRelease::Ventura,
        MacosRelease::Sonoma,
        MacosRelease::Sequoia,
        MacosRelease::Tahoe,
    ];

    /// Marketing name (e.g., "Big Sur").
    pub fn name(&self) -> &'static str {
        match self {
            MacosRelease::HighSierra => "High Sierra",
            MacosRelease::Mojave => "Mojave",
            MacosRelease::Catalina => "Catalina",
            MacosRelease::BigSur => "Big Sur",
            MacosRelease::Monterey => "Monterey",
            MacosRelease::Ventura => "Ventura",
            MacosRelease::Sonoma => "Sonoma",
            MacosRelease::Sequoia => "Sequoia",
            MacosRelease::Tahoe => "Tahoe",
        }
    }

    /// Marketing version this release ships as.
    pub fn version(&self) -> Version {
        match self {
            MacosRelease::HighSierra => Version::from((10, 13)),
            MacosRelease::Mojave => Version::from((10, 14)),
            MacosRelease::Catalina => Version::from((10, 15)),
            MacosRelease::BigSur => Version::from(11u64),
            MacosRelease::Monterey => Version::from(12u64),
            MacosRelease::Ventura => Version::from(13u64),
            MacosRelease::Sonoma => Version::from(14u64),
            MacosRelease::Sequoia => Version::from(15u64),
            MacosRelease::Tahoe => Version::from(26u64),
        }
    }

    /// Look up the release a host version belongs to.
    ///
    /// Pre-11 releases match on major.minor; 11 and later on major only.
    pub fn from_version(version: &Version) -> Option<MacosRelease> {
        Self::ALL.iter().copied().find(|release| {
            let v = release.version();
            if v.major() == Some(10) {
                version.major_minor() == v
            } else {
                version.major() == v.major()
            }
        })
    }
}

impl fmt::Display for MacosRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unrecognized release names.
#[derive(Debug, thiserror::Error)]
#[error("unknown macOS release: {0}")]
pub struct UnknownRelease(pub String);

impl FromStr for MacosRelease {
    type Err = UnknownRelease;

    /// Accepts the marketing name ("Big Sur", "big_sur", "bigsur") or a
    /// version string ("11", "10.15").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        for release in Self::ALL {
            let name: String = release
                .name()
                .chars()
                .filter(|c| *c != ' ')
                .collect::<String>()
                .to_ascii_lowercase();
            if folded == name {
                return Ok(release);
            }
        }

        let version = Version::parse(s);
        if !version.is_null() {
            if let Some(release) = Self::from_version(&version) {
                return Ok(release);
            }
        }

        Err(UnknownRelease(s.to_string()))
    }
}
