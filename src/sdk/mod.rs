//! Installed SDK discovery
//!
//! An SDK is a versioned root directory of platform headers and libraries
//! (`MacOSX14.sdk`). Inventories are read from one directory level;
//! entries that cannot be understood are skipped, never errors.

mod locator;

pub use locator::{CltLocator, SdkLocator, XcodeLocator};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use macsdk_version::Version;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Which tooling source an SDK came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdkSource {
    CommandLineTools,
    Xcode,
}

impl SdkSource {
    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            SdkSource::CommandLineTools => "Command Line Tools",
            SdkSource::Xcode => "Xcode",
        }
    }
}

/// One discovered SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkDescriptor {
    /// SDK version (e.g., "14.5")
    pub version: Version,

    /// Filesystem root of the SDK
    pub path: PathBuf,

    /// Which locator produced it
    pub source: SdkSource,
}

/// Shape of the `SDKSettings.json` an unversioned `MacOSX.sdk` carries.
#[derive(Debug, Deserialize)]
struct SdkSettings {
    #[serde(rename = "Version")]
    version: String,
}

/// Enumerate the SDKs under one inventory directory.
///
/// Versioned entries (`MacOSX10.15.sdk`) are parsed from the directory
/// name; the unversioned `MacOSX.sdk` is resolved through its
/// `SDKSettings.json` and only kept when no versioned entry already
/// covers that version. A missing or unreadable directory is an empty
/// inventory.
pub(crate) fn scan_sdk_dir(dir: &Path, source: SdkSource) -> Vec<SdkDescriptor> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let named_re = Regex::new(r"^MacOSX(\d+(?:\.\d+)*)\.sdk$").unwrap();
    let mut by_version: BTreeMap<Version, SdkDescriptor> = BTreeMap::new();
    let mut unversioned: Vec<PathBuf> = Vec::new();

    for entry in entries.flatten() {
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(caps) = named_re.captures(&name) {
            let version = Version::parse(&caps[1]);
            by_version.entry(version.clone()).or_insert(SdkDescriptor {
                version,
                path: entry.path(),
                source,
            });
        } else if name.as_ref() == "MacOSX.sdk" {
            unversioned.push(entry.path());
        }
    }

    for path in unversioned {
        if let Some(version) = read_sdk_settings_version(&path) {
            by_version.entry(version.clone()).or_insert(SdkDescriptor {
                version,
                path,
                source,
            });
        }
    }

    by_version.into_values().collect()
}

fn read_sdk_settings_version(sdk_path: &Path) -> Option<Version> {
    let raw = fs::read_to_string(sdk_path.join("SDKSettings.json")).ok()?;
    let settings: SdkSettings = serde_json::from_str(&raw).ok()?;
    let version = Version::parse(&settings.version);
    if version.is_null() {
        None
    } else {
        Some(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock;
    use tempfile::TempDir;

    #[test]
    fn test_scan_versioned_entries() {
        let dir = TempDir::new().unwrap();
        mock::write_sdk_fixture(dir.path(), &["10.14", "10.15"]).unwrap();

        let sdks = scan_sdk_dir(dir.path(), SdkSource::CommandLineTools);

        assert_eq!(sdks.len(), 2);
        assert_eq!(sdks[0].version, Version::parse("10.14"));
        assert_eq!(sdks[1].version, Version::parse("10.15"));
        assert!(sdks[1].path.ends_with("MacOSX10.15.sdk"));
    }

    #[test]
    fn test_scan_skips_alien_entries() {
        let dir = TempDir::new().unwrap();
        mock::write_sdk_fixture(dir.path(), &["13"]).unwrap();
        std::fs::create_dir(dir.path().join("iPhoneOS17.0.sdk")).unwrap();
        std::fs::create_dir(dir.path().join("notes")).unwrap();
        std::fs::write(dir.path().join("MacOSXbad.sdk"), b"file, not a dir").unwrap();

        let sdks = scan_sdk_dir(dir.path(), SdkSource::Xcode);

        assert_eq!(sdks.len(), 1);
        assert_eq!(sdks[0].version, Version::parse("13"));
    }

    #[test]
    fn test_scan_unversioned_via_sdk_settings() {
        let dir = TempDir::new().unwrap();
        mock::write_unversioned_sdk_fixture(dir.path(), "14.5").unwrap();

        let sdks = scan_sdk_dir(dir.path(), SdkSource::Xcode);

        assert_eq!(sdks.len(), 1);
        assert_eq!(sdks[0].version, Version::parse("14.5"));
        assert!(sdks[0].path.ends_with("MacOSX.sdk"));
    }

    #[test]
    fn test_scan_prefers_versioned_over_unversioned_duplicate() {
        let dir = TempDir::new().unwrap();
        mock::write_sdk_fixture(dir.path(), &["14.5"]).unwrap();
        mock::write_unversioned_sdk_fixture(dir.path(), "14.5").unwrap();

        let sdks = scan_sdk_dir(dir.path(), SdkSource::Xcode);

        assert_eq!(sdks.len(), 1);
        assert!(sdks[0].path.ends_with("MacOSX14.5.sdk"));
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let sdks = scan_sdk_dir(Path::new("/no/such/dir"), SdkSource::CommandLineTools);
        assert!(sdks.is_empty());
    }
}
