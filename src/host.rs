//! Host environment
//!
//! The startup gate (this tool only makes sense on macOS), the required
//! OS-version inputs, and the small single-purpose host probes: language
//! preferences and competing package managers.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use macsdk_version::Version;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Environment value carrying the marketing OS version (e.g., "14.5").
pub const OS_VERSION_ENV: &str = "MACSDK_OS_VERSION";

/// Environment value carrying the full OS version (e.g., "14.5.1").
pub const OS_FULL_VERSION_ENV: &str = "MACSDK_OS_FULL_VERSION";

/// Host-level misconfiguration. The only hard-failure path in the
/// system; everything downstream degrades to absence instead.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("macsdk resolves macOS developer tooling and cannot run on {0}")]
    UnsupportedHost(&'static str),

    #[error("required environment value {0} is not set and the host did not report a version")]
    MissingVersion(&'static str),
}

/// Refuse to run on a non-macOS host.
///
/// Checked once at process startup; a mismatch is a fatal
/// misconfiguration, not a runtime condition.
pub fn ensure_macos_host() -> Result<(), HostError> {
    if cfg!(target_os = "macos") {
        Ok(())
    } else {
        Err(HostError::UnsupportedHost(env::consts::OS))
    }
}

/// The two OS-version inputs every resolution starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsVersions {
    /// Marketing version, truncated to major.minor
    pub version: Version,

    /// Full version including the patch level
    pub full_version: Version,
}

impl OsVersions {
    /// Build from raw version strings; `version` keeps only the leading
    /// major.minor pattern.
    pub fn new(version: &str, full_version: &str) -> Self {
        OsVersions {
            version: Version::from_os_release(version),
            full_version: Version::parse(full_version),
        }
    }

    /// Read both values from the environment.
    ///
    /// Absence is an upstream configuration error, reported as such
    /// rather than silently defaulted.
    pub fn from_env() -> Result<Self, HostError> {
        let version =
            env::var(OS_VERSION_ENV).map_err(|_| HostError::MissingVersion(OS_VERSION_ENV))?;
        let full_version = env::var(OS_FULL_VERSION_ENV)
            .map_err(|_| HostError::MissingVersion(OS_FULL_VERSION_ENV))?;
        Ok(OsVersions::new(&version, &full_version))
    }
}

/// User language preferences, most preferred first.
///
/// Backed by `defaults read -g AppleLanguages`; any failure reads as an
/// empty preference list.
pub fn preferred_languages() -> Vec<String> {
    let output = match Command::new("defaults")
        .args(["read", "-g", "AppleLanguages"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => return Vec::new(),
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let re = Regex::new(r#""([A-Za-z][A-Za-z0-9-]*)""#).unwrap();
    re.captures_iter(&stdout)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// A package manager that competes for the same prefix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageManager {
    MacPorts,
    Fink,
}

impl PackageManager {
    /// Filesystem marker proving this manager is installed.
    pub fn marker(&self) -> &'static Path {
        match self {
            PackageManager::MacPorts => Path::new("/opt/local/bin/port"),
            PackageManager::Fink => Path::new("/sw/bin/fink"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::MacPorts => "MacPorts",
            PackageManager::Fink => "Fink",
        }
    }
}

/// Detect competing package managers on this host.
pub fn detect_package_managers() -> Vec<PackageManager> {
    detect_package_managers_under(Path::new("/"))
}

/// Detection against an alternate filesystem root, for tests.
pub fn detect_package_managers_under(root: &Path) -> Vec<PackageManager> {
    [PackageManager::MacPorts, PackageManager::Fink]
        .into_iter()
        .filter(|manager| {
            let marker = manager.marker();
            let relative = marker.strip_prefix("/").unwrap_or(marker);
            root.join(relative).exists()
        })
        .collect()
}

/// Locate the user configuration file under the home directory.
pub fn user_config_path() -> Option<PathBuf> {
    let home = env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config/macsdk/config.toml"))
}
