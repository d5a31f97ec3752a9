//! SDK locators
//!
//! A locator knows how to enumerate and select SDKs from one tooling
//! source. Both variants apply the same selection policy against their
//! own inventory; absence of a match is a `None`, never an error.

use std::path::{Path, PathBuf};

use macsdk_version::{MacosRelease, Version};

use super::{scan_sdk_dir, SdkDescriptor, SdkSource};

/// Default SDK inventory of the Command Line Tools package.
pub const CLT_SDK_DIR: &str = "/Library/Developer/CommandLineTools/SDKs";

/// Locator over the Command Line Tools SDK inventory.
#[derive(Debug, Clone)]
pub struct CltLocator {
    sdk_dir: PathBuf,
}

impl CltLocator {
    pub fn new() -> Self {
        CltLocator {
            sdk_dir: PathBuf::from(CLT_SDK_DIR),
        }
    }

    /// Scan a non-default inventory directory.
    pub fn with_sdk_dir(sdk_dir: impl Into<PathBuf>) -> Self {
        CltLocator {
            sdk_dir: sdk_dir.into(),
        }
    }
}

impl Default for CltLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Locator over an Xcode installation's SDK inventory.
#[derive(Debug, Clone)]
pub struct XcodeLocator {
    sdk_dir: PathBuf,
}

impl XcodeLocator {
    /// Locate SDKs under a developer directory
    /// (`<dir>/Platforms/MacOSX.platform/Developer/SDKs`).
    pub fn new(developer_dir: impl AsRef<Path>) -> Self {
        XcodeLocator {
            sdk_dir: developer_dir
                .as_ref()
                .join("Platforms/MacOSX.platform/Developer/SDKs"),
        }
    }

    /// Scan an explicit inventory directory.
    pub fn with_sdk_dir(sdk_dir: impl Into<PathBuf>) -> Self {
        XcodeLocator {
            sdk_dir: sdk_dir.into(),
        }
    }
}

/// A locator bound to one tooling source.
#[derive(Debug, Clone)]
pub enum SdkLocator {
    Clt(CltLocator),
    Xcode(XcodeLocator),
}

impl SdkLocator {
    /// Which tooling source this locator draws from.
    pub fn source(&self) -> SdkSource {
        match self {
            SdkLocator::Clt(_) => SdkSource::CommandLineTools,
            SdkLocator::Xcode(_) => SdkSource::Xcode,
        }
    }

    /// The inventory directory this locator scans.
    pub fn sdk_dir(&self) -> &Path {
        match self {
            SdkLocator::Clt(locator) => &locator.sdk_dir,
            SdkLocator::Xcode(locator) => &locator.sdk_dir,
        }
    }

    /// All SDKs visible to this locator, ascending by version.
    pub fn inventory(&self) -> Vec<SdkDescriptor> {
        scan_sdk_dir(self.sdk_dir(), self.source())
    }

    /// Best-matching SDK for an optional requested version.
    ///
    /// Selection policy, identical for both variants:
    /// 1. requested version present in inventory: that exact SDK
    /// 2. requested version absent: highest available
    /// 3. no request: the SDK matching the host OS release, else highest
    /// 4. empty inventory: none
    pub fn sdk_if_applicable(
        &self,
        requested: Option<&Version>,
        host_os: &Version,
    ) -> Option<SdkDescriptor> {
        best_match(self.inventory(), requested, host_os)
    }
}

fn best_match(
    inventory: Vec<SdkDescriptor>,
    requested: Option<&Version>,
    host_os: &Version,
) -> Option<SdkDescriptor> {
    if inventory.is_empty() {
        return None;
    }

    if let Some(requested) = requested {
        if let Some(exact) = inventory.iter().find(|sdk| sdk.version == *requested) {
            return Some(exact.clone());
        }
        // Degrade to the newest installed SDK rather than fail
        return highest(inventory);
    }

    if let Some(host_match) = inventory.iter().find(|sdk| matches_host(&sdk.version, host_os)) {
        return Some(host_match.clone());
    }
    highest(inventory)
}

fn highest(inventory: Vec<SdkDescriptor>) -> Option<SdkDescriptor> {
    inventory.into_iter().max_by(|a, b| a.version.cmp(&b.version))
}

/// Whether an SDK version belongs to the host's OS release. Named
/// releases match release-wise (an SDK "14" covers a "14.5" host);
/// unknown versions fall back to a major.minor comparison.
fn matches_host(sdk: &Version, host: &Version) -> bool {
    match (MacosRelease::from_version(sdk), MacosRelease::from_version(host)) {
        (Some(a), Some(b)) => a == b,
        _ => sdk.major_minor() == host.major_minor(),
    }
}
