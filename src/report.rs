//! Resolution report
//!
//! Gathers everything the resolver decided into one snapshot for the
//! `info` command, serializable as JSON or rendered for humans.

use std::path::PathBuf;

use macsdk_version::{MacosRelease, Version};
use serde::{Deserialize, Serialize};

use crate::host::PackageManager;
use crate::probe::{ToolingProbe, ToolingState};
use crate::resolver::SdkResolver;
use crate::sdk::{SdkDescriptor, SdkSource};

/// Everything `macsdk info` reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoReport {
    /// Host OS marketing version (major.minor)
    pub os_version: Version,

    /// Host OS full version
    pub os_full_version: Version,

    /// Named release the host belongs to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<MacosRelease>,

    /// Tooling snapshot the resolution ran against
    pub tooling: ToolingState,

    /// Which tooling source the chosen locator draws from
    pub locator: SdkSource,

    /// Whether compilation needs an explicit SDK root
    pub sdk_root_needed: bool,

    /// Best-matching SDK, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk: Option<SdkDescriptor>,

    /// The path a build should export, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdk_path_if_needed: Option<PathBuf>,

    /// User language preferences, most preferred first
    pub languages: Vec<String>,

    /// Competing package managers found on the host
    pub package_managers: Vec<PackageManager>,
}

impl InfoReport {
    /// Collect a report from a resolver and the host probes.
    pub fn collect<P: ToolingProbe>(
        resolver: &SdkResolver<P>,
        full_version: Version,
        requested: Option<&Version>,
        languages: Vec<String>,
        package_managers: Vec<PackageManager>,
    ) -> Self {
        InfoReport {
            os_version: resolver.os_version().clone(),
            os_full_version: full_version,
            release: MacosRelease::from_version(resolver.os_version()),
            tooling: resolver.tooling().clone(),
            locator: resolver.locator().source(),
            sdk_root_needed: resolver.sdk_root_needed(),
            sdk: resolver.sdk(requested),
            sdk_path_if_needed: resolver.sdk_path_if_needed(requested),
            languages,
            package_managers,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format for human-readable output.
    pub fn to_human_readable(&self) -> String {
        let mut output = String::new();

        let release = self
            .release
            .map(|release| format!(" ({})", release.name()))
            .unwrap_or_default();
        output.push_str(&format!(
            "macOS {}{}\n",
            self.os_full_version, release
        ));

        output.push_str("\nTooling:\n");
        output.push_str(&format!(
            "  Command Line Tools: {}\n",
            if self.tooling.clt_installed {
                "installed"
            } else {
                "not installed"
            }
        ));
        if self.tooling.clt_installed {
            output.push_str(&format!(
                "    provides SDK: {}\n    separate headers: {}\n",
                self.tooling.clt_provides_sdk, self.tooling.clt_headers_separate
            ));
        }
        output.push_str(&format!(
            "  Xcode: {}\n",
            if self.tooling.xcode_installed {
                "installed"
            } else {
                "not installed"
            }
        ));
        if let Some(dir) = &self.tooling.developer_dir {
            output.push_str(&format!("  Developer dir: {}\n", dir.display()));
        }

        output.push_str(&format!("\nLocator: {}\n", self.locator.label()));
        output.push_str(&format!("SDK root needed: {}\n", self.sdk_root_needed));
        match &self.sdk {
            Some(sdk) => output.push_str(&format!(
                "SDK: {} at {}\n",
                sdk.version,
                sdk.path.display()
            )),
            None => output.push_str("SDK: none installed\n"),
        }
        if let Some(path) = &self.sdk_path_if_needed {
            output.push_str(&format!("Export SDKROOT: {}\n", path.display()));
        }

        if !self.languages.is_empty() {
            output.push_str(&format!("\nLanguages: {}\n", self.languages.join(", ")));
        }
        if !self.package_managers.is_empty() {
            let names: Vec<&str> = self.package_managers.iter().map(|m| m.name()).collect();
            output.push_str(&format!("Package managers: {}\n", names.join(", ")));
        }

        output
    }
}
