//! Developer-tooling probes
//!
//! Answers what is installed on the host: Command Line Tools, Xcode, and
//! where their SDKs live. Probes are read-only and cacheable for the
//! lifetime of the process; a failed probe reads as "not installed",
//! never as an error.

mod system;

pub use system::SystemProbe;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a tooling probe can answer about the host.
///
/// Implementations must be side-effect free per process: asking twice
/// returns the same answer, so callers are free to snapshot the results
/// once and keep them (see [`ToolingState`]).
pub trait ToolingProbe {
    /// Whether the Command Line Tools package is installed.
    fn clt_installed(&self) -> bool;

    /// Whether the installed CLT ships an SDK directory of its own.
    fn clt_provides_sdk(&self) -> bool;

    /// Whether the CLT keeps system headers in a separate SDK instead of
    /// the default search path. When false, no SDK root is required for
    /// compilation even though an SDK may exist.
    fn clt_headers_separate(&self) -> bool;

    /// Whether a full Xcode installation is present.
    fn xcode_installed(&self) -> bool;

    /// SDK directory of the active Xcode installation, if any.
    fn xcode_sdk_dir(&self) -> Option<PathBuf>;

    /// The active developer directory (`xcode-select -p`), if any.
    fn active_developer_dir(&self) -> Option<PathBuf>;

    /// macOS marketing version (e.g., "14.5"), if determinable.
    fn macos_product_version(&self) -> Option<String>;

    /// macOS build identifier (e.g., "23F79"), if determinable.
    fn macos_build_version(&self) -> Option<String>;
}

/// Snapshot of everything a [`ToolingProbe`] reports.
///
/// Captured once and held for the rest of the process; tooling is assumed
/// not to change while we run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolingState {
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,

    /// CLT package present
    pub clt_installed: bool,

    /// CLT ships its own SDK directory
    pub clt_provides_sdk: bool,

    /// CLT headers live in a separate SDK, not the default search path
    pub clt_headers_separate: bool,

    /// Full Xcode installation present
    pub xcode_installed: bool,

    /// Active Xcode SDK directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcode_sdk_dir: Option<PathBuf>,

    /// Active developer directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_dir: Option<PathBuf>,

    /// macOS marketing version as reported by the host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macos_version: Option<String>,

    /// macOS build identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macos_build: Option<String>,
}

impl ToolingState {
    /// Capture a snapshot from a probe.
    pub fn capture(probe: &dyn ToolingProbe) -> Self {
        ToolingState {
            captured_at: Utc::now(),
            clt_installed: probe.clt_installed(),
            clt_provides_sdk: probe.clt_provides_sdk(),
            clt_headers_separate: probe.clt_headers_separate(),
            xcode_installed: probe.xcode_installed(),
            xcode_sdk_dir: probe.xcode_sdk_dir(),
            developer_dir: probe.active_developer_dir(),
            macos_version: probe.macos_product_version(),
            macos_build: probe.macos_build_version(),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProbe;

    #[test]
    fn test_capture_mirrors_probe() {
        let probe = MockProbe::new()
            .clt(true, true, true)
            .xcode(true, Some("/Applications/Xcode.app/Contents/Developer"));

        let state = ToolingState::capture(&probe);

        assert!(state.clt_installed);
        assert!(state.clt_provides_sdk);
        assert!(state.clt_headers_separate);
        assert!(state.xcode_installed);
        assert!(state.developer_dir.is_some());
    }

    #[test]
    fn test_json_shape() {
        let state = ToolingState::capture(&MockProbe::new());
        let json = state.to_json().unwrap();

        assert!(json.contains(r#""clt_installed": false"#));
        assert!(json.contains(r#""xcode_installed": false"#));
        // absent optionals are omitted entirely
        assert!(!json.contains("developer_dir"));
    }
}
