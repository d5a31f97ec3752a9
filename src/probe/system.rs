//! System probe implementation
//!
//! Shells out to the usual macOS utilities (`sw_vers`, `xcode-select`,
//! `pkgutil`, `mdfind`) and probes known filesystem locations. Every
//! external call is one-shot; a missing binary or non-zero exit collapses
//! into a negative answer. Receipt and bundle lookups are memoized for
//! the lifetime of the probe.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::ToolingProbe;

/// Install location of the Command Line Tools package.
pub const CLT_ROOT: &str = "/Library/Developer/CommandLineTools";

/// Installer receipt identifier for the CLT package.
pub const CLT_PKG_ID: &str = "com.apple.pkg.CLTools_Executables";

/// Installer receipt identifier for the separate SDK-headers package.
pub const CLT_HEADERS_PKG_ID: &str = "com.apple.pkg.macOS_SDK_headers_for_macOS_10.14";

/// Spotlight bundle identifier for Xcode.
pub const XCODE_BUNDLE_ID: &str = "com.apple.dt.Xcode";

/// Relative path from a developer directory to the macOS SDK inventory.
const SDK_SUBDIR: &str = "Platforms/MacOSX.platform/Developer/SDKs";

/// Header that proves headers are visible via the default search path.
const DEFAULT_PATH_HEADER: &str = "/usr/include/stdlib.h";

/// Probe backed by the real host system.
///
/// Not `Sync`: lookup memos are plain process-wide state per the
/// single-threaded execution model. Wrap in external locking if a
/// multi-threaded host ever needs to share one.
pub struct SystemProbe {
    clt_root: PathBuf,
    developer_dir_override: Option<PathBuf>,
    developer_dir: OnceCell<Option<PathBuf>>,
    pkg_info: RefCell<HashMap<String, Option<String>>>,
    bundle_paths: RefCell<HashMap<String, Vec<PathBuf>>>,
}

impl SystemProbe {
    pub fn new() -> Self {
        SystemProbe {
            clt_root: PathBuf::from(CLT_ROOT),
            developer_dir_override: None,
            developer_dir: OnceCell::new(),
            pkg_info: RefCell::new(HashMap::new()),
            bundle_paths: RefCell::new(HashMap::new()),
        }
    }

    /// Use a fixed developer directory instead of asking `xcode-select`.
    pub fn with_developer_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.developer_dir_override = Some(dir.into());
        self
    }

    /// Installer receipt info for a package id, memoized per process.
    ///
    /// `None` when the receipt is absent or `pkgutil` is unavailable.
    pub fn pkg_info(&self, pkg_id: &str) -> Option<String> {
        if let Some(cached) = self.pkg_info.borrow().get(pkg_id) {
            return cached.clone();
        }
        let info = command_stdout("pkgutil", &["--pkg-info", pkg_id]);
        self.pkg_info
            .borrow_mut()
            .insert(pkg_id.to_string(), info.clone());
        info
    }

    /// Spotlight-indexed bundle paths for a bundle id, memoized per process.
    pub fn bundle_paths(&self, bundle_id: &str) -> Vec<PathBuf> {
        if let Some(cached) = self.bundle_paths.borrow().get(bundle_id) {
            return cached.clone();
        }
        let query = format!("kMDItemCFBundleIdentifier == '{}'", bundle_id);
        let paths: Vec<PathBuf> = command_stdout("mdfind", &[query.as_str()])
            .map(|stdout| stdout.lines().map(PathBuf::from).collect())
            .unwrap_or_default();
        self.bundle_paths
            .borrow_mut()
            .insert(bundle_id.to_string(), paths.clone());
        paths
    }

    fn clt_sdk_dir(&self) -> PathBuf {
        self.clt_root.join("SDKs")
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolingProbe for SystemProbe {
    fn clt_installed(&self) -> bool {
        self.clt_root.join("usr/bin/clang").is_file() || self.pkg_info(CLT_PKG_ID).is_some()
    }

    fn clt_provides_sdk(&self) -> bool {
        self.clt_sdk_dir().is_dir()
    }

    fn clt_headers_separate(&self) -> bool {
        if !self.clt_provides_sdk() {
            return false;
        }
        // Headers mirrored into /usr/include (pre-10.14 layout, or the
        // optional headers package) are found without an SDK root.
        if Path::new(DEFAULT_PATH_HEADER).is_file() {
            return false;
        }
        self.pkg_info(CLT_HEADERS_PKG_ID).is_none()
    }

    fn xcode_installed(&self) -> bool {
        if Path::new("/Applications/Xcode.app").is_dir() {
            return true;
        }
        if !self.bundle_paths(XCODE_BUNDLE_ID).is_empty() {
            return true;
        }
        // A developer dir inside an app bundle means Xcode, not CLT
        self.active_developer_dir()
            .map(|dir| dir.to_string_lossy().contains(".app/"))
            .unwrap_or(false)
    }

    fn xcode_sdk_dir(&self) -> Option<PathBuf> {
        let developer_dir = self
            .active_developer_dir()
            .filter(|dir| dir != &self.clt_root)
            .or_else(|| {
                self.bundle_paths(XCODE_BUNDLE_ID)
                    .first()
                    .map(|app| app.join("Contents/Developer"))
            })?;
        Some(developer_dir.join(SDK_SUBDIR))
    }

    fn active_developer_dir(&self) -> Option<PathBuf> {
        self.developer_dir
            .get_or_init(|| {
                self.developer_dir_override
                    .clone()
                    .or_else(|| command_stdout("xcode-select", &["-p"]).map(PathBuf::from))
            })
            .clone()
    }

    fn macos_product_version(&self) -> Option<String> {
        command_stdout("sw_vers", &["-productVersion"])
    }

    fn macos_build_version(&self) -> Option<String> {
        command_stdout("sw_vers", &["-buildVersion"])
    }
}

/// Run a command and return trimmed stdout, absorbing every failure mode
/// (missing binary, non-zero exit, empty output) into `None`.
fn command_stdout(cmd: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(cmd).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        None
    } else {
        Some(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_absorbed() {
        assert_eq!(command_stdout("definitely-not-a-binary", &[]), None);
    }

    #[test]
    fn test_pkg_info_memoized() {
        let probe = SystemProbe::new();
        let first = probe.pkg_info("com.example.no.such.pkg");
        let second = probe.pkg_info("com.example.no.such.pkg");
        assert_eq!(first, second);
        assert_eq!(probe.pkg_info.borrow().len(), 1);
    }

    #[test]
    fn test_developer_dir_override_wins() {
        let probe = SystemProbe::new().with_developer_dir("/tmp/Developer");
        assert_eq!(
            probe.active_developer_dir(),
            Some(PathBuf::from("/tmp/Developer"))
        );
        // memoized: asking again hits the cell, not xcode-select
        assert_eq!(
            probe.active_developer_dir(),
            Some(PathBuf::from("/tmp/Developer"))
        );
    }
}
