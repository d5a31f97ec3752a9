//! Scriptable probe and fixtures
//!
//! A fully configurable [`ToolingProbe`] plus helpers that materialize
//! fake SDK trees, so resolution can be exercised on any host.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::probe::ToolingProbe;

/// Probe whose every answer is scripted by the test.
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    clt_installed: bool,
    clt_provides_sdk: bool,
    clt_headers_separate: bool,
    xcode_installed: bool,
    developer_dir: Option<PathBuf>,
    macos_version: Option<String>,
    macos_build: Option<String>,
}

impl MockProbe {
    /// A probe reporting a bare host: no CLT, no Xcode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the three CLT answers.
    pub fn clt(mut self, installed: bool, provides_sdk: bool, headers_separate: bool) -> Self {
        self.clt_installed = installed;
        self.clt_provides_sdk = provides_sdk;
        self.clt_headers_separate = headers_separate;
        self
    }

    /// Script the Xcode answers; the SDK dir is derived from the
    /// developer dir the way the real probe derives it.
    pub fn xcode(mut self, installed: bool, developer_dir: Option<impl Into<PathBuf>>) -> Self {
        self.xcode_installed = installed;
        self.developer_dir = developer_dir.map(Into::into);
        self
    }

    /// Script the reported OS versions.
    pub fn macos(mut self, version: &str, build: &str) -> Self {
        self.macos_version = Some(version.to_string());
        self.macos_build = Some(build.to_string());
        self
    }
}

impl ToolingProbe for MockProbe {
    fn clt_installed(&self) -> bool {
        self.clt_installed
    }

    fn clt_provides_sdk(&self) -> bool {
        self.clt_provides_sdk
    }

    fn clt_headers_separate(&self) -> bool {
        self.clt_headers_separate
    }

    fn xcode_installed(&self) -> bool {
        self.xcode_installed
    }

    fn xcode_sdk_dir(&self) -> Option<PathBuf> {
        self.developer_dir
            .as_ref()
            .map(|dir| dir.join("Platforms/MacOSX.platform/Developer/SDKs"))
    }

    fn active_developer_dir(&self) -> Option<PathBuf> {
        self.developer_dir.clone()
    }

    fn macos_product_version(&self) -> Option<String> {
        self.macos_version.clone()
    }

    fn macos_build_version(&self) -> Option<String> {
        self.macos_build.clone()
    }
}

/// Create versioned SDK directories (`MacOSX<v>.sdk`) under `root`.
pub fn write_sdk_fixture(root: &Path, versions: &[&str]) -> io::Result<()> {
    for version in versions {
        let sdk = root.join(format!("MacOSX{}.sdk", version));
        fs::create_dir_all(sdk.join("usr/include"))?;
    }
    Ok(())
}

/// Create an unversioned `MacOSX.sdk` whose version lives in
/// `SDKSettings.json`, the modern Xcode layout.
pub fn write_unversioned_sdk_fixture(root: &Path, version: &str) -> io::Result<()> {
    let sdk = root.join("MacOSX.sdk");
    fs::create_dir_all(&sdk)?;
    fs::write(
        sdk.join("SDKSettings.json"),
        format!(
            r#"{{"CanonicalName":"macosx{}","Version":"{}"}}"#,
            version, version
        ),
    )
}
