//! SDK resolution
//!
//! The per-process context object that decides which locator to use,
//! applies requirement rules, and gates whether an SDK root is needed at
//! all. Every decision is memoized once and held for the lifetime of the
//! resolver; tooling is assumed not to change while the process runs.

use std::cell::OnceCell;
use std::path::PathBuf;

use macsdk_version::Version;

use crate::probe::{ToolingProbe, ToolingState};
use crate::sdk::{CltLocator, SdkDescriptor, SdkLocator, XcodeLocator};

/// Fallback developer directory when neither `xcode-select` nor Spotlight
/// can place Xcode.
const DEFAULT_XCODE_DEVELOPER_DIR: &str = "/Applications/Xcode.app/Contents/Developer";

/// Per-process SDK resolver.
///
/// Construct once per run and pass around; all once-per-process caches
/// (tooling snapshot, locator choice) live here instead of in hidden
/// globals. Not `Sync`; concurrent callers need external locking.
pub struct SdkResolver<P: ToolingProbe> {
    probe: P,
    os_version: Version,
    clt_sdk_dir: Option<PathBuf>,
    xcode_sdk_dir: Option<PathBuf>,
    tooling: OnceCell<ToolingState>,
    locator: OnceCell<SdkLocator>,
    xcode_locator: OnceCell<SdkLocator>,
}

impl<P: ToolingProbe> SdkResolver<P> {
    /// Create a resolver for a host running `os_version`.
    pub fn new(probe: P, os_version: Version) -> Self {
        SdkResolver {
            probe,
            os_version,
            clt_sdk_dir: None,
            xcode_sdk_dir: None,
            tooling: OnceCell::new(),
            locator: OnceCell::new(),
            xcode_locator: OnceCell::new(),
        }
    }

    /// Override the CLT SDK inventory directory.
    pub fn with_clt_sdk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.clt_sdk_dir = Some(dir.into());
        self
    }

    /// Override the Xcode SDK inventory directory.
    pub fn with_xcode_sdk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.xcode_sdk_dir = Some(dir.into());
        self
    }

    /// The host OS version this resolver matches SDKs against.
    pub fn os_version(&self) -> &Version {
        &self.os_version
    }

    /// Tooling snapshot, probed on first use and held thereafter.
    pub fn tooling(&self) -> &ToolingState {
        self.tooling
            .get_or_init(|| ToolingState::capture(&self.probe))
    }

    /// The locator for this host, chosen once per process: CLT when it is
    /// installed and ships its own SDK inventory, Xcode otherwise.
    pub fn locator(&self) -> &SdkLocator {
        self.locator.get_or_init(|| {
            let tooling = self.tooling();
            if tooling.clt_installed && tooling.clt_provides_sdk {
                SdkLocator::Clt(match &self.clt_sdk_dir {
                    Some(dir) => CltLocator::with_sdk_dir(dir),
                    None => CltLocator::new(),
                })
            } else {
                self.force_xcode_locator()
            }
        })
    }

    /// Best-matching SDK from the chosen locator.
    pub fn sdk(&self, requested: Option<&Version>) -> Option<SdkDescriptor> {
        self.locator().sdk_if_applicable(requested, &self.os_version)
    }

    /// Like [`sdk`](Self::sdk), but a build requirement that mandates the
    /// full Xcode toolchain bypasses the chosen locator entirely.
    pub fn sdk_for_requirement(
        &self,
        requires_xcode: bool,
        requested: Option<&Version>,
    ) -> Option<SdkDescriptor> {
        if requires_xcode {
            self.xcode_locator()
                .sdk_if_applicable(requested, &self.os_version)
        } else {
            self.sdk(requested)
        }
    }

    /// Whether compilation needs an explicit SDK root at all.
    ///
    /// False when CLT is installed and either provides no SDK or keeps
    /// its headers in the default search path; true otherwise (no CLT, or
    /// CLT with a genuinely separate SDK that must be pointed to).
    pub fn sdk_root_needed(&self) -> bool {
        let tooling = self.tooling();
        !(tooling.clt_installed && (!tooling.clt_provides_sdk || !tooling.clt_headers_separate))
    }

    /// Path of the best-matching SDK.
    pub fn sdk_path(&self, requested: Option<&Version>) -> Option<PathBuf> {
        self.sdk(requested).map(|sdk| sdk.path)
    }

    /// Path of the best-matching SDK, but only when one is needed.
    ///
    /// `None` either because no SDK root is required or because none is
    /// installed; both are normal outcomes.
    pub fn sdk_path_if_needed(&self, requested: Option<&Version>) -> Option<PathBuf> {
        if !self.sdk_root_needed() {
            return None;
        }
        self.sdk_path(requested)
    }

    /// The Xcode locator used for full-IDE requirements, memoized
    /// separately from the default choice.
    fn xcode_locator(&self) -> &SdkLocator {
        self.xcode_locator.get_or_init(|| self.force_xcode_locator())
    }

    fn force_xcode_locator(&self) -> SdkLocator {
        if let Some(dir) = &self.xcode_sdk_dir {
            return SdkLocator::Xcode(XcodeLocator::with_sdk_dir(dir));
        }
        if let Some(dir) = self.tooling().xcode_sdk_dir.clone() {
            return SdkLocator::Xcode(XcodeLocator::with_sdk_dir(dir));
        }
        SdkLocator::Xcode(XcodeLocator::new(DEFAULT_XCODE_DEVELOPER_DIR))
    }
}
