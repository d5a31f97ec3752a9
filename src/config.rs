//! Configuration layering
//!
//! Effective settings merge four layers, later layers winning:
//! built-in defaults, the user config file
//! (`~/.config/macsdk/config.toml`), environment overrides, CLI flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use macsdk_version::Version;
use serde::Deserialize;

use crate::host;

/// Environment override for the developer directory.
pub const DEVELOPER_DIR_ENV: &str = "MACSDK_DEVELOPER_DIR";

/// Environment override for the CLT SDK inventory directory.
pub const CLT_SDK_DIR_ENV: &str = "MACSDK_CLT_SDK_DIR";

/// Environment override for the Xcode SDK inventory directory.
pub const XCODE_SDK_DIR_ENV: &str = "MACSDK_XCODE_SDK_DIR";

/// Environment override for the default requested SDK version.
pub const DEFAULT_SDK_ENV: &str = "MACSDK_DEFAULT_SDK";

/// Configuration file errors. Absence of the file is not one of them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Developer directory to use instead of asking `xcode-select`
    pub developer_dir: Option<PathBuf>,

    /// SDK version requested when the caller names none
    pub default_sdk: Option<String>,

    /// CLT SDK inventory override
    pub clt_sdk_dir: Option<PathBuf>,

    /// Xcode SDK inventory override
    pub xcode_sdk_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Parse a TOML document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Load the user config file; a missing file is simply no config.
    pub fn load_user() -> Result<Option<Self>, ConfigError> {
        match host::user_config_path() {
            Some(path) if path.is_file() => Ok(Some(Self::load(&path)?)),
            _ => Ok(None),
        }
    }
}

/// Overrides taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub developer_dir: Option<PathBuf>,
    pub default_sdk: Option<String>,
    pub clt_sdk_dir: Option<PathBuf>,
    pub xcode_sdk_dir: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        EnvOverrides {
            developer_dir: env::var_os(DEVELOPER_DIR_ENV).map(PathBuf::from),
            default_sdk: env::var(DEFAULT_SDK_ENV).ok(),
            clt_sdk_dir: env::var_os(CLT_SDK_DIR_ENV).map(PathBuf::from),
            xcode_sdk_dir: env::var_os(XCODE_SDK_DIR_ENV).map(PathBuf::from),
        }
    }
}

/// Overrides taken from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub developer_dir: Option<PathBuf>,
    pub default_sdk: Option<String>,
}

/// The merged result of all layers.
#[derive(Debug, Clone, Default)]
pub struct EffectiveConfig {
    pub developer_dir: Option<PathBuf>,
    pub default_sdk: Option<Version>,
    pub clt_sdk_dir: Option<PathBuf>,
    pub xcode_sdk_dir: Option<PathBuf>,
}

impl EffectiveConfig {
    /// Merge layers; CLI beats environment beats file beats defaults.
    pub fn resolve(
        file: Option<&ConfigFile>,
        env: &EnvOverrides,
        cli: &CliOverrides,
    ) -> Self {
        let pick_path = |cli: &Option<PathBuf>, env: &Option<PathBuf>, file: Option<&PathBuf>| {
            cli.clone()
                .or_else(|| env.clone())
                .or_else(|| file.cloned())
        };

        let default_sdk = cli
            .default_sdk
            .clone()
            .or_else(|| env.default_sdk.clone())
            .or_else(|| file.and_then(|f| f.default_sdk.clone()))
            .map(|raw| Version::parse(&raw))
            .filter(|version| !version.is_null());

        EffectiveConfig {
            developer_dir: pick_path(
                &cli.developer_dir,
                &env.developer_dir,
                file.and_then(|f| f.developer_dir.as_ref()),
            ),
            default_sdk,
            clt_sdk_dir: pick_path(
                &None,
                &env.clt_sdk_dir,
                file.and_then(|f| f.clt_sdk_dir.as_ref()),
            ),
            xcode_sdk_dir: pick_path(
                &None,
                &env.xcode_sdk_dir,
                file.and_then(|f| f.xcode_sdk_dir.as_ref()),
            ),
        }
    }
}
