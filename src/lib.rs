//! macsdk - SDK root resolution for macOS developer tooling
//!
//! Determines which SDK root path, if any, a build should point at, given
//! the developer tooling installed on the host (Xcode, Command Line Tools,
//! or neither) and an optional requested SDK version.

pub mod config;
pub mod host;
pub mod mock;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod sdk;

pub use macsdk_version::{MacosRelease, Version};
pub use probe::{SystemProbe, ToolingProbe, ToolingState};
pub use report::InfoReport;
pub use resolver::SdkResolver;
pub use sdk::{SdkDescriptor, SdkLocator, SdkSource};
