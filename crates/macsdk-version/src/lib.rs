//! macsdk version values
//!
//! Defines the ordered [`Version`] value type used for every "is this OS/SDK
//! new enough" decision, plus the named macOS release table.

pub mod release;
pub mod version;

pub use release::MacosRelease;
pub use version::Version;
