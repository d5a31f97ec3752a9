//! SDK resolution integration tests
//!
//! Drives the resolver end-to-end with a scripted probe and fixture SDK
//! trees: locator choice, version matching and fallback, the forced-Xcode
//! requirement, and the "is an SDK root needed at all" gate.

use macsdk::mock::{self, MockProbe};
use macsdk::{SdkResolver, SdkSource, Version};
use tempfile::TempDir;

const DEVELOPER_DIR: &str = "/Applications/Xcode.app/Contents/Developer";

/// CLT fully installed with its own SDK inventory rooted at `dir`.
fn clt_resolver(dir: &TempDir, os: &str) -> SdkResolver<MockProbe> {
    let probe = MockProbe::new().clt(true, true, true);
    SdkResolver::new(probe, Version::parse(os)).with_clt_sdk_dir(dir.path())
}

/// No CLT; Xcode SDK inventory rooted at `dir`.
fn xcode_resolver(dir: &TempDir, os: &str) -> SdkResolver<MockProbe> {
    let probe = MockProbe::new().xcode(true, Some(DEVELOPER_DIR));
    SdkResolver::new(probe, Version::parse(os)).with_xcode_sdk_dir(dir.path())
}

// =============================================================================
// Version matching
// =============================================================================

#[test]
fn test_requested_version_present_returns_exact() {
    let dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(dir.path(), &["10.14", "10.15"]).unwrap();
    let resolver = clt_resolver(&dir, "10.15");

    let sdk = resolver.sdk(Some(&Version::parse("10.14"))).unwrap();

    assert_eq!(sdk.version, Version::parse("10.14"));
    assert_eq!(sdk.source, SdkSource::CommandLineTools);
    assert!(sdk.path.ends_with("MacOSX10.14.sdk"));
}

#[test]
fn test_requested_version_absent_degrades_to_highest() {
    let dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(dir.path(), &["10.14", "10.15"]).unwrap();
    let resolver = clt_resolver(&dir, "10.15");

    // 10.13 is not installed; the lookup degrades instead of failing
    let sdk = resolver.sdk(Some(&Version::parse("10.13"))).unwrap();

    assert_eq!(sdk.version, Version::parse("10.15"));
}

#[test]
fn test_no_request_prefers_host_os_release() {
    let dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(dir.path(), &["13", "14", "15"]).unwrap();
    let resolver = xcode_resolver(&dir, "14.5");

    let sdk = resolver.sdk(None).unwrap();

    assert_eq!(sdk.version, Version::parse("14"));
}

#[test]
fn test_no_request_without_host_match_takes_highest() {
    let dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(dir.path(), &["10.14", "10.15"]).unwrap();
    let resolver = clt_resolver(&dir, "12.3");

    let sdk = resolver.sdk(None).unwrap();

    assert_eq!(sdk.version, Version::parse("10.15"));
}

#[test]
fn test_unversioned_sdk_resolves_through_settings() {
    let dir = TempDir::new().unwrap();
    mock::write_unversioned_sdk_fixture(dir.path(), "14.5").unwrap();
    let resolver = xcode_resolver(&dir, "14.5");

    let sdk = resolver.sdk(None).unwrap();

    assert_eq!(sdk.version, Version::parse("14.5"));
    assert!(sdk.path.ends_with("MacOSX.sdk"));
}

// =============================================================================
// Locator choice and requirements
// =============================================================================

#[test]
fn test_clt_preferred_when_it_provides_sdk() {
    let dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(dir.path(), &["14"]).unwrap();
    let probe = MockProbe::new()
        .clt(true, true, true)
        .xcode(true, Some(DEVELOPER_DIR));
    let resolver =
        SdkResolver::new(probe, Version::parse("14.5")).with_clt_sdk_dir(dir.path());

    assert_eq!(resolver.locator().source(), SdkSource::CommandLineTools);
    assert_eq!(resolver.sdk(None).unwrap().source, SdkSource::CommandLineTools);
}

#[test]
fn test_full_ide_requirement_bypasses_memoized_clt_locator() {
    let clt_dir = TempDir::new().unwrap();
    let xcode_dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(clt_dir.path(), &["14"]).unwrap();
    mock::write_sdk_fixture(xcode_dir.path(), &["14", "15"]).unwrap();

    let probe = MockProbe::new()
        .clt(true, true, true)
        .xcode(true, Some(DEVELOPER_DIR));
    let resolver = SdkResolver::new(probe, Version::parse("14.5"))
        .with_clt_sdk_dir(clt_dir.path())
        .with_xcode_sdk_dir(xcode_dir.path());

    // CLT is the memoized default...
    assert_eq!(resolver.sdk(None).unwrap().source, SdkSource::CommandLineTools);

    // ...but a requirement demanding the full IDE must never get a CLT SDK
    let forced = resolver
        .sdk_for_requirement(true, Some(&Version::parse("14")))
        .unwrap();
    assert_eq!(forced.source, SdkSource::Xcode);

    // and the default choice is untouched afterwards
    assert_eq!(resolver.locator().source(), SdkSource::CommandLineTools);
    assert_eq!(resolver.sdk(None).unwrap().source, SdkSource::CommandLineTools);
}

#[test]
fn test_requirement_without_ide_mandate_uses_default_locator() {
    let dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(dir.path(), &["14"]).unwrap();
    let resolver = clt_resolver(&dir, "14.5");

    let sdk = resolver.sdk_for_requirement(false, None).unwrap();

    assert_eq!(sdk.source, SdkSource::CommandLineTools);
}

// =============================================================================
// The SDK-root gate
// =============================================================================

#[test]
fn test_no_sdk_root_needed_when_headers_in_default_path() {
    let dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(dir.path(), &["14"]).unwrap();
    let probe = MockProbe::new().clt(true, true, false);
    let resolver =
        SdkResolver::new(probe, Version::parse("14.5")).with_clt_sdk_dir(dir.path());

    assert!(!resolver.sdk_root_needed());
    // an SDK exists, but nothing should be exported
    assert!(resolver.sdk(None).is_some());
    assert!(resolver.sdk_path_if_needed(None).is_none());
}

#[test]
fn test_sdk_root_needed_when_headers_are_separate() {
    let dir = TempDir::new().unwrap();
    mock::write_sdk_fixture(dir.path(), &["14"]).unwrap();
    let resolver = clt_resolver(&dir, "14.5");

    assert!(resolver.sdk_root_needed());
    let path = resolver.sdk_path_if_needed(None).unwrap();
    assert!(path.ends_with("MacOSX14.sdk"));
}

#[test]
fn test_nothing_installed_resolves_to_none_everywhere() {
    let empty = TempDir::new().unwrap();
    let probe = MockProbe::new();
    let resolver =
        SdkResolver::new(probe, Version::parse("14.5")).with_xcode_sdk_dir(empty.path());

    // no CLT at all: an SDK root would be needed, but none exists
    assert!(resolver.sdk_root_needed());
    assert!(resolver.sdk(None).is_none());
    assert!(resolver.sdk_path(None).is_none());
    assert!(resolver.sdk_path_if_needed(None).is_none());
    assert!(resolver.sdk_for_requirement(true, None).is_none());
}

// =============================================================================
// Null-version ordering (resolution relies on it)
// =============================================================================

#[test]
fn test_null_version_orders_below_real_versions() {
    assert!(Version::null() < Version::parse("0.0"));
    assert!(Version::from(None::<&str>) < Version::parse("0.0"));
}
