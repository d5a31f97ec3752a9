//! macsdk CLI
//!
//! Entry point for the `macsdk` command-line tool.

use clap::{Parser, Subcommand};
use macsdk::config::{CliOverrides, ConfigFile, EffectiveConfig, EnvOverrides};
use macsdk::host::{self, OsVersions};
use macsdk::probe::{SystemProbe, ToolingProbe};
use macsdk::resolver::SdkResolver;
use macsdk::{InfoReport, Version};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "macsdk")]
#[command(about = "SDK root resolution for macOS developer tooling", version)]
struct Cli {
    /// Developer directory to use instead of asking xcode-select
    #[arg(long, global = true)]
    developer_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SDK root path a build should use
    Path {
        /// Requested SDK version (e.g., "14.5")
        #[arg(long)]
        sdk: Option<Version>,

        /// Print nothing and exit 0 when no SDK root is needed
        #[arg(long)]
        if_needed: bool,

        /// Resolve against the full Xcode toolchain even when CLT is the default
        #[arg(long)]
        require_xcode: bool,
    },

    /// Report the full resolution: tooling, locator, SDK, host probes
    Info {
        /// Requested SDK version (e.g., "14.5")
        #[arg(long)]
        sdk: Option<Version>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Dump the raw tooling probe snapshot
    Probe {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(e) = host::ensure_macos_host() {
        eprintln!("{}", e);
        process::exit(1);
    }

    let cli = Cli::parse();
    let overrides = CliOverrides {
        developer_dir: cli.developer_dir.clone(),
        default_sdk: None,
    };

    match cli.command {
        Commands::Path {
            sdk,
            if_needed,
            require_xcode,
        } => {
            run_path(overrides, sdk, if_needed, require_xcode);
        }
        Commands::Info { sdk, json } => {
            run_info(overrides, sdk, json);
        }
        Commands::Probe { json } => {
            run_probe(overrides, json);
        }
    }
}

fn run_path(overrides: CliOverrides, sdk: Option<Version>, if_needed: bool, require_xcode: bool) {
    let (resolver, config, _) = build_resolver(overrides);

    if if_needed && !resolver.sdk_root_needed() {
        return;
    }

    let requested = sdk.or(config.default_sdk);
    match resolver.sdk_for_requirement(require_xcode, requested.as_ref()) {
        Some(sdk) => println!("{}", sdk.path.display()),
        None => {
            eprintln!("no macOS SDK installed");
            process::exit(1);
        }
    }
}

fn run_info(overrides: CliOverrides, sdk: Option<Version>, json: bool) {
    let (resolver, config, versions) = build_resolver(overrides);

    let requested = sdk.or(config.default_sdk);
    let report = InfoReport::collect(
        &resolver,
        versions.full_version.clone(),
        requested.as_ref(),
        host::preferred_languages(),
        host::detect_package_managers(),
    );

    if json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", report.to_human_readable());
    }
}

fn run_probe(overrides: CliOverrides, json: bool) {
    let (resolver, _, _) = build_resolver(overrides);
    let state = resolver.tooling();

    if json {
        match state.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Command Line Tools installed: {}", state.clt_installed);
        println!("  provides SDK: {}", state.clt_provides_sdk);
        println!("  separate headers: {}", state.clt_headers_separate);
        println!("Xcode installed: {}", state.xcode_installed);
        if let Some(dir) = &state.developer_dir {
            println!("Developer dir: {}", dir.display());
        }
        if let Some(dir) = &state.xcode_sdk_dir {
            println!("Xcode SDK dir: {}", dir.display());
        }
        if let Some(version) = &state.macos_version {
            println!("macOS: {}", version);
        }
    }
}

/// Assemble the per-process resolver from the config layers and the
/// system probe.
fn build_resolver(overrides: CliOverrides) -> (SdkResolver<SystemProbe>, EffectiveConfig, OsVersions) {
    let file = match ConfigFile::load_user() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    let config = EffectiveConfig::resolve(file.as_ref(), &EnvOverrides::from_env(), &overrides);

    let probe = match &config.developer_dir {
        Some(dir) => SystemProbe::new().with_developer_dir(dir.clone()),
        None => SystemProbe::new(),
    };
    let versions = os_versions(&probe);

    let mut resolver = SdkResolver::new(probe, versions.version.clone());
    if let Some(dir) = &config.clt_sdk_dir {
        resolver = resolver.with_clt_sdk_dir(dir.clone());
    }
    if let Some(dir) = &config.xcode_sdk_dir {
        resolver = resolver.with_xcode_sdk_dir(dir.clone());
    }

    (resolver, config, versions)
}

/// The required OS-version inputs: taken from the environment when set,
/// seeded from the host otherwise.
fn os_versions(probe: &SystemProbe) -> OsVersions {
    if let Ok(versions) = OsVersions::from_env() {
        return versions;
    }
    match probe.macos_product_version() {
        Some(full) => OsVersions::new(&full, &full),
        None => {
            eprintln!(
                "could not determine the macOS version; set {} and {}",
                host::OS_VERSION_ENV,
                host::OS_FULL_VERSION_ENV
            );
            process::exit(1);
        }
    }
}
