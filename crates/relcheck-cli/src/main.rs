//! relcheck - build report and release-readiness gate
//!
//! ## Commands
//!
//! - `info`: Show build and host information
//! - `version`: Compare the toolchain against minimum versions
//! - `platform`: Show which common platforms match the host
//! - `check`: Evaluate release conditions; exits non-zero on failure
//!
//! Without a command, prints every report in turn and finishes with `check`.

mod report;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use relcheck_core::{DeploymentEnvironment, Introspector, ReleasePolicy};
use tracing::{info, Level};

use crate::report::{
    write_build_info, write_json, write_platform_checks, write_results, write_version_checks,
    CheckReport, DEFAULT_MINIMUMS,
};

#[derive(Parser)]
#[command(name = "relcheck")]
#[command(author = "Stevedores Org")]
#[command(version = relcheck_core::VERSION)]
#[command(about = "Build introspection and release-readiness checks", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show build and host information
    Info {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Compare the toolchain version against minimums
    Version {
        /// Minimum version to test (repeatable)
        #[arg(long = "at-least", value_name = "VERSION")]
        at_least: Vec<String>,
    },

    /// Show which common OS/arch pairs match the host
    Platform,

    /// Evaluate release-readiness conditions
    Check {
        /// Deployment environment selecting the built-in policy
        #[arg(short, long, env = "RELCHECK_ENV", default_value = "development")]
        environment: DeploymentEnvironment,

        /// JSON policy file; overrides the environment's built-in policy
        #[arg(short, long, env = "RELCHECK_POLICY")]
        policy: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    relcheck_core::init_tracing(cli.json, level);

    let host = relcheck_core::system().clone();
    let mut out = std::io::stdout().lock();

    match cli.command {
        None => cmd_report(&mut out, &host),
        Some(Commands::Info { format }) => cmd_info(&mut out, &host, format),
        Some(Commands::Version { at_least }) => cmd_version(&mut out, &host, &at_least),
        Some(Commands::Platform) => {
            write_platform_checks(&mut out, &host)?;
            Ok(())
        }
        Some(Commands::Check {
            environment,
            policy,
            format,
        }) => cmd_check(&mut out, &host, environment, policy.as_deref(), format),
    }
}

fn cmd_report(out: &mut impl Write, host: &Introspector) -> Result<()> {
    writeln!(out, "=== relcheck {} ===", relcheck_core::VERSION)?;
    writeln!(out)?;
    write_build_info(out, &host.build_info())?;
    writeln!(out)?;
    cmd_version(out, host, &[])?;
    writeln!(out)?;
    write_platform_checks(out, host)?;
    writeln!(out)?;
    cmd_check(
        out,
        host,
        DeploymentEnvironment::default(),
        None,
        Format::Text,
    )
}

fn cmd_info(out: &mut impl Write, host: &Introspector, format: Format) -> Result<()> {
    let info = host.build_info();
    match format {
        Format::Text => write_build_info(out, &info)?,
        Format::Json => write_json(out, &info)?,
    }
    Ok(())
}

fn cmd_version(out: &mut impl Write, host: &Introspector, at_least: &[String]) -> Result<()> {
    let minimums: Vec<String> = if at_least.is_empty() {
        DEFAULT_MINIMUMS.iter().map(|s| s.to_string()).collect()
    } else {
        at_least.to_vec()
    };
    write_version_checks(out, host, &minimums)?;
    Ok(())
}

fn resolve_policy(
    environment: DeploymentEnvironment,
    policy_path: Option<&Path>,
) -> Result<ReleasePolicy> {
    match policy_path {
        Some(path) => {
            let policy = ReleasePolicy::from_path(path)
                .with_context(|| format!("Failed to load release policy {}", path.display()))?;
            info!(path = %path.display(), "loaded release policy");
            Ok(policy)
        }
        None => Ok(ReleasePolicy::for_environment(environment)),
    }
}

fn cmd_check(
    out: &mut impl Write,
    host: &Introspector,
    environment: DeploymentEnvironment,
    policy_path: Option<&Path>,
    format: Format,
) -> Result<()> {
    let policy = resolve_policy(environment, policy_path)?;
    let results = policy.condition_set(host).test_all();

    match format {
        Format::Text => write_results(out, environment, &results)?,
        Format::Json => write_json(out, &CheckReport::new(environment, &results))?,
    }
    out.flush()?;

    if results.all_passed() {
        Ok(())
    } else {
        anyhow::bail!("release conditions failed")
    }
}
