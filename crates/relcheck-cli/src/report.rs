//! Human- and machine-readable report rendering.

use std::io::{self, Write};

use relcheck_core::{BuildInfo, DeploymentEnvironment, Introspector, TestResults};
use serde::Serialize;

/// Toolchain floors shown by `relcheck version` when none are given.
pub const DEFAULT_MINIMUMS: [&str; 4] = ["1.56", "1.70", "1.80", "1.90"];

/// OS/arch pairs shown by `relcheck platform`.
pub const KNOWN_PLATFORMS: [(&str, &str); 5] = [
    ("linux", "x86_64"),
    ("linux", "aarch64"),
    ("macos", "x86_64"),
    ("macos", "aarch64"),
    ("windows", "x86_64"),
];

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

pub fn write_build_info(out: &mut impl Write, info: &BuildInfo) -> io::Result<()> {
    writeln!(out, "Build Information:")?;
    writeln!(out, "  Rust Version: {}", or_unknown(&info.runtime_version))?;
    writeln!(out, "  Channel:      {}", or_unknown(&info.channel))?;
    writeln!(out, "  Compiler:     {}", info.compiler)?;
    writeln!(out, "  Profile:      {}", info.profile)?;
    writeln!(out, "  Platform:     {}", info.platform)?;
    writeln!(out, "  OS:           {}", info.os)?;
    writeln!(out, "  Arch:         {}", info.arch)?;
    writeln!(out, "  CPUs:         {}", info.cpu_count)?;

    if info.has_vcs_info() {
        writeln!(out, "  VCS Commit:   {}", info.vcs_revision)?;
        writeln!(out, "  VCS Modified: {}", info.vcs_modified)?;
        writeln!(out, "  VCS Time:     {}", or_unknown(&info.vcs_time))?;
    } else {
        writeln!(out, "  VCS Info:     not available")?;
    }
    Ok(())
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "unknown"
    } else {
        value
    }
}

pub fn write_version_checks(
    out: &mut impl Write,
    host: &Introspector,
    minimums: &[String],
) -> io::Result<()> {
    writeln!(out, "Version Checks:")?;

    match host.major_minor() {
        Ok((major, minor)) => writeln!(out, "  Current Rust: {major}.{minor}")?,
        Err(err) => {
            writeln!(out, "  Error getting version: {err}")?;
            return Ok(());
        }
    }

    for min in minimums {
        match host.is_version_at_least(min) {
            Ok(ok) => writeln!(out, "  {} Rust >= {min}", mark(ok))?,
            Err(err) => writeln!(out, "  Error checking version {min}: {err}")?,
        }
    }
    Ok(())
}

pub fn write_platform_checks(out: &mut impl Write, host: &Introspector) -> io::Result<()> {
    writeln!(out, "Platform Checks:")?;
    for (os, arch) in KNOWN_PLATFORMS {
        writeln!(out, "  {} {os}/{arch}", mark(host.is_platform(os, arch)))?;
    }
    Ok(())
}

pub fn write_results(
    out: &mut impl Write,
    environment: DeploymentEnvironment,
    results: &TestResults,
) -> io::Result<()> {
    writeln!(out, "Release Readiness Checks ({environment}):")?;
    for result in results {
        writeln!(
            out,
            "  {} {}: {}",
            mark(result.passed),
            result.name,
            result.description
        )?;
        if let Some(err) = &result.error {
            writeln!(out, "     Error: {err:#}")?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Summary: {}/{} conditions passed",
        results.passed_count(),
        results.len()
    )?;
    if results.all_passed() {
        writeln!(out, "All conditions passed - ready for release")
    } else {
        writeln!(out, "Some conditions failed - not ready for release")
    }
}

/// JSON shape of `relcheck check --format json`.
#[derive(Serialize)]
pub struct CheckReport<'a> {
    pub environment: DeploymentEnvironment,
    pub all_passed: bool,
    pub passed: usize,
    pub total: usize,
    pub results: &'a TestResults,
}

impl<'a> CheckReport<'a> {
    pub fn new(environment: DeploymentEnvironment, results: &'a TestResults) -> Self {
        Self {
            environment,
            all_passed: results.all_passed(),
            passed: results.passed_count(),
            total: results.len(),
            results,
        }
    }
}

pub fn write_json(out: &mut impl Write, value: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
