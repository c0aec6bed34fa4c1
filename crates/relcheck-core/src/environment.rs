//! Host facts behind an injectable seam.
//!
//! [`HostEnvironment`] is the single source of OS, architecture, CPU count,
//! toolchain and VCS facts. [`SystemEnvironment`] reads the real host once,
//! at construction; [`FixedEnvironment`] is an in-memory stand-in for tests
//! and for evaluating conditions against a hypothetical target.

use serde::{Deserialize, Serialize};

/// Placeholder vergen writes when it cannot (or is told not to) probe a value.
const VERGEN_PLACEHOLDER: &str = "VERGEN_IDEMPOTENT_OUTPUT";

/// Compiler name reported for every build of this crate.
pub const COMPILER: &str = "rustc";

/// VCS settings embedded in the build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsInfo {
    /// Commit SHA; empty when the build had no VCS information.
    pub revision: String,
    /// Whether the working tree had uncommitted changes.
    pub modified: bool,
    /// RFC 3339 commit timestamp; empty when unknown.
    pub time: String,
}

impl VcsInfo {
    /// A clean checkout at `revision`.
    pub fn at_revision(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
            ..Self::default()
        }
    }

    /// True iff a non-empty revision is present.
    pub fn is_available(&self) -> bool {
        !self.revision.is_empty()
    }
}

/// Read-only access to the facts relcheck reports and gates on.
pub trait HostEnvironment: Send + Sync {
    /// Toolchain semantic version, e.g. `1.82.0`. Empty when unknown.
    fn runtime_version(&self) -> &str;

    /// Compiler name.
    fn compiler(&self) -> &str;

    /// Toolchain release channel (`stable`, `beta`, `nightly`). Empty when unknown.
    fn channel(&self) -> &str;

    /// Operating system identifier, `std::env::consts::OS` style.
    fn os(&self) -> &str;

    /// CPU architecture identifier, `std::env::consts::ARCH` style.
    fn arch(&self) -> &str;

    /// Number of logical CPUs.
    fn cpu_count(&self) -> usize;

    /// Embedded VCS provenance.
    fn vcs(&self) -> &VcsInfo;

    /// Whether the build has debug assertions enabled.
    fn debug_build(&self) -> bool;
}

// ---------------------------------------------------------------------------
// SystemEnvironment
// ---------------------------------------------------------------------------

/// The running host, as seen by this build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEnvironment {
    runtime_version: String,
    channel: String,
    os: String,
    arch: String,
    cpu_count: usize,
    vcs: VcsInfo,
    debug_build: bool,
}

impl SystemEnvironment {
    /// Capture host facts now. Never fails; missing build metadata is empty.
    pub fn detect() -> Self {
        let env = Self {
            runtime_version: embedded(option_env!("VERGEN_RUSTC_SEMVER")),
            channel: embedded(option_env!("VERGEN_RUSTC_CHANNEL")),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_count: num_cpus::get(),
            vcs: VcsInfo {
                revision: embedded(option_env!("VERGEN_GIT_SHA")),
                modified: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
                time: embedded(option_env!("VERGEN_GIT_COMMIT_TIMESTAMP")),
            },
            debug_build: cfg!(debug_assertions),
        };
        tracing::debug!(
            os = %env.os,
            arch = %env.arch,
            cpus = env.cpu_count,
            rustc = %env.runtime_version,
            has_vcs = env.vcs.is_available(),
            "detected host environment"
        );
        env
    }
}

fn embedded(value: Option<&'static str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != VERGEN_PLACEHOLDER)
        .unwrap_or_default()
        .to_string()
}

impl HostEnvironment for SystemEnvironment {
    fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    fn compiler(&self) -> &str {
        COMPILER
    }

    fn channel(&self) -> &str {
        &self.channel
    }

    fn os(&self) -> &str {
        &self.os
    }

    fn arch(&self) -> &str {
        &self.arch
    }

    fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    fn vcs(&self) -> &VcsInfo {
        &self.vcs
    }

    fn debug_build(&self) -> bool {
        self.debug_build
    }
}

// ---------------------------------------------------------------------------
// FixedEnvironment
// ---------------------------------------------------------------------------

/// In-memory host with caller-chosen facts.
///
/// Defaults describe a stable `1.80.0` toolchain on `linux/x86_64` with four
/// CPUs, a release build and no VCS information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedEnvironment {
    runtime_version: String,
    compiler: String,
    channel: String,
    os: String,
    arch: String,
    cpu_count: usize,
    vcs: VcsInfo,
    debug_build: bool,
}

impl Default for FixedEnvironment {
    fn default() -> Self {
        Self {
            runtime_version: "1.80.0".to_string(),
            compiler: COMPILER.to_string(),
            channel: "stable".to_string(),
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
            cpu_count: 4,
            vcs: VcsInfo::default(),
            debug_build: false,
        }
    }
}

impl FixedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = version.into();
        self
    }

    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_platform(mut self, os: impl Into<String>, arch: impl Into<String>) -> Self {
        self.os = os.into();
        self.arch = arch.into();
        self
    }

    pub fn with_cpu_count(mut self, cpu_count: usize) -> Self {
        self.cpu_count = cpu_count;
        self
    }

    pub fn with_vcs(mut self, vcs: VcsInfo) -> Self {
        self.vcs = vcs;
        self
    }

    pub fn with_debug_build(mut self, debug_build: bool) -> Self {
        self.debug_build = debug_build;
        self
    }
}

impl HostEnvironment for FixedEnvironment {
    fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    fn compiler(&self) -> &str {
        &self.compiler
    }

    fn channel(&self) -> &str {
        &self.channel
    }

    fn os(&self) -> &str {
        &self.os
    }

    fn arch(&self) -> &str {
        &self.arch
    }

    fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    fn vcs(&self) -> &VcsInfo {
        &self.vcs
    }

    fn debug_build(&self) -> bool {
        self.debug_build
    }
}
