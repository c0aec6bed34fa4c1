//! relcheck core library
//!
//! Build/runtime introspection and release-readiness conditions.
//!
//! The free functions at the crate root answer questions about the running
//! process, backed by a [`SystemEnvironment`] detected on first use. For
//! deterministic tests or hypothetical targets, build an [`Introspector`]
//! over a [`FixedEnvironment`] instead.
//!
//! ```no_run
//! use relcheck_core::ConditionSet;
//!
//! let mut checks = ConditionSet::new();
//! checks.add("rust-version", "Rust >= 1.70", || relcheck_core::is_version_at_least("1.70"));
//! checks.add("linux", "Running on Linux", || relcheck_core::is_os("linux"));
//!
//! let results = checks.test_all();
//! if !results.all_passed() {
//!     std::process::exit(1);
//! }
//! ```

pub mod build_info;
pub mod condition;
pub mod environment;
pub mod error;
pub mod introspect;
pub mod policy;
pub mod telemetry;
pub mod version;

use std::cmp::Ordering;
use std::sync::OnceLock;

pub use build_info::{BuildInfo, BuildProfile};
pub use condition::{Check, CheckOutcome, Condition, ConditionSet, TestResult, TestResults};
pub use environment::{FixedEnvironment, HostEnvironment, SystemEnvironment, VcsInfo};
pub use error::{ReleaseError, Result, VersionSide};
pub use introspect::Introspector;
pub use policy::{DeploymentEnvironment, ReleasePolicy};
pub use telemetry::init_tracing;
pub use version::{compare_versions, normalize_version, parse_major_minor, Version};

/// relcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process-wide introspector over the real host.
pub fn system() -> &'static Introspector {
    static SYSTEM: OnceLock<Introspector> = OnceLock::new();
    SYSTEM.get_or_init(Introspector::system)
}

pub fn build_info() -> BuildInfo {
    system().build_info()
}

/// Compare the toolchain version this binary was built with against `target`.
pub fn compare_version(target: &str) -> Result<Ordering> {
    system().compare_version(target)
}

pub fn is_version_at_least(min: &str) -> Result<bool> {
    system().is_version_at_least(min)
}

pub fn major_minor() -> Result<(u64, u64)> {
    system().major_minor()
}

pub fn is_platform(os: &str, arch: &str) -> bool {
    system().is_platform(os, arch)
}

pub fn is_os(os: &str) -> bool {
    system().is_os(os)
}

pub fn is_arch(arch: &str) -> bool {
    system().is_arch(arch)
}

pub fn has_vcs_info() -> bool {
    system().has_vcs_info()
}

pub fn is_debug_build() -> bool {
    system().is_debug_build()
}
