//! Version, platform and provenance queries over a [`HostEnvironment`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::build_info::BuildInfo;
use crate::environment::{HostEnvironment, SystemEnvironment};
use crate::error::{Result, VersionSide};
use crate::version::{parse_major_minor, parse_normalized};

/// Answers questions about one host. Cheap to clone.
#[derive(Clone)]
pub struct Introspector {
    env: Arc<dyn HostEnvironment>,
}

impl fmt::Debug for Introspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Introspector")
            .field("runtime_version", &self.env.runtime_version())
            .field("os", &self.env.os())
            .field("arch", &self.env.arch())
            .finish_non_exhaustive()
    }
}

impl Introspector {
    pub fn new(env: impl HostEnvironment + 'static) -> Self {
        Self { env: Arc::new(env) }
    }

    /// Introspector over the real host, detected now.
    pub fn system() -> Self {
        Self::new(SystemEnvironment::detect())
    }

    pub fn environment(&self) -> &dyn HostEnvironment {
        self.env.as_ref()
    }

    pub fn build_info(&self) -> BuildInfo {
        BuildInfo::from_environment(self.env.as_ref())
    }

    pub fn has_vcs_info(&self) -> bool {
        self.env.vcs().is_available()
    }

    pub fn is_debug_build(&self) -> bool {
        self.env.debug_build()
    }

    pub fn cpu_count(&self) -> usize {
        self.env.cpu_count()
    }

    /// Compare the toolchain version against `target`.
    ///
    /// `Less` means the toolchain is older than `target`.
    pub fn compare_version(&self, target: &str) -> Result<Ordering> {
        let current = parse_normalized(self.env.runtime_version(), VersionSide::Current)?;
        let wanted = parse_normalized(target, VersionSide::Target)?;
        let ordering = current.cmp(&wanted);
        debug!(current = %current, target = %wanted, ?ordering, "compared toolchain version");
        Ok(ordering)
    }

    pub fn is_version_at_least(&self, min: &str) -> Result<bool> {
        Ok(self.compare_version(min)? != Ordering::Less)
    }

    pub fn major_minor(&self) -> Result<(u64, u64)> {
        parse_major_minor(self.env.runtime_version())
    }

    pub fn is_os(&self, os: &str) -> bool {
        self.env.os() == os
    }

    pub fn is_arch(&self, arch: &str) -> bool {
        self.env.arch() == arch
    }

    pub fn is_platform(&self, os: &str, arch: &str) -> bool {
        self.is_os(os) && self.is_arch(arch)
    }
}
