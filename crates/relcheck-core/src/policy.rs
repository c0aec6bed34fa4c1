//! Release policies: declarative presets that expand into a [`ConditionSet`].
//!
//! A [`ReleasePolicy`] names the minimum toolchain, supported platforms, CPU
//! floor and provenance requirements for a release. Policies can be built in
//! code ([`ReleasePolicy::standard`], [`ReleasePolicy::for_environment`]) or
//! loaded from JSON, where omitted fields keep their standard values.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::condition::{CheckOutcome, ConditionSet};
use crate::error::{ReleaseError, Result};
use crate::introspect::Introspector;

// ---------------------------------------------------------------------------
// Deployment environment
// ---------------------------------------------------------------------------

/// Where a build is headed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnvironment {
    #[default]
    Development,
    Staging,
    Production,
    Test,
}

impl DeploymentEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for DeploymentEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentEnvironment {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ReleaseError::UnknownEnvironment(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Release requirements. Empty lists and a zero CPU floor disable the
/// corresponding condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleasePolicy {
    pub min_rust_version: Option<String>,
    pub supported_os: Vec<String>,
    pub supported_arch: Vec<String>,
    pub min_cpus: usize,
    pub require_vcs: bool,
    pub require_clean_tree: bool,
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReleasePolicy {
    /// Toolchain >= 1.70, linux/macos/windows, x86_64/aarch64, at least 2 CPUs.
    pub fn standard() -> Self {
        Self {
            min_rust_version: Some("1.70".to_string()),
            supported_os: vec![
                "linux".to_string(),
                "macos".to_string(),
                "windows".to_string(),
            ],
            supported_arch: vec!["x86_64".to_string(), "aarch64".to_string()],
            min_cpus: 2,
            require_vcs: false,
            require_clean_tree: false,
        }
    }

    /// Standard policy tightened for `env`: staging requires VCS provenance,
    /// production additionally requires a clean working tree.
    pub fn for_environment(env: DeploymentEnvironment) -> Self {
        let base = Self::standard();
        match env {
            DeploymentEnvironment::Development | DeploymentEnvironment::Test => base,
            DeploymentEnvironment::Staging => base.with_require_vcs(true),
            DeploymentEnvironment::Production => {
                base.with_require_vcs(true).with_require_clean_tree(true)
            }
        }
    }

    pub fn with_min_rust_version(mut self, version: impl Into<String>) -> Self {
        self.min_rust_version = Some(version.into());
        self
    }

    pub fn with_require_vcs(mut self, require: bool) -> Self {
        self.require_vcs = require;
        self
    }

    pub fn with_require_clean_tree(mut self, require: bool) -> Self {
        self.require_clean_tree = require;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Expand into conditions evaluated against `host`.
    ///
    /// Registered in a fixed order: `rust-version`, `supported-os`,
    /// `supported-arch`, `min-cpus`, `vcs-info`, `clean-tree`.
    pub fn condition_set(&self, host: &Introspector) -> ConditionSet {
        let mut set = ConditionSet::new();

        if let Some(min) = &self.min_rust_version {
            let host = host.clone();
            let min = min.clone();
            set.add(
                "rust-version",
                format!("Rust toolchain >= {min}"),
                move || host.is_version_at_least(&min),
            );
        }

        if !self.supported_os.is_empty() {
            let host = host.clone();
            let list = self.supported_os.clone();
            set.add(
                "supported-os",
                format!("Running on one of: {}", list.join(", ")),
                move || list.iter().any(|os| host.is_os(os)),
            );
        }

        if !self.supported_arch.is_empty() {
            let host = host.clone();
            let list = self.supported_arch.clone();
            set.add(
                "supported-arch",
                format!("Running on one of: {}", list.join(", ")),
                move || list.iter().any(|arch| host.is_arch(arch)),
            );
        }

        if self.min_cpus > 0 {
            let host = host.clone();
            let min = self.min_cpus;
            set.add(
                "min-cpus",
                format!("At least {min} CPUs available"),
                move || host.cpu_count() >= min,
            );
        }

        if self.require_vcs {
            let host = host.clone();
            set.add("vcs-info", "Build embeds a VCS revision", move || {
                host.has_vcs_info()
            });
        }

        if self.require_clean_tree {
            let host = host.clone();
            set.add(
                "clean-tree",
                "Built from an unmodified working tree",
                move || {
                    if !host.has_vcs_info() {
                        return CheckOutcome::fail()
                            .with_error(anyhow::anyhow!("no VCS information embedded in build"));
                    }
                    CheckOutcome::from(!host.environment().vcs().modified)
                },
            );
        }

        set
    }
}
