//! Build and runtime metadata snapshot.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::environment::HostEnvironment;

/// Optimization profile the crate was compiled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    Debug,
    Release,
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => f.write_str("debug"),
            Self::Release => f.write_str("release"),
        }
    }
}

/// Immutable snapshot of build and host facts.
///
/// Every field falls back to empty/zero when the underlying metadata is
/// unavailable; building one never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub runtime_version: String,
    pub compiler: String,
    pub channel: String,
    /// `"<os>/<arch>"`.
    pub platform: String,
    pub os: String,
    pub arch: String,
    pub cpu_count: usize,
    pub profile: BuildProfile,
    pub vcs_revision: String,
    pub vcs_modified: bool,
    pub vcs_time: String,
}

impl BuildInfo {
    pub fn from_environment(env: &dyn HostEnvironment) -> Self {
        let vcs = env.vcs();
        Self {
            runtime_version: env.runtime_version().to_string(),
            compiler: env.compiler().to_string(),
            channel: env.channel().to_string(),
            platform: format!("{}/{}", env.os(), env.arch()),
            os: env.os().to_string(),
            arch: env.arch().to_string(),
            cpu_count: env.cpu_count(),
            profile: if env.debug_build() {
                BuildProfile::Debug
            } else {
                BuildProfile::Release
            },
            vcs_revision: vcs.revision.clone(),
            vcs_modified: vcs.modified,
            vcs_time: vcs.time.clone(),
        }
    }

    pub fn has_vcs_info(&self) -> bool {
        !self.vcs_revision.is_empty()
    }

    pub fn is_debug(&self) -> bool {
        self.profile == BuildProfile::Debug
    }

    /// Commit timestamp as UTC, if present and RFC 3339.
    pub fn commit_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.vcs_time)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// First seven characters of the revision, or the whole thing if shorter.
    pub fn short_revision(&self) -> &str {
        self.vcs_revision
            .get(..7)
            .unwrap_or(self.vcs_revision.as_str())
    }
}
