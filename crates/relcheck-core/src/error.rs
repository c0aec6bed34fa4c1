//! Error taxonomy for relcheck.

use std::fmt;

/// Which side of a version comparison failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSide {
    /// The toolchain version the binary was built with.
    Current,
    /// The caller-supplied version being compared against.
    Target,
}

impl fmt::Display for VersionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("current"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// relcheck errors.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("invalid {side} version: {version}")]
    InvalidVersion { side: VersionSide, version: String },

    #[error("malformed version {version:?}: {reason}")]
    MalformedVersion { version: String, reason: String },

    #[error("unknown deployment environment: {0}")]
    UnknownEnvironment(String),

    #[error("invalid release policy: {0}")]
    Policy(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for relcheck operations.
pub type Result<T> = std::result::Result<T, ReleaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_version_display_names_side() {
        let err = ReleaseError::InvalidVersion {
            side: VersionSide::Target,
            version: "banana".to_string(),
        };
        assert_eq!(err.to_string(), "invalid target version: banana");

        let err = ReleaseError::InvalidVersion {
            side: VersionSide::Current,
            version: String::new(),
        };
        assert!(err.to_string().starts_with("invalid current version"));
    }

    #[test]
    fn test_malformed_version_display() {
        let err = ReleaseError::MalformedVersion {
            version: "1".to_string(),
            reason: "expected at least major.minor".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"1\""));
        assert!(msg.contains("major.minor"));
    }

    #[test]
    fn test_policy_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ReleaseError = serde_err.into();
        assert!(err.to_string().contains("invalid release policy"));
    }
}
