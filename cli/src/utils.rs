//! Utility functions

use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// Version information for the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Check that a Platform resource identifier is well formed.
///
/// Identifiers are opaque short ids made of ASCII alphanumerics, `-` and `_`.
pub fn validate_uuid(uuid: &str) -> Result<(), ClientError> {
    if uuid.is_empty() {
        return Err(ClientError::InvalidArgument("uuid must not be empty".into()));
    }
    if !uuid
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ClientError::InvalidArgument(format!(
            "malformed uuid: {:?}",
            uuid
        )));
    }
    Ok(())
}

/// Mask a secret, keeping only its last four characters
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("og888os").is_ok());
        assert!(validate_uuid("a1b2-c3_d4").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("abc/def").is_err());
        assert!(validate_uuid("abc def").is_err());
        assert!(validate_uuid("../etc").is_err());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("1|abcdefgh"), "******efgh");
        assert_eq!(mask_secret("abc"), "***");
    }
}
