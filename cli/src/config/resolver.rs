//! Effective configuration resolution.
//!
//! Resolution is a pure merge per field, highest priority first:
//!
//! 1. invocation-time overrides (CLI flags)
//! 2. environment variables
//! 3. the selected profile and global settings from the profile store
//! 4. built-in defaults

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::errors::ClientError;
use crate::logs::LogLevel;
use crate::output::OutputFormat;
use crate::storage::profiles::{ProfileDocument, DEFAULT_BASE_URL, RESERVED_PROFILE};

/// Environment variables carrying the API token, in priority order
pub const TOKEN_ENV_VARS: &[&str] = &["COOLIFYME_API_TOKEN", "COOLIFY_API_TOKEN"];

/// Environment variables carrying the base URL, in priority order
pub const BASE_URL_ENV_VARS: &[&str] = &["COOLIFYME_BASE_URL", "COOLIFY_BASE_URL", "COOLIFY_URL"];

/// Environment variables selecting the profile, in priority order
pub const PROFILE_ENV_VARS: &[&str] = &["COOLIFYME_PROFILE", "COOLIFY_PROFILE"];

/// Environment variables carrying the log level, in priority order
pub const LOG_LEVEL_ENV_VARS: &[&str] = &["COOLIFYME_LOG_LEVEL", "COOLIFY_LOG_LEVEL"];

/// Snapshot of the environment variables relevant to resolution
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    values: HashMap<String, String>,
}

impl EnvVars {
    /// Capture the recognised variables from the current process
    pub fn from_process() -> Self {
        let names = TOKEN_ENV_VARS
            .iter()
            .chain(BASE_URL_ENV_VARS)
            .chain(PROFILE_ENV_VARS)
            .chain(LOG_LEVEL_ENV_VARS);
        Self::from_pairs(
            names.filter_map(|name| std::env::var(name).ok().map(|v| (name.to_string(), v))),
        )
    }

    /// Build a snapshot from explicit pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First non-empty value among `names`
    pub fn first(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.values.get(*name))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }
}

/// Invocation-time overrides
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub log_level: Option<LogLevel>,
    pub color: Option<bool>,
}

/// Per-invocation merged configuration
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub api_token: Option<SecretString>,
    pub base_url: String,
    pub profile_name: String,
    pub output_format: OutputFormat,
    pub log_level: LogLevel,
    /// Tri-state: `None` means detect from the terminal
    pub color: Option<bool>,
}

impl EffectiveConfig {
    /// The API token, or a configuration error if none was resolved
    pub fn require_token(&self) -> Result<&SecretString, ClientError> {
        self.api_token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "no API token configured for profile {:?}; set {} or create a profile",
                    self.profile_name, TOKEN_ENV_VARS[1]
                ))
            })
    }
}

/// Merge overrides, environment, profile store and defaults
pub fn resolve(
    doc: Option<&ProfileDocument>,
    env: &EnvVars,
    overrides: &Overrides,
) -> Result<EffectiveConfig, ClientError> {
    let explicit_profile = non_empty(overrides.profile.as_deref())
        .or_else(|| env.first(PROFILE_ENV_VARS));
    let profile_name = explicit_profile
        .or_else(|| doc.and_then(|d| d.default_profile.as_deref()))
        .unwrap_or(RESERVED_PROFILE)
        .to_string();

    let profile = doc.and_then(|d| d.profile(&profile_name));
    if profile.is_none() && explicit_profile.is_some() {
        warn!(profile = %profile_name, "profile not found in config file");
    }
    let settings = doc.map(|d| d.global_settings.clone()).unwrap_or_default();

    let api_token = non_empty(overrides.api_token.as_deref())
        .or_else(|| env.first(TOKEN_ENV_VARS))
        .or_else(|| profile.map(|p| p.api_token.as_str()).filter(|t| !t.is_empty()))
        .map(|t| SecretString::from(t.to_string()));

    let base_url = non_empty(overrides.base_url.as_deref())
        .or_else(|| env.first(BASE_URL_ENV_VARS))
        .or_else(|| profile.map(|p| p.base_url.as_str()).filter(|u| !u.is_empty()))
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string();

    let env_log_level = env
        .first(LOG_LEVEL_ENV_VARS)
        .map(|v| v.parse::<LogLevel>().map_err(ClientError::Config))
        .transpose()?;
    let log_level = overrides
        .log_level
        .or(env_log_level)
        .or(settings.log_level)
        .unwrap_or_default();

    let output_format = overrides
        .output_format
        .or(settings.output_format)
        .unwrap_or_default();

    let color = overrides.color.or(settings.color_output);

    Ok(EffectiveConfig {
        api_token,
        base_url,
        profile_name,
        output_format,
        log_level,
        color,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
