//! Profile store: named connection profiles persisted as one YAML document

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::errors::ClientError;
use crate::filesys::file::File;
use crate::logs::LogLevel;
use crate::output::OutputFormat;
use crate::storage::layout::StorageLayout;

/// Hosted Platform endpoint used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://app.coolify.io/api/v1";

/// Name of the profile that can never be deleted
pub const RESERVED_PROFILE: &str = "default";

const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// A named connection profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub api_token: String,
    pub base_url: String,
}

/// Settings shared by every profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    /// Tri-state: unset means "detect from the terminal"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_output: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
}

/// The on-disk profile store document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_profile: Option<String>,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    #[serde(default)]
    pub global_settings: GlobalSettings,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Reject names that are empty, contain whitespace or path-reserved characters
pub fn validate_name(name: &str) -> Result<(), ClientError> {
    if name.is_empty() {
        return Err(ClientError::InvalidArgument(
            "profile name must not be empty".into(),
        ));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ClientError::InvalidArgument(format!(
            "profile name {:?} must not contain whitespace",
            name
        )));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(ClientError::InvalidArgument(format!(
            "profile name {:?} must not contain {:?}",
            name, c
        )));
    }
    Ok(())
}

/// Check that a base URL is absolute with an http(s) scheme and a host
pub fn validate_base_url(base_url: &str) -> Result<(), ClientError> {
    let parsed = url::Url::parse(base_url).map_err(|e| {
        ClientError::InvalidArgument(format!("invalid base URL {:?}: {}", base_url, e))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return Err(ClientError::InvalidArgument(format!(
            "base URL {:?} must be an absolute http(s) URL",
            base_url
        )));
    }
    Ok(())
}

impl ProfileDocument {
    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Add a new profile; the first profile becomes the default
    pub fn create_profile(
        &mut self,
        name: &str,
        api_token: &str,
        base_url: Option<&str>,
    ) -> Result<&Profile, ClientError> {
        validate_name(name)?;
        if self.profiles.contains_key(name) {
            return Err(ClientError::AlreadyExists(format!(
                "profile {:?} already exists",
                name
            )));
        }
        let base_url = base_url
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        validate_base_url(&base_url)?;

        let is_first = self.profiles.is_empty();
        self.profiles.insert(
            name.to_string(),
            Profile {
                name: name.to_string(),
                api_token: api_token.to_string(),
                base_url,
            },
        );
        if is_first || self.default_profile.is_none() {
            self.default_profile = Some(name.to_string());
        }
        Ok(&self.profiles[name])
    }

    /// Replace token and/or URL of an existing profile
    pub fn update_profile(
        &mut self,
        name: &str,
        api_token: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<&Profile, ClientError> {
        if let Some(url) = base_url {
            validate_base_url(url)?;
        }
        let profile = self
            .profiles
            .get_mut(name)
            .ok_or_else(|| ClientError::NotFound(format!("profile {:?} not found", name)))?;
        if let Some(token) = api_token {
            profile.api_token = token.to_string();
        }
        if let Some(url) = base_url {
            profile.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(profile)
    }

    /// Remove a profile and promote a new default if needed.
    ///
    /// Promotion order: a profile literally named `default`, then any
    /// remaining profile, otherwise the pointer is cleared.
    pub fn delete_profile(&mut self, name: &str) -> Result<(), ClientError> {
        if name == RESERVED_PROFILE {
            return Err(ClientError::InvalidArgument(
                "the \"default\" profile cannot be deleted".into(),
            ));
        }
        if self.profiles.remove(name).is_none() {
            return Err(ClientError::NotFound(format!("profile {:?} not found", name)));
        }

        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = if self.profiles.contains_key(RESERVED_PROFILE) {
                Some(RESERVED_PROFILE.to_string())
            } else {
                self.profiles.keys().next().cloned()
            };
            debug!(
                deleted = name,
                promoted = ?self.default_profile,
                "default profile reassigned"
            );
        }
        Ok(())
    }

    /// All profiles sorted by name, plus the default pointer
    pub fn list_profiles(&self) -> (Vec<&Profile>, Option<&str>) {
        (
            self.profiles.values().collect(),
            self.default_profile.as_deref(),
        )
    }

    /// Point the default at an existing profile
    pub fn set_default_profile(&mut self, name: &str) -> Result<(), ClientError> {
        if !self.profiles.contains_key(name) {
            return Err(ClientError::NotFound(format!("profile {:?} not found", name)));
        }
        self.default_profile = Some(name.to_string());
        Ok(())
    }
}

/// Persists the profile document to a single YAML file
#[derive(Debug, Clone)]
pub struct ProfileStore {
    file: File,
}

impl ProfileStore {
    /// Store backed by an explicit file
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Store at `${HOME}/.config/coolifyme/config.yaml`
    pub fn at_default_location() -> Result<Self, ClientError> {
        Ok(Self::new(StorageLayout::from_home()?.config_file()))
    }

    /// Backing file
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Read the document; `NotFound` if the file does not exist yet
    pub async fn load(&self) -> Result<ProfileDocument, ClientError> {
        if !self.file.exists().await {
            return Err(ClientError::NotFound(format!(
                "config file {} does not exist",
                self.file.path().display()
            )));
        }
        self.file.read_yaml().await.map_err(|e| match e {
            ClientError::Yaml(err) => ClientError::Config(format!(
                "failed to parse {}: {}",
                self.file.path().display(),
                err
            )),
            other => other,
        })
    }

    /// Read the document, or an empty one if none has been written
    pub async fn load_or_default(&self) -> Result<ProfileDocument, ClientError> {
        match self.load().await {
            Ok(doc) => Ok(doc),
            Err(ClientError::NotFound(_)) => Ok(ProfileDocument::default()),
            Err(e) => Err(e),
        }
    }

    /// Atomically rewrite the document
    pub async fn save(&self, doc: &ProfileDocument) -> Result<(), ClientError> {
        debug!(path = %self.file.path().display(), "writing profile store");
        self.file.write_yaml(doc).await.map_err(|e| match e {
            ClientError::Io(err) => ClientError::Config(format!(
                "failed to write {}: {}",
                self.file.path().display(),
                err
            )),
            other => other,
        })
    }

    /// Load, apply `change`, and save when it succeeds
    pub async fn update<T, F>(&self, change: F) -> Result<T, ClientError>
    where
        F: FnOnce(&mut ProfileDocument) -> Result<T, ClientError>,
    {
        let mut doc = self.load_or_default().await?;
        let value = change(&mut doc)?;
        self.save(&doc).await?;
        Ok(value)
    }

    pub async fn create_profile(
        &self,
        name: &str,
        api_token: &str,
        base_url: Option<&str>,
    ) -> Result<Profile, ClientError> {
        self.update(|doc| doc.create_profile(name, api_token, base_url).cloned())
            .await
    }

    pub async fn delete_profile(&self, name: &str) -> Result<(), ClientError> {
        self.update(|doc| doc.delete_profile(name)).await
    }

    pub async fn set_default_profile(&self, name: &str) -> Result<(), ClientError> {
        self.update(|doc| doc.set_default_profile(name)).await
    }

    pub async fn list_profiles(&self) -> Result<(Vec<Profile>, Option<String>), ClientError> {
        let doc = self.load_or_default().await?;
        let (profiles, default) = doc.list_profiles();
        Ok((
            profiles.into_iter().cloned().collect(),
            default.map(str::to_string),
        ))
    }
}
