//! Storage layout configuration

use std::path::PathBuf;

use crate::errors::ClientError;
use crate::filesys::file::File;

/// Directory name under the user's config directory
pub const APP_DIR_NAME: &str = "coolifyme";

/// Config file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Storage layout for the CLI
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all storage
    pub base_dir: PathBuf,
}

impl StorageLayout {
    /// Create a new storage layout
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Resolve the default layout at `${HOME}/.config/coolifyme`
    pub fn from_home() -> Result<Self, ClientError> {
        let home = dirs::home_dir()
            .ok_or_else(|| ClientError::Config("unable to determine home directory".into()))?;
        Ok(Self::new(home.join(".config").join(APP_DIR_NAME)))
    }

    /// Get the config file
    pub fn config_file(&self) -> File {
        File::new(self.base_dir.join(CONFIG_FILE_NAME))
    }
}
