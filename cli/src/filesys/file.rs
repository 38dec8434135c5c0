//! File operations

use std::path::{Component, Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::ClientError;

/// Mode for files holding secrets or user configuration
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Mode for directories created for the config file
pub const PRIVATE_DIR_MODE: u32 = 0o700;

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Create a new file reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a file reference from a user-supplied path.
    ///
    /// The path is normalised and any `..` component is rejected.
    pub fn checked(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let mut cleaned = PathBuf::new();
        for component in path.components() {
            match component {
                Component::ParentDir => {
                    return Err(ClientError::InvalidArgument(format!(
                        "path traversal is not allowed: {}",
                        path.display()
                    )));
                }
                Component::CurDir => {}
                other => cleaned.push(other.as_os_str()),
            }
        }
        if cleaned.as_os_str().is_empty() {
            return Err(ClientError::InvalidArgument("empty file path".into()));
        }
        Ok(Self { path: cleaned })
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Read file contents as string
    pub async fn read_string(&self) -> Result<String, ClientError> {
        Ok(fs::read_to_string(&self.path).await?)
    }

    /// Read file as YAML
    pub async fn read_yaml<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let contents = self.read_string().await?;
        let value = serde_yaml::from_str(&contents)?;
        Ok(value)
    }

    /// Write YAML to file atomically
    pub async fn write_yaml<T: Serialize>(&self, value: &T) -> Result<(), ClientError> {
        let contents = serde_yaml::to_string(value)?;
        self.write_atomic(contents.as_bytes()).await
    }

    /// Create the parent directory with owner-only permissions
    pub async fn ensure_parent_dir(&self) -> Result<(), ClientError> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || fs::metadata(parent).await.is_ok() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(PRIVATE_DIR_MODE);
        builder.create(parent).await?;
        Ok(())
    }

    /// Replace the whole file using a temporary sibling and a rename.
    ///
    /// Readers observe either the previous or the new contents. The file ends
    /// up owner-read/write only on Unix.
    pub async fn write_atomic(&self, contents: &[u8]) -> Result<(), ClientError> {
        self.ensure_parent_dir().await?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4().simple()));

        let result = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(contents).await?;
            file.sync_all().await?;
            drop(file);
            set_mode(&temp_path, PRIVATE_FILE_MODE).await?;
            fs::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Copy this file to `target`, returning the target reference
    pub async fn copy_to(&self, target: impl Into<PathBuf>) -> Result<File, ClientError> {
        let target = File::new(target);
        fs::copy(&self.path, target.path()).await?;
        set_mode(target.path(), PRIVATE_FILE_MODE).await?;
        Ok(target)
    }
}

async fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    }
    #[cfg(not(unix))]
    let _ = (path, mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_rejects_parent_components() {
        assert!(File::checked("../secrets/.env").is_err());
        assert!(File::checked("app/../../.env").is_err());
        assert!(File::checked("").is_err());

        let file = File::checked("./config/.env").unwrap();
        assert_eq!(file.path(), Path::new("config/.env"));
    }

    #[tokio::test]
    async fn test_write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::new(dir.path().join("nested").join("out.txt"));

        file.write_atomic(b"first").await.unwrap();
        file.write_atomic(b"second").await.unwrap();

        assert_eq!(file.read_string().await.unwrap(), "second");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_write_atomic_sets_private_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = File::new(dir.path().join("secret.yaml"));
        file.write_atomic(b"token: x").await.unwrap();

        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, PRIVATE_FILE_MODE);
    }
}
