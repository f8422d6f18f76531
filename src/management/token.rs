use std::{io::ErrorKind, path::PathBuf};

use crate::{error::StoreError, types::TokenRecord};

/// The token file holding the current [`TokenRecord`].
///
/// Every write replaces the whole file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        TokenStore { path }
    }

    /// Reads the token record from the file.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when the file does not exist yet
    /// - [`StoreError::Io`] when it cannot be read
    /// - [`StoreError::Serde`] when it is not a valid token record
    pub async fn load(&self) -> Result<TokenRecord, StoreError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    path: self.path.display().to_string(),
                });
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(serde_json::from_str(&content)?)
    }

    /// Writes `record` as pretty JSON, creating the parent directory when
    /// needed.
    pub async fn persist(&self, record: &TokenRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(record)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
