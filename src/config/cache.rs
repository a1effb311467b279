//! Local credential cache.
//!
//! A single JSON file holding `{username, image, token}`. It is read once at
//! startup, rewritten after login, sign-up and profile edits, and removed on
//! logout or when the server rejects the token.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::credentials::Credentials;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to access credential cache '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential cache '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct CredentialCache {
    path: PathBuf,
}

impl CredentialCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached credentials.
    ///
    /// A missing file yields empty credentials. A corrupt one is an error so
    /// the caller can decide whether to discard it.
    pub fn load(&self) -> Result<Credentials, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Credentials::default()),
            Err(e) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let credentials: Credentials =
            serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(credentials.persisted().normalized())
    }

    /// Persist `credentials`, dropping the fields that are never cached.
    pub fn save(&self, credentials: &Credentials) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string(&credentials.persisted()).map_err(|e| {
            CacheError::Corrupt {
                path: self.path.clone(),
                source: e,
            }
        })?;

        // Write-then-rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), "Credential cache written");
        Ok(())
    }

    /// Remove the cache entry. Removing a missing file is not an error.
    pub fn clear(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Credential cache removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}
