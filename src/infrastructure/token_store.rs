// Session token persistence - bearer token kept in a local file

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Client-local store for the session token, one token per fixed path.
/// Absence of the token sends the user back through the login flow.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Stored token, if any. Unreadable or empty files count as absent.
    pub fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() { None } else { Some(token.to_string()) }
            }
            Err(_) => None,
        }
    }

    pub fn store(&self, token: &str) -> Result<()> {
        std::fs::write(&self.path, token)
            .with_context(|| format!("failed to persist session token to {}", self.path.display()))
    }

    /// Drop the stored token, e.g. after a 401.
    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to clear session token: {}", e);
            }
        }
    }
}
