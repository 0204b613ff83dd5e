//! Persistence for the GitHub personal access token.
//!
//! A single process-wide slot behind a trait, so the CLI uses a file under
//! the user's config directory while tests and embedders inject an
//! in-memory store. The token is stored as plain text with no expiry
//! tracking; invalidation is the caller clearing the slot.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Single-slot credential store.
pub trait TokenStore {
    /// Read the stored token. `None` when nothing is stored.
    fn load(&self) -> Result<Option<String>>;

    /// Store a token, replacing any previous one.
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Succeeds when nothing was stored.
    fn clear(&self) -> Result<()>;
}

/// Token store backed by a plain-text file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store at the default location, honoring the `GHPUSH_TOKEN_FILE`
    /// override.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = std::env::var("GHPUSH_TOKEN_FILE") {
            return Ok(Self::new(PathBuf::from(path)));
        }
        Ok(Self::new(Self::default_path()?))
    }

    /// Default token file path.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".config/ghpush/token"))
            .context("Could not determine home directory for token file")
    }

}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file {:?}", self.path))?;
        let token = content.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        fs::write(&self.path, token)
            .with_context(|| format!("Failed to write token file {:?}", self.path))?;
        tracing::debug!("Saved token to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove token file {:?}", self.path))?;
        }
        Ok(())
    }
}

/// In-memory token store for tests and embedding.
#[derive(Default)]
#[allow(dead_code)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn file_store_round_trips() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token"));

        assert!(store.load().unwrap().is_none());
        store.save("ghp_secret123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("ghp_secret123"));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/config/token"));
        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok"));
    }

    #[test]
    fn load_trims_whitespace_and_treats_blank_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "  ghp_abc\n").unwrap();
        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().unwrap().as_deref(), Some("ghp_abc"));

        fs::write(&path, "\n  \n").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_is_ok_when_nothing_stored() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token"));
        store.clear().unwrap();
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());
        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok"));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
