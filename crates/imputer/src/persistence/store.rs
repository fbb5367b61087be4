//! Blob stores addressed by slash-separated paths.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::{ImputerError, Result};

/// Key-value storage for artifact components.
///
/// Paths are relative, `/`-separated, and form a directory-like namespace:
/// a path "exists" if a blob is stored at it or under it.
pub trait BlobStore: Send + Sync {
    /// Whether a blob exists at `path` or below it.
    fn exists(&self, path: &str) -> Result<bool>;

    /// Read one blob. Missing blobs are [`ImputerError::NotFound`].
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Write one blob, replacing any previous content.
    fn write(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Remove `path` and everything below it. Missing paths are not an error.
    fn delete(&self, path: &str) -> Result<()>;

    /// Move `from` and everything below it to `to`, which must not exist.
    fn rename(&self, from: &str, to: &str) -> Result<()>;
}

/// Validate a store path and strip surrounding slashes.
pub(crate) fn normalize(path: &str) -> Result<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(ImputerError::Config("artifact path must not be empty".to_string()));
    }
    if let Some(bad) = trimmed
        .split('/')
        .find(|part| part.is_empty() || *part == "." || *part == "..")
    {
        return Err(ImputerError::Config(format!(
            "invalid artifact path '{}': segment '{}' is not allowed",
            path, bad
        )));
    }
    Ok(trimmed.to_string())
}

/// Join a base path and a component name.
pub(crate) fn join(base: &str, name: &str) -> String {
    format!("{}/{}", base, name)
}

/// Blob store backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let normalized = normalize(path)?;
        Ok(normalized
            .split('/')
            .fold(self.root.clone(), |acc, part| acc.join(part)))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ImputerError {
    ImputerError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
    }
    Ok(())
}

impl BlobStore for FsBlobStore {
    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.resolve(path)?.exists())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        match fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ImputerError::NotFound(full.display().to_string()))
            }
            Err(e) => Err(io_error(&full, e)),
        }
    }

    fn write(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let full = self.resolve(path)?;
        ensure_parent(&full)?;
        fs::write(&full, bytes).map_err(|e| io_error(&full, e))
    }

    fn delete(&self, path: &str) -> Result<()> {
        let full = self.resolve(path)?;
        let result = if full.is_dir() {
            fs::remove_dir_all(&full)
        } else {
            fs::remove_file(&full)
        };
        match result {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(io_error(&full, e)),
            _ => Ok(()),
        }
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        if !source.exists() {
            return Err(ImputerError::NotFound(source.display().to_string()));
        }
        if target.exists() {
            return Err(ImputerError::AlreadyExists(target.display().to_string()));
        }
        ensure_parent(&target)?;
        fs::rename(&source, &target).map_err(|e| io_error(&source, e))
    }
}

/// In-memory blob store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored paths in order.
    pub fn paths(&self) -> Vec<String> {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

fn is_under(key: &str, path: &str) -> bool {
    key == path
        || key
            .strip_prefix(path)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl BlobStore for MemoryBlobStore {
    fn exists(&self, path: &str) -> Result<bool> {
        let path = normalize(path)?;
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.keys().any(|k| is_under(k, &path)))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let path = normalize(path)?;
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        blobs
            .get(&path)
            .cloned()
            .ok_or(ImputerError::NotFound(path))
    }

    fn write(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let path = normalize(path)?;
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(path, bytes.to_vec());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let path = normalize(path)?;
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs.retain(|k, _| !is_under(k, &path));
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let from = normalize(from)?;
        let to = normalize(to)?;
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);

        if blobs.keys().any(|k| is_under(k, &to)) {
            return Err(ImputerError::AlreadyExists(to));
        }
        let moved: Vec<String> = blobs.keys().filter(|k| is_under(k, &from)).cloned().collect();
        if moved.is_empty() {
            return Err(ImputerError::NotFound(from));
        }
        for key in moved {
            if let Some(bytes) = blobs.remove(&key) {
                let renamed = format!("{}{}", to, &key[from.len()..]);
                blobs.insert(renamed, bytes);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(store: &dyn BlobStore) {
        assert!(!store.exists("models/a").unwrap());
        store.write("models/a/metadata", b"{}").unwrap();
        store.write("models/a/data", b"uid\nx\n").unwrap();
        assert!(store.exists("models/a").unwrap());
        assert!(store.exists("models").unwrap());
        assert!(!store.exists("models/ab").unwrap());
        assert_eq!(store.read("models/a/metadata").unwrap(), b"{}");

        store.rename("models/a", "models/b").unwrap();
        assert!(!store.exists("models/a").unwrap());
        assert_eq!(store.read("models/b/data").unwrap(), b"uid\nx\n");

        store.write("models/c/data", b"").unwrap();
        assert!(matches!(
            store.rename("models/b", "models/c"),
            Err(ImputerError::AlreadyExists(_))
        ));

        store.delete("models/b").unwrap();
        store.delete("models/missing").unwrap();
        assert!(matches!(
            store.read("models/b/data"),
            Err(ImputerError::NotFound(_))
        ));
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryBlobStore::new());
    }

    #[test]
    fn test_fs_store() {
        let dir = TempDir::new().unwrap();
        exercise(&FsBlobStore::new(dir.path()));
    }

    #[test]
    fn test_normalize_rejects_traversal() {
        assert_eq!(normalize("/a/b/").unwrap(), "a/b");
        assert!(normalize("").is_err());
        assert!(normalize("a/../b").is_err());
        assert!(normalize("a//b").is_err());
        assert!(normalize("./a").is_err());
    }
}
