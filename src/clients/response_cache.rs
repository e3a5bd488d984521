use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::clients::errors::{Error, Result};

// Characters that cannot appear in a path segment on at least one platform
const UNSAFE_NAME_CHARS: &[char] = &[':', '/', '\\', '*', '?', '"', '<', '>', '|'];

const HASH_LEN: usize = 16;

/// Identity of a remote read call: the entity it targets plus its arguments.
///
/// Keyword arguments live in a `BTreeMap`, so the order they were supplied in
/// never changes the key.
#[derive(Debug, Clone, PartialEq)]
pub struct CallKey {
    identity: String,
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
}

impl CallKey {
    pub fn new(identity: impl Into<String>) -> Self {
        CallKey {
            identity: identity.into(),
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    #[must_use]
    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// First 16 hex digits of the SHA-256 of the canonical `[args, kwargs]` JSON
    pub fn args_hash(&self) -> Result<String> {
        // serde_json objects are sorted maps, so nested values are canonical too
        let canonical = serde_json::to_string(&(&self.args, &self.kwargs))?;
        let digest = Sha256::digest(canonical.as_bytes());
        let mut hex = format!("{digest:x}");
        hex.truncate(HASH_LEN);
        Ok(hex)
    }

    pub fn file_name(&self) -> Result<String> {
        let identity: String = self
            .identity
            .chars()
            .map(|c| {
                if UNSAFE_NAME_CHARS.contains(&c) || c.is_whitespace() {
                    '_'
                } else {
                    c
                }
            })
            .collect();
        Ok(format!("{identity}-{}.json", self.args_hash()?))
    }
}

// Only names shaped like `CallKey::file_name` belong to the cache
fn is_entry_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".json") else {
        return false;
    };
    match stem.rsplit_once('-') {
        Some((identity, hash)) => {
            !identity.is_empty()
                && hash.len() == HASH_LEN
                && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        }
        None => false,
    }
}

/// Stores raw JSON responses on disk, one file per distinct call.
///
/// Entries never expire. A single process is assumed to own the directory.
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ResponseCache { dir: dir.into() }
    }

    pub fn try_default() -> Self {
        let dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join("sorted-playlists")
            .join("responses");
        ResponseCache::new(dir)
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &CallKey) -> Result<PathBuf> {
        Ok(self.dir.join(key.file_name()?))
    }

    /// Returns the stored response for `key`, or runs `call` and stores its result.
    ///
    /// Nothing is written unless `call` succeeds, and the write goes through a
    /// temporary file renamed into place.
    pub async fn cached<F, Fut>(&self, key: &CallKey, call: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let path = self.entry_path(key)?;
        if tokio::fs::try_exists(&path).await? {
            let contents = tokio::fs::read_to_string(&path).await?;
            debug!("Cache hit for {} in {path:?}", key.identity());
            return serde_json::from_str(&contents)
                .map_err(|source| Error::CacheCorrupt { path, source });
        }

        debug!("Cache miss for {}, calling remote", key.identity());
        let value = call().await?;
        self.store(&path, &value).await?;
        Ok(value)
    }

    async fn store(&self, path: &Path, value: &Value) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let mut tmp_path = path.as_os_str().to_owned();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        tokio::fs::write(&tmp_path, serde_json::to_vec(value)?).await?;
        tokio::fs::rename(&tmp_path, path).await?;
        debug!("Stored response in {path:?}");
        Ok(())
    }

    /// Removes every stored response and returns how many were deleted
    pub async fn clear(&self) -> Result<usize> {
        let entries = self.entries().await?;
        for entry in &entries {
            tokio::fs::remove_file(entry).await?;
        }
        debug!("Removed {} cached responses from {:?}", entries.len(), self.dir);
        Ok(entries.len())
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.entries().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    async fn entries(&self) -> Result<Vec<PathBuf>> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if entry.file_name().to_str().is_some_and(is_entry_name) {
                entries.push(entry.path());
            }
        }
        Ok(entries)
    }
}
