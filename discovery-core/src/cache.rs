//! Content-addressed cache of prior analysis results.
//!
//! Keys are fingerprints of everything that determines a result: the variant,
//! the guidelines document and the transcript text. Stores sit behind the
//! minimal `CacheStore` trait so deployments can swap the file-backed store
//! for something else without touching the analyzer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{DiscoveryError, Result};
use crate::models::InsightRecord;

/// Hex characters kept from the SHA-256 digest.
const KEY_LEN: usize = 16;

const CACHE_DIR_ENV: &str = "DISCOVERY_CACHE_DIR";

/// Deterministic fingerprint of `(variant_id, guideline_fingerprint, text)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    variant_id: String,
    digest: String,
}

impl CacheKey {
    /// Hashes `variant_id::guideline_fingerprint::text` with SHA-256 and keeps
    /// the first 16 hex characters.
    pub fn fingerprint(variant_id: &str, guideline_fingerprint: &str, text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(variant_id.as_bytes());
        hasher.update(b"::");
        hasher.update(guideline_fingerprint.as_bytes());
        hasher.update(b"::");
        hasher.update(text.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(KEY_LEN);
        Self {
            variant_id: variant_id.to_string(),
            digest,
        }
    }

    /// Variant the key was computed for; selects the cache slot.
    pub fn variant_id(&self) -> &str {
        &self.variant_id
    }

    /// The truncated hex digest stored in `CacheEntry::key`.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest)
    }
}

/// A persisted analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Digest of the key the entry was written under. A mismatch on read is a miss.
    pub key: String,
    /// Variant the insights were extracted from.
    pub variant_id: String,
    /// The validated extraction result.
    pub insights: InsightRecord,
    /// Write time, serialized as RFC 3339 UTC.
    pub cached_at: DateTime<Utc>,
}

/// Minimal key-value interface over cached results.
///
/// Errors from either method are `DiscoveryError::CacheIo`; callers treat them
/// as non-fatal.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the entry stored for `key`, or `None` when absent or stale.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>>;

    /// Stores `insights` under `key`, replacing any previous entry.
    async fn put(&self, key: &CacheKey, insights: &InsightRecord) -> Result<()>;
}

/// Stores one JSON file per variant: `{dir}/{variant}_cache.json`.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `DISCOVERY_CACHE_DIR`, else the platform cache directory, else the
    /// system temp directory.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(CACHE_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|d| d.join("discovery")))
            .unwrap_or_else(|| std::env::temp_dir().join("discovery_cache"));
        Self::new(dir)
    }

    /// Directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file for `variant_id`.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::CacheIo` when the id is empty or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn path_for(&self, variant_id: &str) -> Result<PathBuf> {
        let safe = !variant_id.is_empty()
            && variant_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(DiscoveryError::CacheIo(format!(
                "variant id '{}' is not usable as a cache file name",
                variant_id
            )));
        }
        Ok(self.dir.join(format!("{}_cache.json", variant_id)))
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let path = self.path_for(key.variant_id())?;
        let raw = match tokio::fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DiscoveryError::CacheIo(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let entry: CacheEntry = serde_json::from_slice(&raw).map_err(|e| {
            DiscoveryError::CacheIo(format!("failed to parse {}: {}", path.display(), e))
        })?;

        if entry.key != key.digest() {
            debug!(
                "Cache entry at {} has key {}, wanted {}; treating as miss.",
                path.display(),
                entry.key,
                key
            );
            return Ok(None);
        }
        Ok(Some(entry))
    }

    async fn put(&self, key: &CacheKey, insights: &InsightRecord) -> Result<()> {
        let path = self.path_for(key.variant_id())?;
        let entry = CacheEntry {
            key: key.digest().to_string(),
            variant_id: key.variant_id().to_string(),
            insights: insights.clone(),
            cached_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&entry)
            .map_err(|e| DiscoveryError::CacheIo(format!("failed to serialize entry: {}", e)))?;

        // Each writer gets its own temp file so concurrent puts to one key
        // never share a partially written file; the last rename wins.
        let dir = self.dir.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            std::fs::create_dir_all(&dir)?;
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&json)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| DiscoveryError::CacheIo(format!("cache write task failed: {}", e)))?
        .map_err(|e| {
            DiscoveryError::CacheIo(format!("failed to write {}: {}", path.display(), e))
        })?;

        debug!("Cached insights for variant '{}' under key {}.", key.variant_id(), key);
        Ok(())
    }
}
