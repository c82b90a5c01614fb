//! Time-to-live caching with an in-memory LRU tier over JSON files on disk
//!
//! - L1: in-memory LRU cache for repeat reads within one process
//! - L2: one JSON file per key under the cache directory, so fetched
//!   platform payloads survive between CLI runs
//!
//! Every entry records when it was cached. A read older than the cache's TTL
//! is a miss and the stale entry is dropped from both tiers.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    hash::Hash,
    io::{Read, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tracing::{debug, warn};

use super::now_secs;
use crate::cli::types::{LeagueId, Platform, Season, Week};
use crate::error::{InsightsError, Result};

/// Base directory for everything this tool caches: `~/.cache/fantasy-insights`.
pub fn cache_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("fantasy-insights")
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Write a string to file
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

/// Key usable in both cache tiers.
pub trait CacheKey: Hash + Eq + Clone + Send + Sync {
    /// File-system safe name for the disk tier.
    fn to_file_key(&self) -> String;
}

/// Key for one platform read: which league, which week, which operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceCacheKey {
    pub platform: Platform,
    pub league_id: LeagueId,
    pub season: Season,
    pub week: Option<Week>,
    pub operation: &'static str,
}

impl CacheKey for SourceCacheKey {
    fn to_file_key(&self) -> String {
        let week_str = self
            .week
            .map(|w| format!("w{}", w.as_u16()))
            .unwrap_or_else(|| "season".to_string());

        let league: String = self
            .league_id
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        format!(
            "{}_{}_l{}_s{}_{}",
            self.platform.tag(),
            self.operation,
            league,
            self.season.as_u16(),
            week_str
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry<V> {
    cached_at: u64,
    value: V,
}

/// LRU memory cache backed by optional disk persistence, with expiry.
pub struct TtlCache<K, V>
where
    K: CacheKey,
    V: Clone + Serialize + for<'de> Deserialize<'de>,
{
    memory_cache: Arc<Mutex<LruCache<K, CacheEntry<V>>>>,
    memory_capacity: usize,
    ttl: Duration,
    disk_dir: Option<PathBuf>,
}

impl<K, V> TtlCache<K, V>
where
    K: CacheKey,
    V: Clone + Serialize + for<'de> Deserialize<'de>,
{
    /// Memory-only cache.
    pub fn in_memory(memory_capacity: usize, ttl: Duration) -> Result<Self> {
        Self::build(memory_capacity, ttl, None)
    }

    /// Cache persisting entries as JSON files under `disk_dir`.
    pub fn with_disk(memory_capacity: usize, ttl: Duration, disk_dir: PathBuf) -> Result<Self> {
        Self::build(memory_capacity, ttl, Some(disk_dir))
    }

    fn build(memory_capacity: usize, ttl: Duration, disk_dir: Option<PathBuf>) -> Result<Self> {
        let capacity = NonZeroUsize::new(memory_capacity).ok_or_else(|| InsightsError::Cache {
            message: "cache capacity must be greater than zero".to_string(),
        })?;
        Ok(Self {
            memory_cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            memory_capacity,
            ttl,
            disk_dir,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn memory(&self) -> MutexGuard<'_, LruCache<K, CacheEntry<V>>> {
        // A panic while holding the lock leaves the LRU itself consistent.
        self.memory_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: u64) -> bool {
        now.saturating_sub(entry.cached_at) < self.ttl.as_secs()
    }

    /// Get a fresh item (checks memory first, then disk).
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, now_secs())
    }

    /// [`get`](Self::get) against an explicit clock.
    pub fn get_at(&self, key: &K, now: u64) -> Option<V> {
        {
            let mut memory = self.memory();
            if let Some(entry) = memory.get(key) {
                if self.is_fresh(entry, now) {
                    return Some(entry.value.clone());
                }
                memory.pop(key);
                debug!(key = %key.to_file_key(), "memory cache entry expired");
            }
        }

        let entry = self.get_from_disk(key)?;
        if !self.is_fresh(&entry, now) {
            debug!(key = %key.to_file_key(), "disk cache entry expired");
            let _ = self.remove_from_disk(key);
            return None;
        }

        // Promote to memory cache
        let value = entry.value.clone();
        self.memory().put(key.clone(), entry);
        Some(value)
    }

    /// Put an item into cache (stores in both memory and disk).
    pub fn put(&self, key: K, value: V) {
        self.put_at(key, value, now_secs());
    }

    /// [`put`](Self::put) against an explicit clock.
    pub fn put_at(&self, key: K, value: V, now: u64) {
        let entry = CacheEntry {
            cached_at: now,
            value,
        };

        if let Err(e) = self.put_to_disk(&key, &entry) {
            warn!(key = %key.to_file_key(), error = %e, "failed to persist cache entry");
        }

        self.memory().put(key, entry);
    }

    /// Drop one key from both tiers.
    pub fn invalidate(&self, key: &K) -> std::io::Result<()> {
        self.memory().pop(key);
        self.remove_from_disk(key)
    }

    fn file_path(&self, key: &K) -> Option<PathBuf> {
        self.disk_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", key.to_file_key())))
    }

    fn get_from_disk(&self, key: &K) -> Option<CacheEntry<V>> {
        let path = self.file_path(key)?;
        let content = try_read_to_string(&path)?;
        serde_json::from_str(&content).ok()
    }

    fn put_to_disk(&self, key: &K, entry: &CacheEntry<V>) -> std::io::Result<()> {
        let Some(path) = self.file_path(key) else {
            return Ok(());
        };
        let content = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        write_string(&path, &content)
    }

    fn remove_from_disk(&self, key: &K) -> std::io::Result<()> {
        match self.file_path(key) {
            Some(path) if path.exists() => fs::remove_file(path),
            _ => Ok(()),
        }
    }

    /// Clear memory cache only (keeps disk cache)
    pub fn clear_memory(&self) {
        self.memory().clear();
    }

    /// `(entries in memory, capacity)`
    pub fn memory_stats(&self) -> (usize, usize) {
        (self.memory().len(), self.memory_capacity)
    }
}
