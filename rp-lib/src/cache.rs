use crate::{constants::*, trace::*};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Mutex, time::Duration};

/// Cache from a nonce to its creation time. Eviction is owned by moka: entries
/// expire a fixed margin after creation, regardless of reads.
pub type NonceCache = moka::sync::Cache<String, DateTime<Utc>>;

/// Expiry applied to the nonce cache for a given nonce TTL. Strictly larger than the
/// TTL itself, so a nonce always outlives its validity window inside the cache and
/// expiry is decided by TTL policy, not by eviction.
pub fn nonce_cache_expiry(nonce_ttl: Duration) -> Duration {
  nonce_ttl + Duration::from_secs(NONCE_CACHE_EXPIRY_MARGIN_SECS)
}

/// Registry of named caches. The singleton replacement for the original JCache
/// provider: lookup by name, create on first use, same instance afterwards.
pub struct CacheManager {
  caches: Mutex<HashMap<String, NonceCache>>,
}

impl CacheManager {
  /// Create an empty cache manager
  pub fn new() -> Self {
    Self {
      caches: Mutex::new(HashMap::new()),
    }
  }

  /// Look up an already-created cache by name
  pub fn get(&self, name: &str) -> Option<NonceCache> {
    self.caches.lock().unwrap().get(name).cloned()
  }

  /// Look up the named nonce cache, creating it with created-at expiry
  /// `nonce_ttl + margin` if it does not exist yet. Idempotent: later calls return a
  /// handle to the same underlying cache whatever TTL they pass.
  pub fn get_or_create_nonce_cache(&self, name: &str, nonce_ttl: Duration) -> NonceCache {
    let mut caches = self.caches.lock().unwrap();
    caches
      .entry(name.to_string())
      .or_insert_with(|| {
        let expiry = nonce_cache_expiry(nonce_ttl);
        debug!("Creating cache \"{name}\" with created-at expiry of {} secs", expiry.as_secs());
        moka::sync::Cache::builder()
          .max_capacity(NONCE_CACHE_MAX_CAPACITY)
          .time_to_live(expiry)
          .build()
      })
      .clone()
  }
}

impl Default for CacheManager {
  fn default() -> Self {
    Self::new()
  }
}
