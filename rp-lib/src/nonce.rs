use crate::{cache::NonceCache, constants::*, error::*, trace::*};
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use rand::{rngs::OsRng, RngCore};
use std::time::Duration;

/// Issues one-time nonces and records their creation time in the nonce cache. The
/// randomness itself comes from the OS RNG; this type only wires TTL and cache.
pub struct NonceGenerator {
  nonce_ttl: Duration,
  nonce_cache: NonceCache,
}

impl NonceGenerator {
  /// Generate a fresh nonce and record it in the cache with its creation time
  pub fn generate(&self) -> String {
    let mut buf = [0u8; NONCE_LENGTH_BYTES];
    OsRng.fill_bytes(&mut buf);
    let nonce = general_purpose::STANDARD.encode(buf);
    self.nonce_cache.insert(nonce.clone(), Utc::now());
    debug!("Issued nonce with ttl of {} secs", self.nonce_ttl.as_secs());
    nonce
  }

  /// Validity window of issued nonces
  pub fn nonce_ttl(&self) -> Duration {
    self.nonce_ttl
  }
}

/// Builder for [`NonceGenerator`]
pub struct NonceGeneratorBuilder {
  nonce_ttl: Duration,
  nonce_cache: Option<NonceCache>,
}

impl Default for NonceGeneratorBuilder {
  fn default() -> Self {
    Self {
      nonce_ttl: Duration::from_secs(NONCE_TTL_SECS),
      nonce_cache: None,
    }
  }
}

impl NonceGeneratorBuilder {
  /// Override the default nonce TTL
  pub fn with_nonce_ttl(mut self, nonce_ttl: Duration) -> Self {
    self.nonce_ttl = nonce_ttl;
    self
  }

  /// Set the cache that issued nonces are recorded in
  pub fn with_nonce_cache(mut self, nonce_cache: NonceCache) -> Self {
    self.nonce_cache = Some(nonce_cache);
    self
  }

  /// Build the generator. A cache is mandatory and the TTL must be positive.
  pub fn build(self) -> Result<NonceGenerator> {
    let Some(nonce_cache) = self.nonce_cache else {
      return Err(RpError::BuildNonceGeneratorError("nonce cache is not set".to_string()));
    };
    if self.nonce_ttl.is_zero() {
      return Err(RpError::BuildNonceGeneratorError("nonce ttl must be positive".to_string()));
    }
    Ok(NonceGenerator {
      nonce_ttl: self.nonce_ttl,
      nonce_cache,
    })
  }
}
