use crate::{
  cache::{CacheManager, NonceCache},
  constants::*,
  nonce::NonceGenerator,
  validator::AuthTokenValidator,
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use url::Url;

#[derive(Clone)]
/// Service configuration passed from outside, immutable for the process lifetime
pub struct ServiceConfig {
  /// Deployment profile selecting the certificate directory, e.g. "dev" or "prod"
  pub active_profile: String,

  /// Base directory holding one certificate subdirectory per profile
  pub certs_dir: PathBuf,

  /// Origin URI of this deployment, handed to the validator
  pub site_origin: Url,

  /// Validity window of an issued nonce
  pub nonce_ttl: Duration,

  /// Password of the optional trust store. If None, a present trust store is a
  /// configuration error; an absent one is fine either way.
  pub trust_store_password: Option<String>,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      active_profile: DEFAULT_ACTIVE_PROFILE.to_string(),
      certs_dir: PathBuf::from(DEFAULT_CERTS_DIR),
      site_origin: DEFAULT_SITE_ORIGIN.parse().unwrap(),
      nonce_ttl: Duration::from_secs(NONCE_TTL_SECS),
      trust_store_password: None,
    }
  }
}

/// The initialized object graph returned by [`bootstrap`](crate::bootstrap): the
/// process-wide singletons consumed by request-handling collaborators. Built once at
/// startup and shared by reference from then on.
pub struct ValidationContext {
  /// Configuration the context was built from
  pub service_config: ServiceConfig,

  /// Registry of named caches
  pub cache_manager: Arc<CacheManager>,

  /// Nonce-to-creation-time cache shared by generator and validator
  pub nonce_cache: NonceCache,

  /// Nonce generator
  pub nonce_generator: Arc<NonceGenerator>,

  /// Auth token validator
  pub token_validator: Arc<AuthTokenValidator>,
}
