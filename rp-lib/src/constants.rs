/// Name of the nonce cache registered at the cache manager
pub const NONCE_CACHE_NAME: &str = "nonce_cache";
/// Nonce validity window in seconds
pub const NONCE_TTL_SECS: u64 = 300;
/// Margin added on top of the nonce TTL for the cache's created-at expiry, in seconds.
/// The cache must outlive the nonce itself so that an expired-but-cached nonce is
/// rejected by TTL policy and never resurrected after eviction.
pub const NONCE_CACHE_EXPIRY_MARGIN_SECS: u64 = 60;
/// Maximum number of outstanding nonces held by the cache
pub const NONCE_CACHE_MAX_CAPACITY: u64 = 100_000;
/// Number of random bytes in a generated nonce
pub const NONCE_LENGTH_BYTES: usize = 32;

/// File extension of loose trusted CA certificate files
pub const CERT_FILE_EXTENSION: &str = "cer";
/// Fixed file name of the optional trust store inside the profile directory
pub const TRUST_STORE_FILE_NAME: &str = "trusted_certificates.p12";

// Defaults applied when the configuration leaves a field unset

pub const DEFAULT_ACTIVE_PROFILE: &str = "dev";
pub const DEFAULT_CERTS_DIR: &str = "./certs";
pub const DEFAULT_SITE_ORIGIN: &str = "https://localhost";
