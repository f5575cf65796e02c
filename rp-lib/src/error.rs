pub use anyhow::{anyhow, bail, ensure, Context};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RpError>;
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Describes things that can go wrong while bootstrapping the validation stack.
/// Every variant except the absent trust store (which is not an error) aborts startup.
#[derive(Debug, Error)]
pub enum RpError {
  #[error("Failed to read certificate resources")]
  ReadCertificateError(#[from] std::io::Error),
  #[error("Malformed trusted CA certificate {0}: {1}")]
  ParseCertificateError(String, String),
  #[error("Trust store is present but no trust store password is configured")]
  TrustStorePasswordMissing,
  #[error("Trust store MAC verification failed, wrong password?")]
  TrustStoreMacError,
  #[error("Malformed trust store: {0}")]
  ParseTrustStoreError(String),
  #[error("Invalid site origin: {0}")]
  InvalidSiteOrigin(String),
  #[error("Failed to build nonce generator: {0}")]
  BuildNonceGeneratorError(String),
  #[error("Failed to build auth token validator: {0}")]
  BuildValidatorError(String),
  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

/// Describes things that can go wrong when a request handler consumes a nonce
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Nonce not found in cache")]
  NonceNotFound,
  #[error("Nonce has expired")]
  NonceExpired,
}
