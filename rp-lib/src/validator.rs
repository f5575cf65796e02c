use crate::{cache::NonceCache, certs::CaCertificate, constants::*, error::*, trace::*};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use url::Url;

/// The assembled token validator: the deployment's own origin, the shared nonce
/// cache and the combined trusted-CA list, fixed at startup. Cryptographic token
/// validation is the wrapped security library's concern; the only runtime behavior
/// owned here is the nonce-cache interaction of the validation flow.
pub struct AuthTokenValidator {
  site_origin: Url,
  nonce_ttl: Duration,
  nonce_cache: NonceCache,
  trusted_certificate_authorities: Vec<CaCertificate>,
}

impl AuthTokenValidator {
  /// Origin URI this validator accepts tokens for
  pub fn site_origin(&self) -> &Url {
    &self.site_origin
  }

  /// Trusted CA certificates, loose files first, then trust-store entries
  pub fn trusted_certificate_authorities(&self) -> &[CaCertificate] {
    &self.trusted_certificate_authorities
  }

  /// Consume a nonce previously issued by the generator. The nonce is removed from
  /// the cache (one-time use) and rejected if unknown, already used, evicted, or
  /// older than its validity window. Returns its creation time on success.
  pub fn consume_nonce(&self, nonce: &str) -> ValidationResult<DateTime<Utc>> {
    let Some(created) = self.nonce_cache.remove(nonce) else {
      return Err(ValidationError::NonceNotFound);
    };
    let ttl = ChronoDuration::from_std(self.nonce_ttl).map_err(|_| ValidationError::NonceExpired)?;
    if created + ttl < Utc::now() {
      return Err(ValidationError::NonceExpired);
    }
    Ok(created)
  }
}

/// Builder for [`AuthTokenValidator`]. Construction is the fail-fast step of
/// startup: a misconfigured origin or an unusable trusted-CA set aborts here.
pub struct AuthTokenValidatorBuilder {
  site_origin: Option<Url>,
  nonce_ttl: Duration,
  nonce_cache: Option<NonceCache>,
  trusted_certificate_authorities: Vec<CaCertificate>,
}

impl Default for AuthTokenValidatorBuilder {
  fn default() -> Self {
    Self {
      site_origin: None,
      nonce_ttl: Duration::from_secs(NONCE_TTL_SECS),
      nonce_cache: None,
      trusted_certificate_authorities: vec![],
    }
  }
}

impl AuthTokenValidatorBuilder {
  /// Set the origin URI of this deployment
  pub fn with_site_origin(mut self, site_origin: Url) -> Self {
    self.site_origin = Some(site_origin);
    self
  }

  /// Override the default nonce TTL
  pub fn with_nonce_ttl(mut self, nonce_ttl: Duration) -> Self {
    self.nonce_ttl = nonce_ttl;
    self
  }

  /// Set the cache consulted for issued nonces
  pub fn with_nonce_cache(mut self, nonce_cache: NonceCache) -> Self {
    self.nonce_cache = Some(nonce_cache);
    self
  }

  /// Append a batch of trusted CA certificates. Called once per source; the order
  /// of calls fixes the order of the combined list.
  pub fn with_trusted_certificate_authorities(mut self, certificates: Vec<CaCertificate>) -> Self {
    self.trusted_certificate_authorities.extend(certificates);
    self
  }

  /// Build the validator, verifying origin and trusted-CA set
  pub fn build(self) -> Result<AuthTokenValidator> {
    let Some(site_origin) = self.site_origin else {
      return Err(RpError::BuildValidatorError("site origin is not set".to_string()));
    };
    check_site_origin(&site_origin)?;

    let Some(nonce_cache) = self.nonce_cache else {
      return Err(RpError::BuildValidatorError("nonce cache is not set".to_string()));
    };

    if self.trusted_certificate_authorities.is_empty() {
      return Err(RpError::BuildValidatorError(
        "trusted CA certificate set is empty".to_string(),
      ));
    }
    let now_unix = Utc::now().timestamp();
    for cert in &self.trusted_certificate_authorities {
      // Re-parse from DER so a corrupted entry cannot survive into the validator
      CaCertificate::from_der(cert.der().to_vec(), cert.subject())?;
      if cert.not_after_unix() < now_unix {
        warn!("Trusted CA certificate {} has expired", cert.subject());
      }
      if !cert.is_ca() {
        warn!("Trusted certificate {} does not carry CA basic constraints", cert.subject());
      }
    }

    Ok(AuthTokenValidator {
      site_origin,
      nonce_ttl: self.nonce_ttl,
      nonce_cache,
      trusted_certificate_authorities: self.trusted_certificate_authorities,
    })
  }
}

/// The site origin must be a plain https origin: host, optional port, nothing else
fn check_site_origin(origin: &Url) -> Result<()> {
  if origin.scheme() != "https" {
    return Err(RpError::InvalidSiteOrigin(format!(
      "{origin}: scheme must be https"
    )));
  }
  if origin.host_str().is_none() {
    return Err(RpError::InvalidSiteOrigin(format!("{origin}: host is missing")));
  }
  if origin.path() != "/" || origin.query().is_some() || origin.fragment().is_some() {
    return Err(RpError::InvalidSiteOrigin(format!(
      "{origin}: origin must not carry a path, query or fragment"
    )));
  }
  Ok(())
}
