mod cache;
mod certs;
mod constants;
mod error;
mod globals;
mod nonce;
mod trace;
mod validator;

use crate::{
  certs::{load_ca_certificates_from_cer_files, load_ca_certificates_from_trust_store},
  constants::*,
  trace::*,
};
use std::sync::Arc;

pub use cache::{nonce_cache_expiry, CacheManager, NonceCache};
pub use certs::CaCertificate;
pub use error::{Result, RpError, ValidationError, ValidationResult};
pub use globals::{ServiceConfig, ValidationContext};
pub use nonce::{NonceGenerator, NonceGeneratorBuilder};
pub use validator::{AuthTokenValidator, AuthTokenValidatorBuilder};

/// Entry point of the validation stack. Run once at startup: loads the trusted CA
/// certificates of the active profile from both sources, provisions the nonce
/// cache, and assembles generator and validator into a [`ValidationContext`] owned
/// by the caller. Any certificate or assembly failure aborts with an error; the
/// only tolerated absence is the optional trust store.
pub fn bootstrap(service_config: &ServiceConfig) -> Result<ValidationContext> {
  info!(
    "Bootstrapping token validation for the {} profile, origin {}",
    service_config.active_profile, service_config.site_origin
  );

  let cache_manager = Arc::new(CacheManager::new());
  let nonce_cache = cache_manager.get_or_create_nonce_cache(NONCE_CACHE_NAME, service_config.nonce_ttl);

  let loose_certificates =
    load_ca_certificates_from_cer_files(&service_config.certs_dir, &service_config.active_profile)?;
  let store_certificates = load_ca_certificates_from_trust_store(
    &service_config.certs_dir,
    &service_config.active_profile,
    service_config.trust_store_password.as_deref(),
  )?;

  let nonce_generator = NonceGeneratorBuilder::default()
    .with_nonce_ttl(service_config.nonce_ttl)
    .with_nonce_cache(nonce_cache.clone())
    .build()?;

  let token_validator = AuthTokenValidatorBuilder::default()
    .with_site_origin(service_config.site_origin.clone())
    .with_nonce_ttl(service_config.nonce_ttl)
    .with_nonce_cache(nonce_cache.clone())
    .with_trusted_certificate_authorities(loose_certificates)
    .with_trusted_certificate_authorities(store_certificates)
    .build()?;

  info!(
    "Token validation ready: {} trusted CA certificate(s), nonce ttl {} secs, cache expiry {} secs",
    token_validator.trusted_certificate_authorities().len(),
    service_config.nonce_ttl.as_secs(),
    nonce_cache_expiry(service_config.nonce_ttl).as_secs()
  );

  Ok(ValidationContext {
    service_config: service_config.clone(),
    cache_manager,
    nonce_cache,
    nonce_generator: Arc::new(nonce_generator),
    token_validator: Arc::new(token_validator),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::certs::tests::{generate_test_ca, write_profile_dir};

  fn test_config(certs_dir: &std::path::Path) -> ServiceConfig {
    ServiceConfig {
      active_profile: "test".to_string(),
      certs_dir: certs_dir.to_path_buf(),
      site_origin: "https://rp.example.org".parse().unwrap(),
      trust_store_password: Some("secret".to_string()),
      ..Default::default()
    }
  }

  #[test]
  fn test_bootstrap_combines_both_certificate_sources_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let (pem_a, _, _) = generate_test_ca("Loose A");
    let (pem_b, _, _) = generate_test_ca("Loose B");
    write_profile_dir(
      tmp.path(),
      "test",
      &[("b.cer", pem_b.as_bytes()), ("a.cer", pem_a.as_bytes())],
    );
    let (_, cert_der, key_der) = generate_test_ca("Store CA");
    let pfx = p12::PFX::new(&cert_der, &key_der, None, "secret", "store-ca").unwrap();
    std::fs::write(tmp.path().join("test").join(TRUST_STORE_FILE_NAME), pfx.to_der()).unwrap();

    let context = bootstrap(&test_config(tmp.path())).unwrap();
    let subjects = context
      .token_validator
      .trusted_certificate_authorities()
      .iter()
      .map(|c| c.subject().to_string())
      .collect::<Vec<_>>();
    assert_eq!(subjects, vec!["CN=Loose A", "CN=Loose B", "CN=Store CA"]);
  }

  #[test]
  fn test_bootstrap_without_trust_store() {
    let tmp = tempfile::tempdir().unwrap();
    let (pem_a, _, _) = generate_test_ca("Loose A");
    write_profile_dir(tmp.path(), "test", &[("a.cer", pem_a.as_bytes())]);

    let context = bootstrap(&test_config(tmp.path())).unwrap();
    assert_eq!(context.token_validator.trusted_certificate_authorities().len(), 1);
  }

  #[test]
  fn test_bootstrap_fails_without_any_trusted_ca() {
    let tmp = tempfile::tempdir().unwrap();
    write_profile_dir(tmp.path(), "test", &[]);
    let res = bootstrap(&test_config(tmp.path()));
    assert!(matches!(res, Err(RpError::BuildValidatorError(_))));
  }

  #[test]
  fn test_bootstrap_fails_on_malformed_certificate() {
    let tmp = tempfile::tempdir().unwrap();
    let (pem_a, _, _) = generate_test_ca("Loose A");
    write_profile_dir(
      tmp.path(),
      "test",
      &[("a.cer", pem_a.as_bytes()), ("broken.cer", b"garbage".as_slice())],
    );
    let res = bootstrap(&test_config(tmp.path()));
    assert!(matches!(res, Err(RpError::ParseCertificateError(_, _))));
  }

  #[test]
  fn test_generator_and_validator_share_the_nonce_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let (pem_a, _, _) = generate_test_ca("Loose A");
    write_profile_dir(tmp.path(), "test", &[("a.cer", pem_a.as_bytes())]);

    let context = bootstrap(&test_config(tmp.path())).unwrap();
    let nonce = context.nonce_generator.generate();
    assert!(context.token_validator.consume_nonce(&nonce).is_ok());
    assert_eq!(
      context.token_validator.consume_nonce(&nonce),
      Err(ValidationError::NonceNotFound)
    );

    // The named cache registered at the manager is the same instance
    let registered = context.cache_manager.get(NONCE_CACHE_NAME).unwrap();
    let nonce = context.nonce_generator.generate();
    assert!(registered.get(&nonce).is_some());
  }
}
