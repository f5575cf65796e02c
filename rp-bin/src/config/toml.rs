use crate::error::*;
use serde::Deserialize;
use std::fs;

#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone)]
/// Config toml
pub struct ConfigToml {
  /// Deployment profile selecting the certificate directory [default: "dev"]
  pub active_profile: Option<String>,
  /// Base directory holding one certificate subdirectory per profile [default: "./certs"]
  pub certs_dir: Option<String>,
  /// Origin URI of this deployment, e.g. "https://rp.example.org" [default: "https://localhost"]
  pub site_origin: Option<String>,
  /// Nonce validity window in seconds [default: 300]
  pub nonce_ttl_secs: Option<u64>,
  /// Password of the optional trust store. Required only when the profile
  /// directory contains a trust store file.
  pub trust_store_password: Option<String>,
}

impl ConfigToml {
  pub(super) fn new(config_file: &str) -> anyhow::Result<Self> {
    let config_str = fs::read_to_string(config_file)?;

    toml::from_str(&config_str).map_err(|e| anyhow!(e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_config_toml() {
    let config = r#"
active_profile = "prod"
certs_dir = "/etc/webeid-rp/certs"
site_origin = "https://rp.example.org"
nonce_ttl_secs = 120
trust_store_password = "changeit"
"#;
    let parsed: ConfigToml = toml::from_str(config).unwrap();
    assert_eq!(parsed.active_profile.as_deref(), Some("prod"));
    assert_eq!(parsed.certs_dir.as_deref(), Some("/etc/webeid-rp/certs"));
    assert_eq!(parsed.site_origin.as_deref(), Some("https://rp.example.org"));
    assert_eq!(parsed.nonce_ttl_secs, Some(120));
    assert_eq!(parsed.trust_store_password.as_deref(), Some("changeit"));

    let parsed: ConfigToml = toml::from_str("").unwrap();
    assert_eq!(parsed, ConfigToml::default());
  }
}
