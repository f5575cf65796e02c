use super::toml::ConfigToml;
use crate::{error::*, trace::*};
use std::{path::PathBuf, time::Duration};
use webeid_rp_lib::ServiceConfig;

#[derive(PartialEq, Eq, Clone, Debug)]
/// Wrapper of config toml
pub struct TargetConfig {
  /// config toml
  pub config_toml: ConfigToml,
}

impl TargetConfig {
  /// Build new target config from the toml file
  pub fn new(config_file: &str) -> anyhow::Result<Self> {
    let config_toml = ConfigToml::new(config_file)?;
    Ok(Self { config_toml })
  }
}

impl TryInto<ServiceConfig> for &TargetConfig {
  type Error = anyhow::Error;

  fn try_into(self) -> Result<ServiceConfig, Self::Error> {
    let mut service_conf = ServiceConfig::default();

    if let Some(active_profile) = &self.config_toml.active_profile {
      ensure!(!active_profile.is_empty(), "active_profile must not be empty");
      service_conf.active_profile = active_profile.clone();
    }
    info!("Active profile: {}", service_conf.active_profile);

    if let Some(certs_dir) = &self.config_toml.certs_dir {
      service_conf.certs_dir = PathBuf::from(certs_dir);
    }
    info!("Certificate directory: {}", service_conf.certs_dir.display());

    if let Some(site_origin) = &self.config_toml.site_origin {
      service_conf.site_origin = site_origin.parse()?;
    }
    info!("Site origin: {}", service_conf.site_origin);

    if let Some(nonce_ttl_secs) = &self.config_toml.nonce_ttl_secs {
      ensure!(*nonce_ttl_secs > 0, "nonce_ttl_secs must be positive");
      service_conf.nonce_ttl = Duration::from_secs(*nonce_ttl_secs);
    }
    info!("Nonce ttl: {} secs", service_conf.nonce_ttl.as_secs());

    if let Some(trust_store_password) = &self.config_toml.trust_store_password {
      service_conf.trust_store_password = Some(trust_store_password.clone());
      info!("Trust store password is configured");
    }

    Ok(service_conf)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_applied_for_empty_config() {
    let target = TargetConfig {
      config_toml: ConfigToml::default(),
    };
    let conf: ServiceConfig = (&target).try_into().unwrap();
    assert_eq!(conf.active_profile, "dev");
    assert_eq!(conf.nonce_ttl, Duration::from_secs(300));
    assert!(conf.trust_store_password.is_none());
  }

  #[test]
  fn test_invalid_values_are_rejected() {
    let target = TargetConfig {
      config_toml: ConfigToml {
        nonce_ttl_secs: Some(0),
        ..Default::default()
      },
    };
    let res: Result<ServiceConfig, _> = (&target).try_into();
    assert!(res.is_err());

    let target = TargetConfig {
      config_toml: ConfigToml {
        site_origin: Some("not a url".to_string()),
        ..Default::default()
      },
    };
    let res: Result<ServiceConfig, _> = (&target).try_into();
    assert!(res.is_err());
  }
}
