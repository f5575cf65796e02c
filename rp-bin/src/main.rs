mod config;
mod error;
mod trace;

use crate::{
  config::{parse_opts, TargetConfig},
  trace::*,
};
use webeid_rp_lib::{bootstrap, ServiceConfig, ValidationContext};

fn main() {
  // Initially load options
  let Ok(parsed_opts) = parse_opts() else {
    eprintln!("Invalid options");
    std::process::exit(1);
  };

  // Initialize tracing subscriber
  init_tracing_subscriber();

  if let Err(e) = validation_service(&parsed_opts.config_file_path) {
    error!("webeid-rp bootstrap failed: {e}");
    std::process::exit(1);
  }
}

/// Load the configuration, bootstrap the validation stack and report what was built.
/// The assembled context is what a relying-party server embeds; run standalone, this
/// verifies a deployment's certificate resources and configuration fail-fast.
fn validation_service(config_file_path: &str) -> Result<(), anyhow::Error> {
  info!("Start webeid-rp validation bootstrap");
  let config = match TargetConfig::new(config_file_path) {
    Ok(v) => v,
    Err(e) => {
      error!("Invalid toml file: {e}");
      std::process::exit(1);
    }
  };

  let service_conf = match (&config).try_into() as Result<ServiceConfig, anyhow::Error> {
    Ok(v) => v,
    Err(e) => {
      error!("Invalid configuration: {e}");
      return Err(anyhow::anyhow!(e));
    }
  };

  let context = bootstrap(&service_conf).map_err(|e| anyhow::anyhow!(e))?;
  report(&context);

  Ok(())
}

/// Log a summary of the assembled validation context
fn report(context: &ValidationContext) {
  info!(
    "Assembled validator for origin {} with {} trusted CA certificate(s)",
    context.token_validator.site_origin(),
    context.token_validator.trusted_certificate_authorities().len()
  );
  for cert in context.token_validator.trusted_certificate_authorities() {
    info!("  trusted CA: {} (serial {})", cert.subject(), cert.serial());
  }
  info!(
    "Nonce generator ready with ttl {} secs",
    context.nonce_generator.nonce_ttl().as_secs()
  );
}
