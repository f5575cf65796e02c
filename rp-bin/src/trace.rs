pub use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing subscriber
pub fn init_tracing_subscriber() {
  let format_layer = fmt::layer()
    .with_line_number(false)
    .with_thread_ids(false)
    .with_thread_names(true)
    .with_target(true)
    .with_level(true)
    .compact();

  // This limits the logger to emit only this crate and the wiring library
  let level_string = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| "info".to_string());
  let pkg_name = env!("CARGO_PKG_NAME").replace('-', "_");
  let filter_layer = EnvFilter::new(format!("{}={level},webeid_rp_lib={level}", pkg_name, level = level_string));

  tracing_subscriber::registry().with(format_layer).with(filter_layer).init();
}
