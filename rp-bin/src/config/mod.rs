mod parse;
mod target_config;
mod toml;

pub use parse::parse_opts;
pub use target_config::TargetConfig;
