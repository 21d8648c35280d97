//! Build configuration: defaults, overlaid by a TOML file, overlaid by `-S` values,
//! overlaid by explicit command-line flags.

mod builder;
mod defaults;
mod file;

pub use builder::build_config;
