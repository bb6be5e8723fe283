//! Scan-engine configuration: a plain data struct, a builder, and
//! accessor methods, following the same three-way split the crawler this
//! engine grew from uses for its own configuration.

mod builder;
mod getters;
mod types;

pub use builder::ScanConfigBuilder;
pub use types::ScanConfig;
