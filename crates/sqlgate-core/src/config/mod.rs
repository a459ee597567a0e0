//! Configuration types for sqlgate.
//!
//! The gate is driven by three flags, supplied as a flat string map:
//!
//! - **ALLOW_ALL_OPERATIONS**: bypass every check
//! - **ALLOW_DDL_OPERATIONS**: permit schema-modifying statements
//! - **BLOCK_DANGEROUS_KEYWORDS**: scan statement text for dangerous keywords
//!
//! The map can be assembled from a YAML file (`policy:` section) and the
//! process environment through [`ConfigSources`], then resolved once into a
//! typed [`PolicyConfig`].

pub mod policy;
pub mod sources;

pub use policy::{
    ALLOW_ALL_OPERATIONS, ALLOW_DDL_OPERATIONS, BLOCK_DANGEROUS_KEYWORDS, POLICY_KEYS,
    PolicyConfig, parse_flag,
};
pub use sources::ConfigSources;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
