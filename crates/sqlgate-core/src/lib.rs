//! Shared types for sqlgate.
//!
//! The policy configuration consumed by the authorization gate lives here,
//! together with the loaders that gather raw key/value settings from YAML
//! files and the process environment.

pub mod config;

pub use config::{
    ALLOW_ALL_OPERATIONS, ALLOW_DDL_OPERATIONS, BLOCK_DANGEROUS_KEYWORDS, ConfigError,
    ConfigSources, POLICY_KEYS, PolicyConfig, parse_flag,
};
