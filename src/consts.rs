// src/consts.rs
//! Shared constants: buffer sizes and config defaults

/// Intermediate chunk used while draining a source into the payload cache
pub const DEFAULT_ACCUMULATE_CHUNK_SIZE: usize = 16 * 1024;

/// Smallest allocation a secure buffer grows to
pub const SECURE_BUFFER_MIN_CAPACITY: usize = 64;

/// Consumed prefix size after which a secure buffer compacts itself
pub const SECURE_BUFFER_COMPACT_THRESHOLD: usize = 4 * 1024;

/// Env var naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "SFC_CONFIG";

/// Config file used when `SFC_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "filter-chain.toml";
