// src/config/mod.rs
//! Configuration system for secure-filter-chain
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, Buffers, Config, Limits};

mod app;
mod defaults;
