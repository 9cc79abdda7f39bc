// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret wrappers handed out by the chain.

pub use secure_gate::dynamic_alias;

// Fully filtered (typically decrypted) payload
dynamic_alias!(PlainText, Vec<u8>);
