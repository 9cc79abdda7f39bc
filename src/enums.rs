// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the filter operating modes and the chain strategy
//! derived from them.

use serde::{Deserialize, Serialize};

/// What a content filter needs before it can produce correct output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum OperatingMode {
    /// Can transform any contiguous chunk as it arrives
    #[default]
    Streaming,
    /// Must see the entire payload in one call
    RequiresCompleteData,
}

/// Read strategy of a chain, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainMode {
    /// Filter each source chunk as it is pulled
    Streaming,
    /// Materialize the whole source, filter once, then serve from cache
    CompleteData,
}

impl ChainMode {
    /// `CompleteData` as soon as any filter requires complete input
    pub fn from_modes<I>(modes: I) -> Self
    where
        I: IntoIterator<Item = OperatingMode>,
    {
        if modes
            .into_iter()
            .any(|m| m == OperatingMode::RequiresCompleteData)
        {
            ChainMode::CompleteData
        } else {
            ChainMode::Streaming
        }
    }
}
