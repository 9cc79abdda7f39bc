// src/lib.rs
//! secure-filter-chain: pull-based byte stream through content filters
//!
//! Features:
//! - Ordered filter pipeline (decryption, decompression, ...)
//! - Streaming or whole-payload strategy, picked once per chain
//! - Secure erasure of every intermediate buffer (zeroize + secure-gate)

pub mod aliases;
pub mod buffer;
pub mod chain;
pub mod config;
pub mod consts;
pub mod enums;
pub mod error;
pub mod filter;
pub mod source;

// Re-export everything users need at the crate root
pub use aliases::PlainText;
pub use buffer::SecureBuffer;
pub use chain::{BoxedSource, FilterChainByteStream};
pub use config::{load as load_config, Config};
pub use enums::{ChainMode, OperatingMode};
pub use error::{ChainError, Result};
pub use filter::{
    no_context, ContentFilter, ContentFilterPtr, ContentItem, FilterContext, FilterOutput,
};
pub use source::{ByteSource, ReaderSource};
