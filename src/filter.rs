// src/filter.rs
//! The content filter seam
//!
//! Filters are shared, immutable transformation stages (decryption,
//! decompression, ...). Anything that changes between calls lives in the
//! per-chain [`FilterContext`] built by [`ContentFilter::make_context`].

use std::any::Any;
use std::sync::Arc;

use crate::enums::OperatingMode;
use crate::error::Result;

/// Per-chain, per-filter mutable state; filters downcast to their own type
pub type FilterContext = Box<dyn Any + Send>;

/// Shared handle to a filter implementation
pub type ContentFilterPtr = Arc<dyn ContentFilter>;

/// Descriptor of the content item a chain is built for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

impl ContentItem {
    pub fn new(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
        }
    }
}

/// Result of one filter stage
///
/// `InPlace` means the stage rewrote the buffer it was handed and the first
/// `len` bytes are its output. `Owned` hands a new buffer to the pipeline.
#[derive(Debug)]
pub enum FilterOutput {
    InPlace(usize),
    Owned(Vec<u8>),
}

pub trait ContentFilter: Send + Sync {
    /// Used in errors and logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Queried once per chain, at construction
    fn operating_mode(&self) -> OperatingMode;

    /// Build the state this filter carries for one chain
    fn make_context(&self, item: &ContentItem) -> Result<FilterContext>;

    /// Transform `data`; must produce at least one byte
    fn filter_data(&self, context: &mut (dyn Any + Send), data: &mut [u8])
        -> Result<FilterOutput>;
}

/// Context for filters that keep no state
pub fn no_context() -> FilterContext {
    Box::new(())
}
