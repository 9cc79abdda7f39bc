// src/chain/mod.rs
//! Filter chain byte stream: pull filtered bytes out of a source
//!
//! A chain owns its source, one context per filter, and two secure caches:
//! the payload cache (complete-data mode) and the read-ahead cache
//! (streaming mode, and externally fed bytes).

mod pipeline;
mod read;

use std::fmt;

use tracing::debug;

use crate::buffer::SecureBuffer;
use crate::config::Config;
use crate::enums::ChainMode;
use crate::error::Result;
use crate::filter::{ContentFilterPtr, ContentItem, FilterContext};
use crate::source::ByteSource;

/// Owned source stream
pub type BoxedSource = Box<dyn ByteSource + Send>;

struct FilterEntry {
    filter: ContentFilterPtr,
    context: FilterContext,
}

pub struct FilterChainByteStream {
    source: Option<BoxedSource>,
    filters: Vec<FilterEntry>,
    mode: ChainMode,
    cache: SecureBuffer,
    read_cache: SecureBuffer,
    accumulate_chunk_size: usize,
    max_payload_size: Option<usize>,
}

impl FilterChainByteStream {
    /// Chain reading from `source`, using the global config
    pub fn new<S>(source: S, filters: &[ContentFilterPtr], item: &ContentItem) -> Result<Self>
    where
        S: ByteSource + Send + 'static,
    {
        Self::with_config(
            Some(Box::new(source) as BoxedSource),
            filters,
            item,
            crate::config::load(),
        )
    }

    /// Chain with no source of its own; bytes are fed through `filter_bytes`
    pub fn without_source(filters: &[ContentFilterPtr], item: &ContentItem) -> Result<Self> {
        Self::with_config(None, filters, item, crate::config::load())
    }

    pub fn with_config(
        source: Option<BoxedSource>,
        filters: &[ContentFilterPtr],
        item: &ContentItem,
        config: &Config,
    ) -> Result<Self> {
        config.validate()?;

        let mut entries = Vec::with_capacity(filters.len());
        for filter in filters {
            let context = filter.make_context(item)?;
            entries.push(FilterEntry {
                filter: filter.clone(),
                context,
            });
        }
        let mode = ChainMode::from_modes(filters.iter().map(|f| f.operating_mode()));

        debug!(
            item = %item.id,
            filters = entries.len(),
            ?mode,
            has_source = source.is_some(),
            "built filter chain"
        );

        Ok(Self {
            source,
            filters: entries,
            mode,
            cache: SecureBuffer::sensitive(),
            read_cache: SecureBuffer::sensitive(),
            accumulate_chunk_size: config.buffers.accumulate_chunk_size,
            max_payload_size: config.limits.max_payload_size,
        })
    }

    pub fn mode(&self) -> ChainMode {
        self.mode
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Bytes filtered but not yet handed to the caller
    pub fn buffered_len(&self) -> usize {
        self.cache.len() + self.read_cache.len()
    }

    /// True once the source is finished and both caches are drained
    pub fn is_exhausted(&self) -> bool {
        self.buffered_len() == 0 && self.source.as_ref().map_or(true, |s| s.at_end())
    }
}

impl fmt::Debug for FilterChainByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.filters.iter().map(|e| e.filter.name()).collect();
        f.debug_struct("FilterChainByteStream")
            .field("filters", &names)
            .field("mode", &self.mode)
            .field("has_source", &self.source.is_some())
            .field("cache", &self.cache)
            .field("read_cache", &self.read_cache)
            .finish()
    }
}
