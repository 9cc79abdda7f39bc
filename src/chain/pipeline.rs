// src/chain/pipeline.rs
//! Runs a buffer through every filter stage, in chain order

use tracing::{trace, warn};

use super::{FilterChainByteStream, FilterEntry};
use crate::buffer::SecureBuffer;
use crate::error::{ChainError, Result};
use crate::filter::FilterOutput;

impl FilterChainByteStream {
    /// Filter `input` through the whole chain
    ///
    /// The output replaces the read-ahead cache (the previous contents are
    /// wiped) and its length is returned. Source-less chains are fed this way.
    pub fn filter_bytes(&mut self, input: &[u8]) -> Result<usize> {
        if input.is_empty() {
            return Ok(0);
        }
        let mut buf = SecureBuffer::sensitive();
        buf.append(input);
        self.filter_owned(buf)
    }

    /// Same as `filter_bytes`, but takes the buffer instead of copying it
    pub(super) fn filter_owned(&mut self, mut buf: SecureBuffer) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        buf.mark_sensitive();
        run_pipeline(&mut self.filters, &mut buf)?;

        let len = buf.len();
        self.read_cache.replace_with(buf);
        Ok(len)
    }
}

fn run_pipeline(filters: &mut [FilterEntry], buf: &mut SecureBuffer) -> Result<()> {
    for entry in filters.iter_mut() {
        let input_len = buf.len();
        let output = entry
            .filter
            .filter_data(&mut *entry.context, buf.as_mut_slice())?;

        match output {
            FilterOutput::InPlace(len) if len == 0 || len > input_len => {
                let reason = if len == 0 {
                    "no data"
                } else {
                    "in-place length exceeds input"
                };
                return Err(violation(entry, reason));
            }
            FilterOutput::InPlace(len) => buf.truncate(len),
            FilterOutput::Owned(bytes) if bytes.is_empty() => {
                return Err(violation(entry, "no data"));
            }
            FilterOutput::Owned(bytes) => {
                let mut adopted = SecureBuffer::from_vec(bytes);
                adopted.mark_sensitive();
                buf.replace_with(adopted);
            }
        }
        trace!(
            filter = entry.filter.name(),
            input_len,
            output_len = buf.len(),
            "filter stage done"
        );
    }
    Ok(())
}

fn violation(entry: &FilterEntry, reason: &'static str) -> ChainError {
    let filter = entry.filter.name().to_string();
    warn!(%filter, reason, "content filter broke its output contract");
    ChainError::InvalidFilterOutput { filter, reason }
}
