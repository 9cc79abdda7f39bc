// src/chain/read.rs
//! Pull side of the chain: streaming and complete-data reads

use std::io;

use tracing::debug;
use zeroize::Zeroizing;

use super::FilterChainByteStream;
use crate::aliases::PlainText;
use crate::buffer::SecureBuffer;
use crate::enums::ChainMode;
use crate::error::{ChainError, Result};
use crate::source::ByteSource;

impl FilterChainByteStream {
    /// Read up to `out.len()` filtered bytes
    ///
    /// `Ok(0)` means nothing is available: end of stream once
    /// [`is_exhausted`](Self::is_exhausted) holds, a source stall otherwise.
    /// An empty `out` is a no-op.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        match self.mode {
            ChainMode::Streaming => self.read_streaming(out),
            ChainMode::CompleteData => self.read_complete(out),
        }
    }

    /// Drain the rest of the chain into a secret
    ///
    /// Stops at the first empty read, so a stalled source ends the payload.
    pub fn read_to_end_secure(&mut self) -> Result<PlainText> {
        let mut payload = SecureBuffer::sensitive();

        if self.mode == ChainMode::CompleteData {
            if self.cache.is_empty() && self.source_has_more() {
                self.cache_bytes()?;
            }
            payload.replace_with(self.cache.take());
        }

        let mut chunk = Zeroizing::new(vec![0u8; self.accumulate_chunk_size]);
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            payload.append(&chunk[..n]);
        }
        Ok(payload.into_plaintext())
    }

    fn source_has_more(&self) -> bool {
        self.source.as_ref().is_some_and(|s| !s.at_end())
    }

    fn read_streaming(&mut self, out: &mut [u8]) -> Result<usize> {
        if !self.read_cache.is_empty() {
            return Ok(self.read_cache.drain_into(out));
        }

        let Some(source) = self.source.as_mut() else {
            return Ok(0);
        };
        let pulled = source.read_bytes(out)?.min(out.len());
        if pulled == 0 {
            return Ok(0);
        }

        self.filter_bytes(&out[..pulled])?;
        Ok(self.read_cache.drain_into(out))
    }

    fn read_complete(&mut self, out: &mut [u8]) -> Result<usize> {
        if self.cache.is_empty() && self.source_has_more() {
            self.cache_bytes()?;
        }
        if !self.cache.is_empty() {
            return Ok(self.cache.drain_into(out));
        }
        // externally fed bytes
        Ok(self.read_cache.drain_into(out))
    }

    /// Materialize the whole source, filter it once, park it in the cache
    fn cache_bytes(&mut self) -> Result<()> {
        let Some(source) = self.source.as_mut() else {
            return Ok(());
        };

        let mut chunk = Zeroizing::new(vec![0u8; self.accumulate_chunk_size]);
        let mut accumulated = self.cache.take();
        while !source.at_end() {
            let n = source.read_bytes(&mut chunk)?.min(chunk.len());
            if n == 0 {
                if !source.at_end() {
                    debug!(
                        accumulated = accumulated.len(),
                        "source stalled, filtering what was read"
                    );
                }
                break;
            }
            if let Some(limit) = self.max_payload_size {
                if accumulated.len() + n > limit {
                    return Err(ChainError::PayloadTooLarge { limit });
                }
            }
            accumulated.append(&chunk[..n]);
        }

        if accumulated.is_empty() {
            return Ok(());
        }

        let raw_len = accumulated.len();
        let filtered = self.filter_owned(accumulated)?;
        if filtered > 0 {
            let payload = self.read_cache.take();
            self.cache.replace_with(payload);
        }
        // may now hold decrypted content
        self.cache.mark_sensitive();

        debug!(raw_len, filtered, "payload cache filled");
        Ok(())
    }
}

impl ByteSource for FilterChainByteStream {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        FilterChainByteStream::read(self, buf)
    }

    fn at_end(&self) -> bool {
        self.is_exhausted()
    }
}

impl io::Read for FilterChainByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        FilterChainByteStream::read(self, buf).map_err(io::Error::from)
    }
}
