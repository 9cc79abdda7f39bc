// tests/common.rs
//! Shared test utilities: logging setup, sample filters and sources
#![allow(dead_code)]

use std::any::Any;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use secure_filter_chain::{
    no_context, ByteSource, ChainError, ContentFilter, ContentFilterPtr, ContentItem,
    FilterContext, FilterOutput, OperatingMode, ReaderSource, Result,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize test-friendly logging
/// Call once at the start of any test that needs logs
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer()) // works in `cargo test`
        .with(EnvFilter::from_default_env()) // respects RUST_LOG=
        .try_init()
        .ok(); // idempotent, safe to call multiple times
}

pub fn item() -> ContentItem {
    ContentItem::new("chapter-1", "OEBPS/chapter1.xhtml", "application/xhtml+xml")
}

pub fn source(data: &[u8]) -> ReaderSource<Cursor<Vec<u8>>> {
    ReaderSource::new(Cursor::new(data.to_vec()))
}

pub fn ptr<F: ContentFilter + 'static>(filter: F) -> ContentFilterPtr {
    Arc::new(filter)
}

/// Read with the given request sizes, cycling the last one until EOF
pub fn read_in_steps(
    chain: &mut secure_filter_chain::FilterChainByteStream,
    sizes: &[usize],
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut i = 0;
    loop {
        let size = sizes[i.min(sizes.len() - 1)];
        i += 1;
        let mut buf = vec![0u8; size];
        let n = chain.read(&mut buf)?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buf[..n]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────────────────────────

pub struct Identity;

impl ContentFilter for Identity {
    fn name(&self) -> &str {
        "identity"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Streaming
    }
    fn make_context(&self, _item: &ContentItem) -> Result<FilterContext> {
        Ok(no_context())
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), data: &mut [u8]) -> Result<FilterOutput> {
        Ok(FilterOutput::InPlace(data.len()))
    }
}

/// Emits every byte twice (output grows, new buffer)
pub struct Doubling;

impl ContentFilter for Doubling {
    fn name(&self) -> &str {
        "doubling"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Streaming
    }
    fn make_context(&self, _item: &ContentItem) -> Result<FilterContext> {
        Ok(no_context())
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), data: &mut [u8]) -> Result<FilterOutput> {
        Ok(FilterOutput::Owned(
            data.iter().flat_map(|&b| [b, b]).collect(),
        ))
    }
}

/// Adds one to every byte in place
pub struct Increment;

impl ContentFilter for Increment {
    fn name(&self) -> &str {
        "increment"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Streaming
    }
    fn make_context(&self, _item: &ContentItem) -> Result<FilterContext> {
        Ok(no_context())
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), data: &mut [u8]) -> Result<FilterOutput> {
        data.iter_mut().for_each(|b| *b = b.wrapping_add(1));
        Ok(FilterOutput::InPlace(data.len()))
    }
}

/// Keeps the first half of each chunk (output shrinks, same buffer)
pub struct KeepFirstHalf;

impl ContentFilter for KeepFirstHalf {
    fn name(&self) -> &str {
        "keep-first-half"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Streaming
    }
    fn make_context(&self, _item: &ContentItem) -> Result<FilterContext> {
        Ok(no_context())
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), data: &mut [u8]) -> Result<FilterOutput> {
        Ok(FilterOutput::InPlace(data.len().div_ceil(2)))
    }
}

/// Reverses the whole payload; only correct on complete data
pub struct Reverse;

impl ContentFilter for Reverse {
    fn name(&self) -> &str {
        "reverse"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::RequiresCompleteData
    }
    fn make_context(&self, _item: &ContentItem) -> Result<FilterContext> {
        Ok(no_context())
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), data: &mut [u8]) -> Result<FilterOutput> {
        data.reverse();
        Ok(FilterOutput::InPlace(data.len()))
    }
}

/// Running XOR keystream; the position lives in the per-chain context
pub struct XorKeystream {
    pub key: Vec<u8>,
}

pub struct XorState {
    pub position: usize,
    pub salt: u8,
}

impl XorKeystream {
    pub fn apply(key: &[u8], salt: u8, data: &[u8]) -> Vec<u8> {
        data.iter()
            .enumerate()
            .map(|(i, b)| b ^ key[i % key.len()] ^ salt)
            .collect()
    }

    pub fn salt_for(item: &ContentItem) -> u8 {
        item.id.bytes().fold(0u8, |acc, b| acc.wrapping_add(b))
    }
}

impl ContentFilter for XorKeystream {
    fn name(&self) -> &str {
        "xor-keystream"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Streaming
    }
    fn make_context(&self, item: &ContentItem) -> Result<FilterContext> {
        Ok(Box::new(XorState {
            position: 0,
            salt: Self::salt_for(item),
        }))
    }
    fn filter_data(&self, ctx: &mut (dyn Any + Send), data: &mut [u8]) -> Result<FilterOutput> {
        let state = ctx
            .downcast_mut::<XorState>()
            .ok_or_else(|| ChainError::filter(self.name(), "unexpected context type"))?;
        for b in data.iter_mut() {
            *b ^= self.key[state.position % self.key.len()] ^ state.salt;
            state.position += 1;
        }
        Ok(FilterOutput::InPlace(data.len()))
    }
}

/// Breaks the output contract by producing nothing
pub struct NoOutput {
    pub owned: bool,
    pub mode: OperatingMode,
}

impl ContentFilter for NoOutput {
    fn name(&self) -> &str {
        "no-output"
    }
    fn operating_mode(&self) -> OperatingMode {
        self.mode
    }
    fn make_context(&self, _item: &ContentItem) -> Result<FilterContext> {
        Ok(no_context())
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), _data: &mut [u8]) -> Result<FilterOutput> {
        if self.owned {
            Ok(FilterOutput::Owned(Vec::with_capacity(32)))
        } else {
            Ok(FilterOutput::InPlace(0))
        }
    }
}

/// Claims more in-place output than it was given
pub struct Overrun;

impl ContentFilter for Overrun {
    fn name(&self) -> &str {
        "overrun"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Streaming
    }
    fn make_context(&self, _item: &ContentItem) -> Result<FilterContext> {
        Ok(no_context())
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), data: &mut [u8]) -> Result<FilterOutput> {
        Ok(FilterOutput::InPlace(data.len() + 1))
    }
}

/// Fails like a decryptor with the wrong key
pub struct Rejecting;

impl ContentFilter for Rejecting {
    fn name(&self) -> &str {
        "rejecting"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Streaming
    }
    fn make_context(&self, _item: &ContentItem) -> Result<FilterContext> {
        Ok(no_context())
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), _data: &mut [u8]) -> Result<FilterOutput> {
        Err(ChainError::filter(self.name(), "bad padding"))
    }
}

/// Cannot build a context for any item
pub struct NoContext;

impl ContentFilter for NoContext {
    fn name(&self) -> &str {
        "no-context"
    }
    fn operating_mode(&self) -> OperatingMode {
        OperatingMode::Streaming
    }
    fn make_context(&self, item: &ContentItem) -> Result<FilterContext> {
        Err(ChainError::context(
            self.name(),
            format!("no key for {}", item.href),
        ))
    }
    fn filter_data(&self, _ctx: &mut (dyn Any + Send), data: &mut [u8]) -> Result<FilterOutput> {
        Ok(FilterOutput::InPlace(data.len()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sources
// ─────────────────────────────────────────────────────────────────────────────

/// Scripted source: each step yields up to N bytes, `0` is a stall
pub struct ScriptedSource {
    data: Vec<u8>,
    pos: usize,
    steps: Vec<usize>,
    step: usize,
    pub reads: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(data: &[u8], steps: &[usize]) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            steps: steps.to_vec(),
            step: 0,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Never limits chunk size; just counts calls
    pub fn counting(data: &[u8]) -> Self {
        Self::new(data, &[usize::MAX])
    }

    pub fn reads(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }
}

impl ByteSource for ScriptedSource {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let limit = self.steps[self.step.min(self.steps.len() - 1)];
        self.step += 1;
        let n = limit.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn at_end(&self) -> bool {
        self.pos == self.data.len()
    }
}

/// `io::Read` replaying a fixed script of results, then EOF
pub struct ScriptedReader {
    script: std::collections::VecDeque<std::io::Result<Vec<u8>>>,
}

impl ScriptedReader {
    pub fn new(script: Vec<std::io::Result<Vec<u8>>>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// Interrupted, "ab", WouldBlock, "cd"
    pub fn interrupted_then_blocking() -> Self {
        use std::io::{Error, ErrorKind};
        Self::new(vec![
            Err(Error::from(ErrorKind::Interrupted)),
            Ok(b"ab".to_vec()),
            Err(Error::from(ErrorKind::WouldBlock)),
            Ok(b"cd".to_vec()),
        ])
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl std::io::Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.script.pop_front() {
            None => Ok(0),
            Some(Err(e)) => Err(e),
            Some(Ok(chunk)) => {
                assert!(chunk.len() <= buf.len(), "script chunk larger than request");
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
        }
    }
}
