// src/buffer.rs
//! Growable byte buffer with secure erasure
//!
//! Once a buffer is flagged sensitive, every byte that leaves its live
//! region is zeroed before the memory is released or reused. That covers
//! FIFO removal, truncation, growth (the old allocation is wiped, `Vec`
//! never reallocates on its own), replacement and drop.

use std::fmt;

use zeroize::Zeroize;

use crate::aliases::PlainText;
use crate::consts::{SECURE_BUFFER_COMPACT_THRESHOLD, SECURE_BUFFER_MIN_CAPACITY};

#[derive(Default)]
pub struct SecureBuffer {
    bytes: Vec<u8>,
    // live region is bytes[start..]
    start: usize,
    sensitive: bool,
}

impl SecureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer already flagged for secure erasure
    pub fn sensitive() -> Self {
        Self {
            bytes: Vec::new(),
            start: 0,
            sensitive: true,
        }
    }

    /// Adopt an existing allocation without copying
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            start: 0,
            sensitive: false,
        }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        let mut buf = Self::new();
        buf.append(data);
        buf
    }

    pub fn mark_sensitive(&mut self) {
        self.sensitive = true;
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn len(&self) -> usize {
        self.bytes.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[self.start..]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes[self.start..]
    }

    pub fn append(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        if self.bytes.capacity() - self.bytes.len() < data.len() {
            self.grow_for(data.len());
        }
        self.bytes.extend_from_slice(data);
    }

    /// Drop up to `n` bytes from the front (FIFO consume)
    pub fn remove_front(&mut self, n: usize) {
        let n = n.min(self.len());
        if n == 0 {
            return;
        }
        if self.sensitive {
            self.bytes[self.start..self.start + n].zeroize();
        }
        self.start += n;

        if self.start == self.bytes.len() {
            // whole vec is consumed (and already wiped)
            self.bytes.clear();
            self.start = 0;
        } else if self.start >= SECURE_BUFFER_COMPACT_THRESHOLD && self.start > self.len() {
            self.compact();
        }
    }

    /// Move the live region to the front of the allocation
    pub fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        let live = self.len();
        self.bytes.copy_within(self.start.., 0);
        self.wipe_from(live);
        self.bytes.truncate(live);
        self.start = 0;
    }

    /// Keep only the first `n` live bytes
    pub fn truncate(&mut self, n: usize) {
        if n >= self.len() {
            return;
        }
        let end = self.start + n;
        self.wipe_from(end);
        self.bytes.truncate(end);
        if n == 0 {
            self.bytes.clear();
            self.start = 0;
        }
    }

    pub fn clear(&mut self) {
        self.remove_front(self.len());
    }

    /// Copy out as much as fits in `out`, consuming it from the front
    pub fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.len());
        out[..n].copy_from_slice(&self.as_slice()[..n]);
        self.remove_front(n);
        n
    }

    /// Move the contents out, leaving an empty buffer with the same flag
    pub fn take(&mut self) -> SecureBuffer {
        SecureBuffer {
            bytes: std::mem::take(&mut self.bytes),
            start: std::mem::replace(&mut self.start, 0),
            sensitive: self.sensitive,
        }
    }

    /// Overwrite with `other`; old contents are wiped, sensitivity is sticky
    pub fn replace_with(&mut self, mut other: SecureBuffer) {
        other.sensitive |= self.sensitive;
        // the previous value runs Drop, which wipes it
        *self = other;
    }

    /// Hand the live bytes to a secure-gate secret without copying
    pub fn into_plaintext(mut self) -> PlainText {
        self.compact();
        PlainText::new(std::mem::take(&mut self.bytes))
    }

    /// Zero `bytes[end..]` ahead of a `Vec::truncate`
    fn wipe_from(&mut self, end: usize) {
        if self.sensitive {
            self.bytes[end..].zeroize();
        }
    }

    fn grow_for(&mut self, additional: usize) {
        let live = self.len();
        let needed = live + additional;
        let capacity = needed
            .max(self.bytes.capacity().saturating_mul(2))
            .max(SECURE_BUFFER_MIN_CAPACITY);

        let mut fresh = Vec::with_capacity(capacity);
        fresh.extend_from_slice(self.as_slice());
        let mut old = std::mem::replace(&mut self.bytes, fresh);
        self.start = 0;
        if self.sensitive {
            old.zeroize();
        }
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        if self.sensitive {
            self.bytes.zeroize();
        }
    }
}

impl fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBuffer")
            .field("len", &self.len())
            .field("sensitive", &self.sensitive)
            .finish_non_exhaustive()
    }
}
