// src/source.rs
//! The underlying byte source a chain pulls from

use std::io::{ErrorKind, Read};

use crate::error::Result;

/// A forward-only byte source
///
/// `read_bytes` returning 0 while `at_end` is false is a stall: nothing is
/// available right now, but the stream is not finished.
pub trait ByteSource {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn at_end(&self) -> bool;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_bytes(buf)
    }

    fn at_end(&self) -> bool {
        (**self).at_end()
    }
}

/// Adapts any [`Read`] into a [`ByteSource`]
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, eof: false }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.eof || buf.is_empty() {
            return Ok(0);
        }
        loop {
            match self.inner.read(buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(0);
                }
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(0),
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn at_end(&self) -> bool {
        self.eof
    }
}
