// src/config/defaults.rs
use crate::config::app::{Buffers, Limits};
use crate::consts::DEFAULT_ACCUMULATE_CHUNK_SIZE;

pub fn default_accumulate_chunk_size() -> usize {
    DEFAULT_ACCUMULATE_CHUNK_SIZE
}

pub fn default_buffers() -> Buffers {
    Buffers {
        accumulate_chunk_size: default_accumulate_chunk_size(),
    }
}

pub fn default_limits() -> Limits {
    Limits {
        max_payload_size: None,
    }
}
