//! Draw-string receiver
//!
//! Collects the text sub-protocol after a DrawString command until the
//! `^\n` end marker, bounded by a fixed accumulator.

use heapless::Vec;
use picopaper_protocol::draw_text::ACCUMULATOR_CAPACITY;
use picopaper_protocol::response::END_MARKER;

use crate::error::PayloadError;

/// Bounded buffer for one draw-string request
#[derive(Debug, Clone, Default)]
pub struct DrawStringAccumulator {
    buf: Vec<u8, ACCUMULATOR_CAPACITY>,
}

impl DrawStringAccumulator {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Discard everything collected so far
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Bytes collected so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The collected request
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Append one byte
    ///
    /// Returns `Ok(true)` once the byte completes the end marker.
    pub fn push(&mut self, byte: u8) -> Result<bool, PayloadError> {
        self.buf
            .push(byte)
            .map_err(|_| PayloadError::DrawStringOverflow)?;
        Ok(self.is_complete())
    }

    fn is_complete(&self) -> bool {
        self.buf.ends_with(&[END_MARKER, b'\n'])
    }
}
