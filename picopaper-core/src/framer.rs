//! Byte framer
//!
//! Turns the raw character stream into protocol bytes. Every protocol byte
//! is a `:` followed by two hex digits; a `/` re-arms the whole device.

use picopaper_protocol::wire::{decode_hex_pair, HEX_PAIR_LEN};
use picopaper_protocol::{RESET_CHAR, START_CHAR};

use crate::error::FramingError;

/// Framer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameState {
    /// Waiting for the start character
    AwaitingStart,
    /// Collecting the two hex characters after a start character
    AccumulatingHexPair,
}

/// Result of feeding one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramerOutput {
    /// The reset character was seen; everything above the framer must re-arm
    Reset,
    /// A complete hex pair was decoded
    Byte(u8),
}

/// State machine for the `:hh` framing layer
#[derive(Debug, Clone)]
pub struct ByteFramer {
    state: FrameState,
    pair: [u8; HEX_PAIR_LEN],
    len: usize,
}

impl Default for ByteFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteFramer {
    /// Create a framer waiting for a start character
    pub const fn new() -> Self {
        Self {
            state: FrameState::AwaitingStart,
            pair: [0; HEX_PAIR_LEN],
            len: 0,
        }
    }

    /// Current framing state
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Number of hex characters collected for the current pair
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Return to [`FrameState::AwaitingStart`] with an empty pair
    pub fn reset(&mut self) {
        self.state = FrameState::AwaitingStart;
        self.len = 0;
    }

    /// Feed a single character
    ///
    /// Returns `Ok(None)` while more characters are needed. Errors leave
    /// the framer re-armed for the next triplet.
    pub fn feed(&mut self, byte: u8) -> Result<Option<FramerOutput>, FramingError> {
        if byte == RESET_CHAR {
            self.reset();
            return Ok(Some(FramerOutput::Reset));
        }

        match self.state {
            FrameState::AwaitingStart => {
                if byte == START_CHAR {
                    self.state = FrameState::AccumulatingHexPair;
                    self.len = 0;
                    Ok(None)
                } else {
                    Err(FramingError::UnexpectedCharacter(byte))
                }
            }
            FrameState::AccumulatingHexPair => {
                if byte == START_CHAR {
                    // A fresh start abandons the partial pair
                    self.len = 0;
                    return Ok(None);
                }

                self.pair[self.len] = byte;
                self.len += 1;
                if self.len < HEX_PAIR_LEN {
                    return Ok(None);
                }

                let pair = self.pair;
                self.reset();
                decode_hex_pair(pair)
                    .map(|value| Some(FramerOutput::Byte(value)))
                    .ok_or(FramingError::InvalidHexPair(pair))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all(framer: &mut ByteFramer, input: &[u8]) -> Option<FramerOutput> {
        let mut last = None;
        for &b in input {
            last = framer.feed(b).unwrap();
        }
        last
    }

    #[test]
    fn test_decodes_triplet() {
        let mut framer = ByteFramer::new();
        assert_eq!(feed_all(&mut framer, b":2a"), Some(FramerOutput::Byte(0x2a)));
        assert_eq!(framer.state(), FrameState::AwaitingStart);
        assert_eq!(feed_all(&mut framer, b":FF"), Some(FramerOutput::Byte(0xff)));
    }

    #[test]
    fn test_unexpected_character_keeps_state() {
        let mut framer = ByteFramer::new();
        assert_eq!(
            framer.feed(b'x'),
            Err(FramingError::UnexpectedCharacter(b'x'))
        );
        assert_eq!(framer.state(), FrameState::AwaitingStart);
        assert_eq!(feed_all(&mut framer, b":01"), Some(FramerOutput::Byte(0x01)));
    }

    #[test]
    fn test_invalid_pair_rearms() {
        let mut framer = ByteFramer::new();
        framer.feed(b':').unwrap();
        framer.feed(b'g').unwrap();
        assert_eq!(framer.feed(b'1'), Err(FramingError::InvalidHexPair(*b"g1")));
        assert_eq!(framer.state(), FrameState::AwaitingStart);
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn test_start_mid_pair_restarts() {
        let mut framer = ByteFramer::new();
        framer.feed(b':').unwrap();
        framer.feed(b'1').unwrap();
        assert_eq!(framer.feed(b':'), Ok(None));
        assert_eq!(framer.pending(), 0);
        assert_eq!(feed_all(&mut framer, b"23"), Some(FramerOutput::Byte(0x23)));
    }

    #[test]
    fn test_reset_in_any_state() {
        let mut framer = ByteFramer::new();
        assert_eq!(framer.feed(b'/'), Ok(Some(FramerOutput::Reset)));

        framer.feed(b':').unwrap();
        framer.feed(b'a').unwrap();
        assert_eq!(framer.feed(b'/'), Ok(Some(FramerOutput::Reset)));
        assert_eq!(framer.state(), FrameState::AwaitingStart);
        assert_eq!(framer.pending(), 0);
    }

    proptest! {
        #[test]
        fn prop_every_byte_survives_framing(byte in any::<u8>()) {
            let mut framer = ByteFramer::new();
            let encoded = picopaper_protocol::wire::encode_byte(byte);
            prop_assert_eq!(feed_all(&mut framer, &encoded), Some(FramerOutput::Byte(byte)));
        }

        #[test]
        fn prop_uppercase_pairs_decode(byte in any::<u8>()) {
            let mut framer = ByteFramer::new();
            let mut text = heapless::String::<3>::new();
            core::fmt::Write::write_fmt(&mut text, format_args!(":{:02X}", byte)).unwrap();
            prop_assert_eq!(feed_all(&mut framer, text.as_bytes()), Some(FramerOutput::Byte(byte)));
        }
    }
}
