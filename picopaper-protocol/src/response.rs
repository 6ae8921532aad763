//! Response frames sent by the device
//!
//! Frame format:
//! - MARKER (5 bytes): `~ACK#`, `~ERR#` or `~DBG#`
//! - PAYLOAD (any length): unescaped text
//! - TERMINATOR (2 bytes): `^` followed by `\n`
//!
//! A payload that itself contains `^\n` ends the frame early on the host
//! side. Payloads are produced by the firmware from trusted strings.

use core::fmt;

use heapless::Vec;

/// Acknowledgement frame marker
pub const ACK_MARKER: &str = "~ACK#";

/// Error frame marker
pub const ERROR_MARKER: &str = "~ERR#";

/// Debug frame marker
pub const DEBUG_MARKER: &str = "~DBG#";

/// Length of every frame marker
pub const MARKER_LEN: usize = 5;

/// Frame terminator
pub const TERMINATOR: &str = "^\n";

/// First byte of the terminator, also used by the draw-text sub-protocol
pub const END_MARKER: u8 = b'^';

/// Maximum payload the host-side parser buffers
pub const MAX_RESPONSE_PAYLOAD: usize = 512;

/// Class of a response frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseKind {
    /// Command completed
    Ack,
    /// Command or framing failed
    Error,
    /// Diagnostic text
    Debug,
}

impl ResponseKind {
    /// Marker that opens a frame of this kind
    pub fn marker(self) -> &'static str {
        match self {
            ResponseKind::Ack => ACK_MARKER,
            ResponseKind::Error => ERROR_MARKER,
            ResponseKind::Debug => DEBUG_MARKER,
        }
    }

    fn from_marker(marker: &[u8]) -> Option<Self> {
        [ResponseKind::Ack, ResponseKind::Error, ResponseKind::Debug]
            .into_iter()
            .find(|kind| kind.marker().as_bytes() == marker)
    }
}

/// Fixed acknowledgement payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckMessage {
    /// A complete bitmap has been received
    ImageReceived,
    /// The panel has been cleared
    DisplayCleared,
    /// The splash screen is showing
    SplashShown,
    /// The frame buffer has been shown, or text drawn into it
    Displayed,
}

impl AckMessage {
    /// Payload text of this acknowledgement
    pub fn as_str(self) -> &'static str {
        match self {
            AckMessage::ImageReceived => "IMG_RCVD",
            AckMessage::DisplayCleared => "CLR_SCR",
            AckMessage::SplashShown => "SPLASH",
            AckMessage::Displayed => "DISPLAY",
        }
    }
}

impl fmt::Display for AckMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write one complete frame to `out`
pub fn write_frame<W, P>(out: &mut W, kind: ResponseKind, payload: &P) -> fmt::Result
where
    W: fmt::Write,
    P: fmt::Display + ?Sized,
{
    out.write_str(kind.marker())?;
    write!(out, "{}", payload)?;
    out.write_str(TERMINATOR)
}

/// Errors from the host-side response parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseError {
    /// Payload exceeded [`MAX_RESPONSE_PAYLOAD`] before a terminator arrived
    PayloadTooLong,
}

/// A frame received from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    /// Frame class
    pub kind: ResponseKind,
    /// Payload without marker and terminator
    pub payload: Vec<u8, MAX_RESPONSE_PAYLOAD>,
}

impl ResponseFrame {
    /// Payload as text, if it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }

    /// Returns true if this is an ACK carrying exactly `message`
    pub fn is_ack(&self, message: AckMessage) -> bool {
        self.kind == ResponseKind::Ack && self.payload.as_slice() == message.as_str().as_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Skipping bytes until `~`
    Hunting,
    /// Matching the rest of a marker
    Marker,
    /// Collecting payload bytes until `^\n`
    Payload(ResponseKind),
}

/// State machine for parsing device responses on the host
///
/// Bytes outside of frames (boot banners, echo) are skipped.
#[derive(Debug, Clone)]
pub struct ResponseParser {
    state: ParseState,
    marker: Vec<u8, MARKER_LEN>,
    payload: Vec<u8, MAX_RESPONSE_PAYLOAD>,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    /// Create a new response parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Hunting,
            marker: Vec::new(),
            payload: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::Hunting;
        self.marker.clear();
        self.payload.clear();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a terminator completes a frame,
    /// `Ok(None)` when more bytes are needed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<ResponseFrame>, ResponseError> {
        match self.state {
            ParseState::Hunting => {
                if byte == b'~' {
                    self.start_marker();
                }
                Ok(None)
            }
            ParseState::Marker => {
                if byte == b'~' {
                    self.start_marker();
                    return Ok(None);
                }
                // Cannot overflow: the marker is checked once it is full
                let _ = self.marker.push(byte);
                let is_prefix = [ACK_MARKER, ERROR_MARKER, DEBUG_MARKER]
                    .iter()
                    .any(|m| m.as_bytes().starts_with(&self.marker));
                if !is_prefix {
                    self.reset();
                } else if self.marker.len() == MARKER_LEN {
                    match ResponseKind::from_marker(&self.marker) {
                        Some(kind) => {
                            self.payload.clear();
                            self.state = ParseState::Payload(kind);
                        }
                        None => self.reset(),
                    }
                }
                Ok(None)
            }
            ParseState::Payload(kind) => {
                if byte == b'\n' && self.payload.last() == Some(&END_MARKER) {
                    self.payload.pop();
                    let frame = ResponseFrame {
                        kind,
                        payload: self.payload.clone(),
                    };
                    self.reset();
                    return Ok(Some(frame));
                }
                if self.payload.push(byte).is_err() {
                    self.reset();
                    return Err(ResponseError::PayloadTooLong);
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<ResponseFrame>, ResponseError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn start_marker(&mut self) {
        self.marker.clear();
        let _ = self.marker.push(b'~');
        self.state = ParseState::Marker;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[test]
    fn test_write_ack_frame() {
        let mut out: String<32> = String::new();
        write_frame(&mut out, ResponseKind::Ack, &AckMessage::ImageReceived).unwrap();
        assert_eq!(out.as_str(), "~ACK#IMG_RCVD^\n");
    }

    #[test]
    fn test_write_error_frame_with_formatted_payload() {
        let mut out: String<48> = String::new();
        write_frame(&mut out, ResponseKind::Error, &format_args!("Unsupported command: 0x{:02x}", 7))
            .unwrap();
        assert_eq!(out.as_str(), "~ERR#Unsupported command: 0x07^\n");
    }

    #[test]
    fn test_write_debug_frame() {
        let mut out: String<32> = String::new();
        write_frame(&mut out, ResponseKind::Debug, "hello").unwrap();
        assert_eq!(out.as_str(), "~DBG#hello^\n");
    }

    #[test]
    fn test_parse_ack() {
        let mut parser = ResponseParser::new();
        let frame = parser.feed_bytes(b"~ACK#CLR_SCR^\n").unwrap().unwrap();
        assert_eq!(frame.kind, ResponseKind::Ack);
        assert_eq!(frame.text(), Some("CLR_SCR"));
        assert!(frame.is_ack(AckMessage::DisplayCleared));
        assert!(!frame.is_ack(AckMessage::SplashShown));
    }

    #[test]
    fn test_parse_skips_noise_between_frames() {
        let mut parser = ResponseParser::new();
        let frame = parser
            .feed_bytes(b"boot ok\r\n~X~~ERR#String too long^\n")
            .unwrap()
            .unwrap();
        assert_eq!(frame.kind, ResponseKind::Error);
        assert_eq!(frame.text(), Some("String too long"));
    }

    #[test]
    fn test_caret_inside_payload() {
        let mut parser = ResponseParser::new();
        let frame = parser.feed_bytes(b"~DBG#a^b^\n").unwrap().unwrap();
        assert_eq!(frame.text(), Some("a^b"));
    }

    #[test]
    fn test_unknown_marker_is_ignored() {
        let mut parser = ResponseParser::new();
        assert_eq!(parser.feed_bytes(b"~NAK#x^\n"), Ok(None));
        let frame = parser.feed_bytes(b"~ACK#SPLASH^\n").unwrap().unwrap();
        assert!(frame.is_ack(AckMessage::SplashShown));
    }

    #[test]
    fn test_payload_too_long() {
        let mut parser = ResponseParser::new();
        parser.feed_bytes(b"~DBG#").unwrap();
        let mut result = Ok(None);
        for _ in 0..=MAX_RESPONSE_PAYLOAD {
            result = parser.feed(b'x');
            if result.is_err() {
                break;
            }
        }
        assert_eq!(result, Err(ResponseError::PayloadTooLong));
        // Parser recovers for the next frame
        let frame = parser.feed_bytes(b"~ACK#DISPLAY^\n").unwrap().unwrap();
        assert!(frame.is_ack(AckMessage::Displayed));
    }

    #[test]
    fn test_consecutive_frames() {
        let mut parser = ResponseParser::new();
        let data = b"~ACK#IMG_RCVD^\n~ACK#DISPLAY^\n";
        let first = parser.feed_bytes(&data[..15]).unwrap().unwrap();
        assert!(first.is_ack(AckMessage::ImageReceived));
        let second = parser.feed_bytes(&data[15..]).unwrap().unwrap();
        assert!(second.is_ack(AckMessage::Displayed));
    }
}
