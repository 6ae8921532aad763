//! Protocol error taxonomy
//!
//! Every error is reported to the host as one `~ERR#` frame whose payload
//! is the `Display` text below. None of them stop the device.

use core::fmt;

use picopaper_protocol::{DrawTextError, IdentityError};

/// Errors while turning raw characters into protocol bytes
///
/// The framer is re-armed for the next `:hh` triplet afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FramingError {
    /// A byte other than the start character arrived while waiting for one
    UnexpectedCharacter(u8),
    /// The two characters after a start character were not hex digits
    InvalidHexPair([u8; 2]),
}

/// Errors while interpreting a command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// The byte is not a known command code
    UnsupportedCommand(u8),
}

/// Errors in a multi-byte payload
///
/// The active function returns to idle afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// The draw-string accumulator filled up without an end marker
    DrawStringOverflow,
    /// The draw-string request could not be decoded
    DrawText(DrawTextError),
    /// An image byte arrived with the frame buffer already full
    ImageOverrun,
    /// The identity document does not fit a response
    Identity(IdentityError),
}

/// Any error reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    Framing(FramingError),
    Dispatch(DispatchError),
    Payload(PayloadError),
    /// The display collaborator reported a failure
    Render,
}

impl From<FramingError> for ProtocolError {
    fn from(e: FramingError) -> Self {
        ProtocolError::Framing(e)
    }
}

impl From<DispatchError> for ProtocolError {
    fn from(e: DispatchError) -> Self {
        ProtocolError::Dispatch(e)
    }
}

impl From<PayloadError> for ProtocolError {
    fn from(e: PayloadError) -> Self {
        ProtocolError::Payload(e)
    }
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingError::UnexpectedCharacter(c) if c.is_ascii() => {
                write!(f, "Unexpected Character: {}", char::from(*c))
            }
            // Keep the payload one byte per character on the wire
            FramingError::UnexpectedCharacter(c) => {
                write!(f, "Unexpected Character: \\x{:02x}", c)
            }
            FramingError::InvalidHexPair(_) => {
                f.write_str("Failed to parse hex characters to a byte")
            }
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnsupportedCommand(code) => {
                write!(f, "Unsupported command: 0x{:02x}", code)
            }
        }
    }
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::DrawStringOverflow => f.write_str("DrawString buffer overflow"),
            PayloadError::DrawText(e) => e.fmt(f),
            PayloadError::ImageOverrun => f.write_str("Image buffer overrun"),
            PayloadError::Identity(e) => e.fmt(f),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Framing(e) => e.fmt(f),
            ProtocolError::Dispatch(e) => e.fmt(f),
            ProtocolError::Payload(e) => e.fmt(f),
            ProtocolError::Render => f.write_str("Render failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use heapless::String;

    fn text(e: ProtocolError) -> String<64> {
        let mut s = String::new();
        write!(s, "{}", e).unwrap();
        s
    }

    #[test]
    fn test_error_payloads() {
        assert_eq!(
            text(FramingError::UnexpectedCharacter(b'x').into()).as_str(),
            "Unexpected Character: x"
        );
        assert_eq!(
            text(FramingError::UnexpectedCharacter(0xE9).into()).as_str(),
            "Unexpected Character: \\xe9"
        );
        assert_eq!(
            text(FramingError::InvalidHexPair(*b"zz").into()).as_str(),
            "Failed to parse hex characters to a byte"
        );
        assert_eq!(
            text(DispatchError::UnsupportedCommand(0x2a).into()).as_str(),
            "Unsupported command: 0x2a"
        );
        assert_eq!(
            text(PayloadError::DrawStringOverflow.into()).as_str(),
            "DrawString buffer overflow"
        );
        assert_eq!(
            text(PayloadError::DrawText(DrawTextError::StringTooLong(245)).into()).as_str(),
            "String too long"
        );
        assert_eq!(text(ProtocolError::Render).as_str(), "Render failed");
    }
}
