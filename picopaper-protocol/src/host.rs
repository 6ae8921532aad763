//! Host-side encoding
//!
//! Turns commands and payload bytes into the ASCII stream the device
//! expects. Used by the host utility and by device-side tests.

use crate::command::Command;
use crate::draw_text::{DrawText, DrawTextError};
use crate::wire::{encode_byte, ENCODED_BYTE_LEN, RESET_CHAR};

/// The reset sequence
pub fn reset() -> [u8; 1] {
    [RESET_CHAR]
}

/// Encode a command byte
pub fn command(cmd: Command) -> [u8; ENCODED_BYTE_LEN] {
    encode_byte(cmd.to_byte())
}

/// Encode arbitrary payload bytes
pub fn encode(data: &[u8]) -> Encoded<'_> {
    Encoded {
        data,
        index: 0,
        pos: 0,
    }
}

/// Iterator over the wire characters for a byte slice
#[derive(Debug, Clone)]
pub struct Encoded<'a> {
    data: &'a [u8],
    index: usize,
    pos: usize,
}

impl Iterator for Encoded<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.index)?;
        let c = encode_byte(byte)[self.pos];
        self.pos += 1;
        if self.pos == ENCODED_BYTE_LEN {
            self.pos = 0;
            self.index += 1;
        }
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.data.len() - self.index) * ENCODED_BYTE_LEN - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Encoded<'_> {}

/// Encode a packed bitmap upload: the command followed by every image byte
pub fn image_upload(image: &[u8]) -> impl Iterator<Item = u8> + '_ {
    command(Command::BeginImageUpload).into_iter().chain(encode(image))
}

/// Encode a draw-text request: the command, fixed-width fields, content and end marker
pub fn draw_text(text: &DrawText<'_>) -> Result<impl Iterator<Item = u8>, DrawTextError> {
    let payload = text.encode()?;
    let encoded = payload
        .into_iter()
        .flat_map(encode_byte);
    Ok(command(Command::DrawString).into_iter().chain(encoded))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::draw_text::{FontSize, TextColor};
    use std::vec::Vec;

    #[test]
    fn test_command_encoding() {
        assert_eq!(&command(Command::Identify), b":01");
        assert_eq!(&command(Command::ShowSplash), b":05");
        assert_eq!(reset(), [b'/']);
    }

    #[test]
    fn test_encode_stream() {
        let encoded: Vec<u8> = encode(&[0x00, 0x7F, 0xFF]).collect();
        assert_eq!(encoded, b":00:7f:ff");
        assert_eq!(encode(&[1, 2]).len(), 6);
    }

    #[test]
    fn test_image_upload_prefix() {
        let encoded: Vec<u8> = image_upload(&[0xAA, 0x55]).collect();
        assert_eq!(encoded, b":02:aa:55");
    }

    #[test]
    fn test_draw_text_stream() {
        let text = DrawText {
            x: 1,
            y: 2,
            font: FontSize::Px12,
            foreground: TextColor::Black,
            background: TextColor::White,
            content: b"A",
        };
        let encoded: Vec<u8> = draw_text(&text).unwrap().collect();
        // command + 13 header + 1 content + 2 end marker
        assert_eq!(encoded.len(), 3 * (1 + 13 + 1 + 2));
        assert_eq!(&encoded[..6], b":06:30");
        assert_eq!(&encoded[encoded.len() - 6..], b":5e:0a");
    }
}
