//! Draw-text sub-protocol
//!
//! After the `DrawString` command, the host sends fixed-width ASCII fields,
//! the content and an end marker, each byte hex-encoded like any other:
//!
//! ```text
//! ┌─────┬─────┬──────┬────┬────┬─────┬──────────────┬────┐
//! │ XXX │ YYY │ FONT │ FG │ BG │ LEN │ CONTENT      │ ^\n│
//! │ 3   │ 3   │ 2    │ 1  │ 1  │ 3   │ LEN bytes    │ 2  │
//! └─────┴─────┴──────┴────┴────┴─────┴──────────────┴────┘
//! ```
//!
//! Colours are `1` for black and `0` for white. Content is raw bytes, not
//! terminated. A `\n` preceded by `^` inside the content ends the request
//! early, so the host refuses to encode newlines.

use core::fmt;

use heapless::Vec;

use crate::response::END_MARKER;

/// Capacity of the device-side accumulator
pub const ACCUMULATOR_CAPACITY: usize = 255;

/// Length of the fixed-width header before the content
pub const HEADER_LEN: usize = 13;

/// Length of the `^\n` end marker
pub const END_LEN: usize = 2;

/// Content lengths at or above this value are rejected
pub const CONTENT_LIMIT: u16 = 240;

/// Largest content length that fits in the accumulator
pub const MAX_CONTENT_LEN: usize = CONTENT_LIMIT as usize - 1;

/// Header fields in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    X,
    Y,
    Font,
    Foreground,
    Background,
    Length,
}

impl Field {
    /// Byte offset of the field in the header
    pub const fn offset(self) -> usize {
        match self {
            Field::X => 0,
            Field::Y => 3,
            Field::Font => 6,
            Field::Foreground => 8,
            Field::Background => 9,
            Field::Length => 10,
        }
    }

    /// Width of the field in ASCII digits
    pub const fn width(self) -> usize {
        match self {
            Field::X | Field::Y | Field::Length => 3,
            Field::Font => 2,
            Field::Foreground | Field::Background => 1,
        }
    }

    /// Human readable field name used in error payloads
    pub fn name(self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::Font => "font",
            Field::Foreground => "color",
            Field::Background => "bgColor",
            Field::Length => "stringLength",
        }
    }

    /// Largest value the field can carry
    const fn max_value(self) -> u16 {
        match self.width() {
            1 => 9,
            2 => 99,
            _ => 999,
        }
    }
}

/// Supported font sizes (selector value is the glyph height in pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSize {
    Px8,
    Px12,
    Px16,
    Px20,
    Px24,
}

impl FontSize {
    /// Map a two-digit selector to a font size
    pub fn from_selector(selector: u16) -> Option<Self> {
        match selector {
            8 => Some(FontSize::Px8),
            12 => Some(FontSize::Px12),
            16 => Some(FontSize::Px16),
            20 => Some(FontSize::Px20),
            24 => Some(FontSize::Px24),
            _ => None,
        }
    }

    /// Selector value sent on the wire
    pub fn selector(self) -> u8 {
        match self {
            FontSize::Px8 => 8,
            FontSize::Px12 => 12,
            FontSize::Px16 => 16,
            FontSize::Px20 => 20,
            FontSize::Px24 => 24,
        }
    }
}

/// Text colour on a black and white panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextColor {
    White,
    Black,
}

impl TextColor {
    /// Map a colour digit (`1` black, `0` white)
    pub fn from_digit(digit: u16) -> Option<Self> {
        match digit {
            0 => Some(TextColor::White),
            1 => Some(TextColor::Black),
            _ => None,
        }
    }

    /// Digit sent on the wire
    pub fn digit(self) -> u8 {
        match self {
            TextColor::White => 0,
            TextColor::Black => 1,
        }
    }
}

/// Errors decoding or encoding a draw-text request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawTextError {
    /// A fixed-width field contained a non-digit character
    InvalidDigits(Field),
    /// A field value is outside its allowed set
    InvalidValue(Field),
    /// Content length is at or above [`CONTENT_LIMIT`]
    StringTooLong(u16),
    /// The request ended before the header or the declared content
    Truncated,
    /// Content contains a newline, which would break framing
    NewlineInContent,
}

impl fmt::Display for DrawTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawTextError::InvalidDigits(field) | DrawTextError::InvalidValue(field) => {
                write!(f, "Invalid {} field", field.name())
            }
            DrawTextError::StringTooLong(_) => f.write_str("String too long"),
            DrawTextError::Truncated => f.write_str("DrawString payload truncated"),
            DrawTextError::NewlineInContent => f.write_str("Newline in DrawString content"),
        }
    }
}

/// A decoded draw-text request
///
/// Borrows its content from the accumulator it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawText<'a> {
    /// Left edge in pixels
    pub x: u16,
    /// Top edge in pixels
    pub y: u16,
    /// Font size
    pub font: FontSize,
    /// Glyph colour
    pub foreground: TextColor,
    /// Glyph cell background colour
    pub background: TextColor,
    /// Raw content bytes
    pub content: &'a [u8],
}

/// Decode a fixed-width decimal field
fn decode_field(header: &[u8], field: Field) -> Result<u16, DrawTextError> {
    let digits = &header[field.offset()..field.offset() + field.width()];
    digits.iter().try_fold(0u16, |acc, &c| {
        if c.is_ascii_digit() {
            Ok(acc * 10 + u16::from(c - b'0'))
        } else {
            Err(DrawTextError::InvalidDigits(field))
        }
    })
}

impl<'a> DrawText<'a> {
    /// Decode a complete request as collected by the device
    ///
    /// `request` holds everything received after the command byte, up to
    /// and including the `^\n` end marker.
    pub fn decode(request: &'a [u8]) -> Result<Self, DrawTextError> {
        let body = request
            .strip_suffix(&[END_MARKER, b'\n'])
            .unwrap_or(request);
        if body.len() < HEADER_LEN {
            return Err(DrawTextError::Truncated);
        }
        let (header, rest) = body.split_at(HEADER_LEN);

        let x = decode_field(header, Field::X)?;
        let y = decode_field(header, Field::Y)?;
        let font = decode_field(header, Field::Font)?;
        let foreground = decode_field(header, Field::Foreground)?;
        let background = decode_field(header, Field::Background)?;
        let length = decode_field(header, Field::Length)?;

        if length >= CONTENT_LIMIT {
            return Err(DrawTextError::StringTooLong(length));
        }

        let font = FontSize::from_selector(font).ok_or(DrawTextError::InvalidValue(Field::Font))?;
        let foreground = TextColor::from_digit(foreground)
            .ok_or(DrawTextError::InvalidValue(Field::Foreground))?;
        let background = TextColor::from_digit(background)
            .ok_or(DrawTextError::InvalidValue(Field::Background))?;

        let content = rest
            .get(..length as usize)
            .ok_or(DrawTextError::Truncated)?;

        Ok(Self {
            x,
            y,
            font,
            foreground,
            background,
            content,
        })
    }

    /// Encode the request as sent by the host, including the end marker
    pub fn encode(&self) -> Result<Vec<u8, ACCUMULATOR_CAPACITY>, DrawTextError> {
        if self.x > Field::X.max_value() {
            return Err(DrawTextError::InvalidValue(Field::X));
        }
        if self.y > Field::Y.max_value() {
            return Err(DrawTextError::InvalidValue(Field::Y));
        }
        if self.content.len() > MAX_CONTENT_LEN {
            return Err(DrawTextError::StringTooLong(self.content.len() as u16));
        }
        if self.content.contains(&b'\n') {
            return Err(DrawTextError::NewlineInContent);
        }

        let mut out = Vec::new();
        push_decimal(&mut out, self.x, Field::X)?;
        push_decimal(&mut out, self.y, Field::Y)?;
        push_decimal(&mut out, u16::from(self.font.selector()), Field::Font)?;
        push_decimal(&mut out, u16::from(self.foreground.digit()), Field::Foreground)?;
        push_decimal(&mut out, u16::from(self.background.digit()), Field::Background)?;
        push_decimal(&mut out, self.content.len() as u16, Field::Length)?;
        out.extend_from_slice(self.content)
            .map_err(|_| DrawTextError::StringTooLong(self.content.len() as u16))?;
        out.extend_from_slice(&[END_MARKER, b'\n'])
            .map_err(|_| DrawTextError::StringTooLong(self.content.len() as u16))?;
        Ok(out)
    }
}

/// Append `value` as zero-padded decimal of the field's width
fn push_decimal(
    out: &mut Vec<u8, ACCUMULATOR_CAPACITY>,
    value: u16,
    field: Field,
) -> Result<(), DrawTextError> {
    let mut digits = [b'0'; 3];
    let width = field.width();
    let mut rest = value;
    for slot in digits[..width].iter_mut().rev() {
        *slot = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    if rest != 0 {
        return Err(DrawTextError::InvalidValue(field));
    }
    out.extend_from_slice(&digits[..width])
        .map_err(|_| DrawTextError::InvalidValue(field))
}
