//! Draw-string rendering
//!
//! Font selectors map to the closest built-in monospace font. Content bytes
//! are mapped 1:1 to characters; glyphs missing from the font render as the
//! font's replacement character.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_5X8, FONT_6X12, FONT_9X15, FONT_9X18};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use picopaper_protocol::draw_text::MAX_CONTENT_LEN;
use picopaper_protocol::{DrawText, FontSize, TextColor};

/// Every content byte becomes at most two UTF-8 bytes
const TEXT_CAPACITY: usize = MAX_CONTENT_LEN * 2;

/// Font used for a selector
pub fn font_for(size: FontSize) -> &'static MonoFont<'static> {
    match size {
        FontSize::Px8 => &FONT_5X8,
        FontSize::Px12 => &FONT_6X12,
        FontSize::Px16 => &FONT_9X15,
        FontSize::Px20 => &FONT_9X18,
        FontSize::Px24 => &FONT_10X20,
    }
}

/// Ink colour for a protocol colour digit
pub fn ink(color: TextColor) -> BinaryColor {
    match color {
        TextColor::Black => BinaryColor::On,
        TextColor::White => BinaryColor::Off,
    }
}

/// Text style for a font and colour pair
pub fn style(
    font: &'static MonoFont<'static>,
    foreground: TextColor,
    background: TextColor,
) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(ink(foreground))
        .background_color(ink(background))
        .build()
}

/// Decode content bytes as Latin-1
fn latin1(content: &[u8]) -> String<TEXT_CAPACITY> {
    let mut out = String::new();
    for &byte in content.iter().take(MAX_CONTENT_LEN) {
        // Capacity covers the worst case for MAX_CONTENT_LEN bytes
        let _ = out.push(char::from(byte));
    }
    out
}

/// Draw a request with its top-left corner at `(x, y)`
pub fn draw<D>(target: &mut D, request: &DrawText<'_>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text = latin1(request.content);
    let position = Point::new(i32::from(request.x), i32::from(request.y));
    let style = style(font_for(request.font), request.foreground, request.background);
    Text::with_baseline(&text, position, style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Draw a single line of static text, black on white
pub fn label<D>(target: &mut D, x: i32, y: i32, size: FontSize, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = style(font_for(size), TextColor::Black, TextColor::White);
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Format `args` into a short stack string, truncating on overflow
pub fn short_string<const N: usize>(args: core::fmt::Arguments<'_>) -> String<N> {
    let mut out = String::new();
    let _ = out.write_fmt(args);
    out
}
