//! Splash screen layout
//!
//! Branding, the identity block and a waiting message inside a double
//! border. Coordinates are laid out for the 800 x 480 panel; smaller
//! geometries clip.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use heapless::String;
use picopaper_protocol::{DeviceIdentity, FontSize, SerialId};

use crate::text::{label, short_string};

const TITLE: &str = "Pico Paper";
const COPYRIGHT: &str = "(c) 2025 DevOats";
const WAITING: &str = "Waiting for the PicoPaper connection to upload an image...";

/// Left column of the identity block
const KEY_X: i32 = 300;
/// Value column of the identity block
const VALUE_X: i32 = 400;
/// Key column of the nested display block
const DISPLAY_KEY_X: i32 = 325;
/// Value column of the nested display block
const DISPLAY_VALUE_X: i32 = 450;
/// Vertical distance between identity lines
const LINE_HEIGHT: i32 = 15;

fn stroke(width: u32) -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_stroke(BinaryColor::On, width)
}

/// Draw the splash screen onto a white target
pub fn draw<D>(target: &mut D, identity: &DeviceIdentity, serial: &SerialId) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let size = target.size();
    let (width, height) = (size.width as i32, size.height as i32);

    // Title box
    Rectangle::with_corners(Point::new(300, 100), Point::new(500, 140))
        .into_styled(stroke(3))
        .draw(target)?;
    label(target, 315, 110, FontSize::Px24, TITLE)?;
    label(target, 310, 160, FontSize::Px16, COPYRIGHT)?;

    // Tree lines joining the identity block
    Line::new(Point::new(295, 240), Point::new(295, 370))
        .into_styled(stroke(1))
        .draw(target)?;
    Line::new(Point::new(320, 300), Point::new(320, 370))
        .into_styled(stroke(1))
        .draw(target)?;

    let id = serial.to_hex();
    let top = 240;
    let rows: [(&str, &str); 3] = [
        ("Version:", identity.version),
        ("Board:", identity.board),
        ("ID:", id.as_str()),
    ];
    for (i, (key, value)) in rows.iter().enumerate() {
        let y = top + LINE_HEIGHT * i as i32;
        label(target, KEY_X, y, FontSize::Px12, key)?;
        label(target, VALUE_X, y, FontSize::Px12, value)?;
    }
    label(target, KEY_X, top + LINE_HEIGHT * 3, FontSize::Px12, "Display:")?;

    let display = &identity.display;
    let resolution: String<16> =
        short_string(format_args!("{} x {}", display.width, display.height));
    let details: [(&str, &str); 5] = [
        ("Type:", display.kind),
        ("Size:", display.size),
        ("Color:", display.color),
        ("PixelFormat:", display.format),
        ("Resolution:", resolution.as_str()),
    ];
    for (i, (key, value)) in details.iter().enumerate() {
        let y = 300 + LINE_HEIGHT * i as i32;
        label(target, DISPLAY_KEY_X, y, FontSize::Px12, key)?;
        label(target, DISPLAY_VALUE_X, y, FontSize::Px12, value)?;
    }

    label(target, 195, 450, FontSize::Px12, WAITING)?;

    // Double border
    Rectangle::with_corners(Point::new(1, 1), Point::new(width - 1, height - 1))
        .into_styled(stroke(1))
        .draw(target)?;
    Rectangle::with_corners(Point::new(5, 5), Point::new(width - 5, height - 5))
        .into_styled(stroke(3))
        .draw(target)?;

    Ok(())
}
