//! Draw target over a packed 1bpp frame
//!
//! `BinaryColor::On` is black ink, `BinaryColor::Off` is white paper.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use picopaper_protocol::bitmap::{set_pixel, BLACK_BYTE, WHITE_BYTE};
use picopaper_protocol::Geometry;

use crate::panel::DisplayError;

/// Borrowed frame buffer that `embedded-graphics` can draw into
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    geometry: Geometry,
}

impl<'a> Canvas<'a> {
    /// Wrap `frame`, which must hold exactly one frame of `geometry`
    pub fn new(frame: &'a mut [u8], geometry: Geometry) -> Result<Self, DisplayError> {
        if frame.len() != geometry.buffer_len() {
            return Err(DisplayError::BufferSize);
        }
        Ok(Self { frame, geometry })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Negative coordinates are off-canvas
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                set_pixel(self.frame, self.geometry, x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { BLACK_BYTE } else { WHITE_BYTE };
        self.frame.fill(fill);
        Ok(())
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.geometry.width.into(), self.geometry.height.into())
    }
}
