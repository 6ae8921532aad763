//! Packed 1bpp bitmap layout
//!
//! Rows are packed MSB-first with a stride of `ceil(width / 8)` bytes.
//! A set bit is white and a clear bit is black, matching the panel.
//!
//! ```text
//!  unused
//!  bits        width
//! <----><------------------------>
//! [76543XXX][76543210]...[765432XX] ^
//! [76543XXX][76543210]...[765432XX] | height
//! [76543XXX][76543210]...[765432XX] v
//! ```

/// Byte value of eight white pixels
pub const WHITE_BYTE: u8 = 0xFF;

/// Byte value of eight black pixels
pub const BLACK_BYTE: u8 = 0x00;

/// Pixel dimensions of a panel or image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl Geometry {
    /// Waveshare 7.5" V2 panel
    pub const EPD_7IN5_V2: Self = Self::new(800, 480);

    /// Create a geometry
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Bytes per row, rounding partial bytes up
    pub const fn row_stride(&self) -> usize {
        (self.width as usize + 7) / 8
    }

    /// Bytes needed for a full frame
    pub const fn buffer_len(&self) -> usize {
        self.row_stride() * self.height as usize
    }

    /// Returns true if the pixel lies inside the frame
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width as u32 && y < self.height as u32
    }

    /// Byte index and bit mask of a pixel
    ///
    /// Returns `None` for pixels outside the frame.
    pub const fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        if !self.contains(x, y) {
            return None;
        }
        let index = x as usize / 8 + y as usize * self.row_stride();
        let mask = 0x80 >> (x % 8);
        Some((index, mask))
    }
}

/// Set one pixel in a packed frame. Pixels outside the frame are ignored.
pub fn set_pixel(frame: &mut [u8], geometry: Geometry, x: u32, y: u32, black: bool) {
    if let Some((index, mask)) = geometry.locate(x, y) {
        if let Some(byte) = frame.get_mut(index) {
            if black {
                *byte &= !mask;
            } else {
                *byte |= mask;
            }
        }
    }
}

/// Read one pixel from a packed frame, `true` for black
pub fn is_black(frame: &[u8], geometry: Geometry, x: u32, y: u32) -> Option<bool> {
    let (index, mask) = geometry.locate(x, y)?;
    frame.get(index).map(|byte| byte & mask == 0)
}
