//! Identify response payload
//!
//! The device answers `Identify` with a single JSON object:
//!
//! ```text
//! {"device":"PicoPaper","version":"1.0.0","id":"E6614103E7452D2F",
//!  "board":"Raspberry Pi Pico 2W","Display":{"type":"ePaper","size":"7.5",
//!  "Resolution":{"width":800,"height":480},"color":"BW","format":"1bpp"}}
//! ```
//!
//! All strings are compile-time configuration and are emitted without
//! escaping.

use core::fmt::{self, Write};

use heapless::String;

/// Number of raw bytes in the hardware id
pub const SERIAL_ID_LEN: usize = 8;

/// Largest identity document the device will send
pub const IDENT_JSON_CAPACITY: usize = 255;

/// Hardware unique id, shown as 16 uppercase hex characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialId(pub [u8; SERIAL_ID_LEN]);

impl SerialId {
    /// Render the id as a fixed-size string
    pub fn to_hex(&self) -> String<{ SERIAL_ID_LEN * 2 }> {
        let mut out = String::new();
        // 8 bytes always fit in 16 characters
        let _ = write!(out, "{}", self);
        out
    }
}

impl fmt::Display for SerialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Panel description reported in the identity document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayInfo {
    /// Display technology
    pub kind: &'static str,
    /// Diagonal in inches
    pub size: &'static str,
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Colour mode
    pub color: &'static str,
    /// Pixel format of uploaded images
    pub format: &'static str,
}

/// Static identity of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    /// Product name
    pub device: &'static str,
    /// Firmware version
    pub version: &'static str,
    /// Board name
    pub board: &'static str,
    /// Attached panel
    pub display: DisplayInfo,
}

/// Errors building the identity document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdentityError {
    /// The document exceeds [`IDENT_JSON_CAPACITY`]
    TooLong,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::TooLong => f.write_str("Failed to create identJson"),
        }
    }
}

impl DeviceIdentity {
    /// PicoPaper with the Waveshare 7.5" V2 panel on a Pico 2 W
    pub const PICO_PAPER: Self = Self {
        device: "PicoPaper",
        version: "1.0.0",
        board: "Raspberry Pi Pico 2W",
        display: DisplayInfo {
            kind: "ePaper",
            size: "7.5",
            width: 800,
            height: 480,
            color: "BW",
            format: "1bpp",
        },
    };

    /// Write the identity document for the board with id `serial`
    pub fn write_json<W: Write>(&self, serial: &SerialId, out: &mut W) -> fmt::Result {
        let display = &self.display;
        write!(
            out,
            "{{\"device\":\"{}\",\"version\":\"{}\",\"id\":\"{}\",\"board\":\"{}\",",
            self.device, self.version, serial, self.board
        )?;
        write!(
            out,
            "\"Display\":{{\"type\":\"{}\",\"size\":\"{}\",\"Resolution\":{{\"width\":{},\"height\":{}}},",
            display.kind, display.size, display.width, display.height
        )?;
        write!(
            out,
            "\"color\":\"{}\",\"format\":\"{}\"}}}}",
            display.color, display.format
        )
    }

    /// Build the identity document into a bounded string
    pub fn to_json(&self, serial: &SerialId) -> Result<String<IDENT_JSON_CAPACITY>, IdentityError> {
        let mut out = String::new();
        self.write_json(serial, &mut out)
            .map_err(|_| IdentityError::TooLong)?;
        Ok(out)
    }
}
