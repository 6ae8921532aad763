//! Identity document returned by the device

use std::fmt;

use picopaper_protocol::Geometry;
use serde::Deserialize;

/// Panel resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Resolution {
    pub width: u16,
    pub height: u16,
}

/// Panel description
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    #[serde(rename = "Resolution", alias = "resolution")]
    pub resolution: Resolution,
    pub color: String,
    pub format: String,
}

/// Parsed answer to the identify command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceInfo {
    pub device: String,
    pub version: String,
    pub id: String,
    pub board: String,
    #[serde(rename = "Display", alias = "display")]
    pub display: DisplayInfo,
}

impl DeviceInfo {
    /// Parse the JSON payload of an identify acknowledgement
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Frame buffer layout of the attached panel
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.display.resolution.width, self.display.resolution.height)
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = &self.display;
        writeln!(f, "Device:       {}", self.device)?;
        writeln!(f, "Version:      {}", self.version)?;
        writeln!(f, "ID:           {}", self.id)?;
        writeln!(f, "Board:        {}", self.board)?;
        writeln!(f, "Display:")?;
        writeln!(f, "  Type:       {}", display.kind)?;
        writeln!(f, "  Size:       {}\"", display.size)?;
        writeln!(
            f,
            "  Resolution: {} x {}",
            display.resolution.width, display.resolution.height
        )?;
        writeln!(f, "  Color:      {}", display.color)?;
        write!(f, "  Format:     {}", display.format)
    }
}
