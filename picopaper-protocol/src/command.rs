//! Command codes accepted by the device while idle

/// Commands understood by the PicoPaper device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Report device identity as JSON
    Identify,
    /// Start receiving a packed 1bpp bitmap into the frame buffer
    BeginImageUpload,
    /// Show the frame buffer on the panel
    DisplayImage,
    /// Clear the panel to white
    ClearDisplay,
    /// Render and show the splash screen
    ShowSplash,
    /// Start receiving a draw-text request
    DrawString,
}

// Wire format values
const CMD_IDENTIFY: u8 = 0x01;
const CMD_BEGIN_IMAGE_UPLOAD: u8 = 0x02;
const CMD_DISPLAY_IMAGE: u8 = 0x03;
const CMD_CLEAR_DISPLAY: u8 = 0x04;
const CMD_SHOW_SPLASH: u8 = 0x05;
const CMD_DRAW_STRING: u8 = 0x06;

impl Command {
    /// Parse a command from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_IDENTIFY => Some(Command::Identify),
            CMD_BEGIN_IMAGE_UPLOAD => Some(Command::BeginImageUpload),
            CMD_DISPLAY_IMAGE => Some(Command::DisplayImage),
            CMD_CLEAR_DISPLAY => Some(Command::ClearDisplay),
            CMD_SHOW_SPLASH => Some(Command::ShowSplash),
            CMD_DRAW_STRING => Some(Command::DrawString),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Identify => CMD_IDENTIFY,
            Command::BeginImageUpload => CMD_BEGIN_IMAGE_UPLOAD,
            Command::DisplayImage => CMD_DISPLAY_IMAGE,
            Command::ClearDisplay => CMD_CLEAR_DISPLAY,
            Command::ShowSplash => CMD_SHOW_SPLASH,
            Command::DrawString => CMD_DRAW_STRING,
        }
    }

    /// Returns true if the command is followed by payload bytes
    pub fn has_payload(&self) -> bool {
        matches!(self, Command::BeginImageUpload | Command::DrawString)
    }
}
