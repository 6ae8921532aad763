//! E-paper panel trait
//!
//! Defines the operations a physical panel driver provides.

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel controller
    Communication,
    /// A pin could not be driven or read
    Pin,
    /// The frame does not match the panel geometry
    BufferSize,
}

/// Full-refresh monochrome e-paper panel
///
/// Every call blocks until the controller reports idle. Frames are packed
/// 1bpp, MSB first, with a set bit meaning white.
pub trait EpdPanel {
    /// Reset the controller and run its power-on sequence
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Refresh the whole panel to white
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Transfer `frame` and refresh the panel
    fn display(&mut self, frame: &[u8]) -> Result<(), DisplayError>;

    /// Enter deep sleep
    ///
    /// The panel keeps its image; [`EpdPanel::init`] wakes it.
    fn sleep(&mut self) -> Result<(), DisplayError>;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
