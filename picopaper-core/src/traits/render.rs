//! Render operations

use picopaper_protocol::{DeviceIdentity, DrawText, SerialId};

/// Display and graphics operations invoked on command completion
///
/// Every operation runs to completion before the next protocol byte is
/// read, including any panel refresh and settle delay. The frame passed in
/// is the packed 1bpp image buffer owned by the peripheral.
pub trait Renderer {
    /// Error type reported by the display collaborator
    type Error;

    /// Clear the panel to white
    ///
    /// The frame buffer is left untouched.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw the splash screen into `frame` and show it
    fn splash(
        &mut self,
        frame: &mut [u8],
        identity: &DeviceIdentity,
        serial: &SerialId,
    ) -> Result<(), Self::Error>;

    /// Show `frame` on the panel
    fn display(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Draw text into `frame`
    ///
    /// Nothing is shown until the next [`Renderer::display`].
    fn draw_text(&mut self, frame: &mut [u8], text: &DrawText<'_>) -> Result<(), Self::Error>;
}
