//! Renderer backed by an e-paper panel
//!
//! Each panel operation wakes the panel, refreshes it, puts it back to
//! sleep and waits for the controller to settle before returning.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use picopaper_core::Renderer;
use picopaper_protocol::{DeviceIdentity, DrawText, Geometry, SerialId};

use crate::canvas::Canvas;
use crate::panel::{DisplayError, EpdPanel};
use crate::{splash, text};

/// Delay after putting the panel to sleep
pub const SETTLE_DELAY_MS: u32 = 50;

/// [`Renderer`] that draws into the frame and refreshes an [`EpdPanel`]
pub struct EpaperRenderer<P> {
    panel: P,
    geometry: Geometry,
}

impl<P: EpdPanel> EpaperRenderer<P> {
    pub fn new(panel: P, geometry: Geometry) -> Self {
        Self { panel, geometry }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Give the panel back
    pub fn release(self) -> P {
        self.panel
    }

    /// Push `frame` to the panel
    fn refresh(&mut self, frame: &[u8]) -> Result<(), DisplayError> {
        if frame.len() != self.geometry.buffer_len() {
            return Err(DisplayError::BufferSize);
        }
        self.panel.init()?;
        self.panel.display(frame)?;
        self.rest()
    }

    fn rest(&mut self) -> Result<(), DisplayError> {
        self.panel.sleep()?;
        self.panel.delay_ms(SETTLE_DELAY_MS);
        Ok(())
    }
}

impl<P: EpdPanel> Renderer for EpaperRenderer<P> {
    type Error = DisplayError;

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.panel.init()?;
        self.panel.clear()?;
        self.rest()
    }

    fn splash(
        &mut self,
        frame: &mut [u8],
        identity: &DeviceIdentity,
        serial: &SerialId,
    ) -> Result<(), DisplayError> {
        let mut canvas = Canvas::new(frame, self.geometry)?;
        canvas.clear(BinaryColor::Off).unwrap_or_else(|never| match never {});
        splash::draw(&mut canvas, identity, serial).unwrap_or_else(|never| match never {});
        self.refresh(frame)
    }

    fn display(&mut self, frame: &[u8]) -> Result<(), DisplayError> {
        self.refresh(frame)
    }

    fn draw_text(&mut self, frame: &mut [u8], request: &DrawText<'_>) -> Result<(), DisplayError> {
        let mut canvas = Canvas::new(frame, self.geometry)?;
        text::draw(&mut canvas, request).unwrap_or_else(|never| match never {});
        Ok(())
    }
}
