//! Test doubles shared by the unit tests

extern crate std;

use std::vec::Vec;

use picopaper_hal::{UartRx, UartTx};
use picopaper_protocol::{
    DeviceIdentity, DrawText, FontSize, ResponseFrame, ResponseParser, SerialId, TextColor,
};

use crate::traits::Renderer;

/// Transport error used by the fakes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

/// UART sink that records everything written
#[derive(Debug, Default)]
pub struct RecordingTx {
    bytes: Vec<u8>,
    flushes: usize,
    fail: bool,
}

impl RecordingTx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Parse everything written so far into response frames
    pub fn frames(&self) -> Vec<ResponseFrame> {
        let mut parser = ResponseParser::new();
        self.bytes
            .iter()
            .filter_map(|&b| parser.feed(b).unwrap())
            .collect()
    }
}

impl UartTx for RecordingTx {
    type Error = Disconnected;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Disconnected> {
        if self.fail {
            return Err(Disconnected);
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Disconnected> {
        self.flushes += 1;
        Ok(())
    }
}

/// UART source replaying a fixed byte sequence, then reporting disconnect
#[derive(Debug)]
pub struct SliceRx<'a> {
    data: &'a [u8],
}

impl<'a> SliceRx<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl UartRx for SliceRx<'_> {
    type Error = Disconnected;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Disconnected> {
        let n = buf.len().min(self.data.len());
        if n == 0 {
            return Err(Disconnected);
        }
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// One call made on the recording renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Clear,
    Splash { serial: SerialId, device: &'static str },
    Display { first: Option<u8>, len: usize },
    DrawText {
        x: u16,
        y: u16,
        font: FontSize,
        foreground: TextColor,
        background: TextColor,
        content: Vec<u8>,
    },
}

/// Renderer that records calls instead of driving a panel
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    pub fail: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn outcome(&self) -> Result<(), Disconnected> {
        if self.fail {
            Err(Disconnected)
        } else {
            Ok(())
        }
    }
}

impl Renderer for RecordingRenderer {
    type Error = Disconnected;

    fn clear(&mut self) -> Result<(), Disconnected> {
        self.calls.push(RenderCall::Clear);
        self.outcome()
    }

    fn splash(
        &mut self,
        frame: &mut [u8],
        identity: &DeviceIdentity,
        serial: &SerialId,
    ) -> Result<(), Disconnected> {
        frame.fill(0xFF);
        self.calls.push(RenderCall::Splash {
            serial: *serial,
            device: identity.device,
        });
        self.outcome()
    }

    fn display(&mut self, frame: &[u8]) -> Result<(), Disconnected> {
        self.calls.push(RenderCall::Display {
            first: frame.first().copied(),
            len: frame.len(),
        });
        self.outcome()
    }

    fn draw_text(&mut self, _frame: &mut [u8], text: &DrawText<'_>) -> Result<(), Disconnected> {
        self.calls.push(RenderCall::DrawText {
            x: text.x,
            y: text.y,
            font: text.font,
            foreground: text.foreground,
            background: text.background,
            content: text.content.to_vec(),
        });
        self.outcome()
    }
}
