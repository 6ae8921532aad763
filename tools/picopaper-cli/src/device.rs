//! Blocking client for one PicoPaper device
//!
//! Every request is a command followed by a wait for the next ACK or ERR
//! frame. DBG frames are logged and skipped. Bytes read past the end of a
//! frame are kept for the next request.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use log::{debug, trace};
use picopaper_protocol::{
    host, AckMessage, Command, DrawText, DrawTextError, ResponseError, ResponseFrame,
    ResponseKind, ResponseParser,
};
use thiserror::Error;

use crate::info::DeviceInfo;

/// How long to wait for a response; a full refresh takes several seconds
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors talking to the device
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device answered with an error frame
    #[error("PicoPaper device error: {0}")]
    ErrorFrame(String),

    /// The device acknowledged something other than the request
    #[error("unexpected device message: expected {expected}, got {got:?}")]
    UnexpectedAck { expected: &'static str, got: String },

    #[error("no response from device within {0:?}")]
    Timeout(Duration),

    #[error("serial port closed")]
    Closed,

    #[error("serial error: {0}")]
    Serial(#[from] io::Error),

    #[error("unreadable response frame: {0:?}")]
    Response(ResponseError),

    #[error("could not parse device identity: {0}")]
    MalformedIdentity(#[from] serde_json::Error),

    #[error("invalid draw-text request: {0}")]
    DrawText(DrawTextError),
}

/// A connected device
pub struct Device<P> {
    port: P,
    parser: ResponseParser,
    pending: VecDeque<u8>,
    timeout: Duration,
}

impl<P: Read + Write> Device<P> {
    /// Wrap an open port without sending anything
    pub fn new(port: P, timeout: Duration) -> Self {
        Self {
            port,
            parser: ResponseParser::new(),
            pending: VecDeque::new(),
            timeout,
        }
    }

    /// Wrap an open port and re-arm the device protocol
    pub fn connect(port: P, timeout: Duration) -> Result<Self, DeviceError> {
        let mut device = Self::new(port, timeout);
        device.reset()?;
        Ok(device)
    }

    /// Send the reset byte and drop any partially read response
    pub fn reset(&mut self) -> Result<(), DeviceError> {
        debug!("Resetting device protocol");
        self.parser.reset();
        self.pending.clear();
        self.send(&host::reset())
    }

    /// Request the identity document
    pub fn identify(&mut self) -> Result<DeviceInfo, DeviceError> {
        let frame = self.request(Command::Identify)?;
        let text = String::from_utf8_lossy(&frame.payload);
        match frame.kind {
            ResponseKind::Ack => Ok(DeviceInfo::from_json(&text)?),
            _ => Err(DeviceError::ErrorFrame(text.into_owned())),
        }
    }

    /// Clear the panel
    pub fn clear(&mut self) -> Result<(), DeviceError> {
        let frame = self.request(Command::ClearDisplay)?;
        expect_ack(&frame, AckMessage::DisplayCleared)
    }

    /// Show the splash screen
    pub fn splash(&mut self) -> Result<(), DeviceError> {
        let frame = self.request(Command::ShowSplash)?;
        expect_ack(&frame, AckMessage::SplashShown)
    }

    /// Show the current frame buffer
    pub fn show_buffer(&mut self) -> Result<(), DeviceError> {
        let frame = self.request(Command::DisplayImage)?;
        expect_ack(&frame, AckMessage::Displayed)
    }

    /// Upload a packed frame into the device frame buffer
    pub fn upload_image(&mut self, image: &[u8]) -> Result<(), DeviceError> {
        debug!("Uploading {} image bytes", image.len());
        let stream: Vec<u8> = host::image_upload(image).collect();
        self.send(&stream)?;
        let frame = self.wait_for_response()?;
        expect_ack(&frame, AckMessage::ImageReceived)
    }

    /// Upload a packed frame and show it
    pub fn display_image(&mut self, image: &[u8]) -> Result<(), DeviceError> {
        self.upload_image(image)?;
        self.show_buffer()
    }

    /// Draw text into the device frame buffer
    pub fn draw_text(&mut self, text: &DrawText<'_>) -> Result<(), DeviceError> {
        let stream: Vec<u8> = host::draw_text(text)
            .map_err(DeviceError::DrawText)?
            .collect();
        self.send(&stream)?;
        let frame = self.wait_for_response()?;
        expect_ack(&frame, AckMessage::Displayed)
    }

    /// Give back the port
    pub fn into_inner(self) -> P {
        self.port
    }

    fn request(&mut self, command: Command) -> Result<ResponseFrame, DeviceError> {
        debug!("Sending {:?}", command);
        self.send(&host::command(command))?;
        self.wait_for_response()
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), DeviceError> {
        trace!("TX {} bytes", bytes.len());
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn wait_for_response(&mut self) -> Result<ResponseFrame, DeviceError> {
        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; 256];
        loop {
            while let Some(byte) = self.pending.pop_front() {
                match self.parser.feed(byte) {
                    Ok(Some(frame)) if frame.kind == ResponseKind::Debug => {
                        debug!("Device: {}", String::from_utf8_lossy(&frame.payload));
                    }
                    Ok(Some(frame)) => {
                        trace!("RX {:?} frame", frame.kind);
                        return Ok(frame);
                    }
                    Ok(None) => {}
                    Err(e) => return Err(DeviceError::Response(e)),
                }
            }

            if Instant::now() >= deadline {
                return Err(DeviceError::Timeout(self.timeout));
            }

            match self.port.read(&mut buf) {
                Ok(0) => return Err(DeviceError::Closed),
                Ok(n) => self.pending.extend(&buf[..n]),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut
                            | io::ErrorKind::WouldBlock
                            | io::ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn expect_ack(frame: &ResponseFrame, expected: AckMessage) -> Result<(), DeviceError> {
    if frame.is_ack(expected) {
        return Ok(());
    }
    let text = String::from_utf8_lossy(&frame.payload).into_owned();
    match frame.kind {
        ResponseKind::Error => Err(DeviceError::ErrorFrame(text)),
        _ => Err(DeviceError::UnexpectedAck {
            expected: expected.as_str(),
            got: text,
        }),
    }
}
