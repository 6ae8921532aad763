//! Command dispatcher and protocol state machine
//!
//! [`Peripheral`] owns all receive-side state: the framer, the active
//! function, the frame buffer and the draw-string accumulator. Each
//! received character goes through [`Peripheral::on_byte`], which runs any
//! resulting render operation and writes any response before returning.

use picopaper_hal::{UartTx, UniqueId};
use picopaper_protocol::{AckMessage, Command, DeviceIdentity, DrawText, SerialId};

use crate::draw_string::DrawStringAccumulator;
use crate::emitter::{self, EmitError};
use crate::error::{DispatchError, PayloadError, ProtocolError};
use crate::framer::{ByteFramer, FrameState, FramerOutput};
use crate::image::{ImageBuffer, UploadProgress};
use crate::traits::Renderer;

/// Which multi-byte payload, if any, is being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveFunction {
    /// The next decoded byte is a command
    Idle,
    /// Decoded bytes are image data
    ReceivingImage,
    /// Decoded bytes are draw-string request data
    ReceivingDrawString,
}

/// What a single character did to the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Nothing observable yet
    Pending,
    /// The reset character re-armed everything
    Reset,
    /// A command was accepted while idle
    Dispatched(Command),
    /// The last image byte arrived and was acknowledged
    ImageReceived,
    /// A draw-string request was rendered and acknowledged
    TextDrawn,
    /// An error frame was sent
    Rejected(ProtocolError),
}

/// The PicoPaper protocol state machine
#[derive(Debug)]
pub struct Peripheral<'a> {
    framer: ByteFramer,
    active: ActiveFunction,
    image: ImageBuffer<'a>,
    text: DrawStringAccumulator,
    identity: DeviceIdentity,
    serial: SerialId,
}

impl<'a> Peripheral<'a> {
    /// Create an idle peripheral around the board's frame buffer
    pub fn new(frame: &'a mut [u8], identity: DeviceIdentity, serial: SerialId) -> Self {
        Self {
            framer: ByteFramer::new(),
            active: ActiveFunction::Idle,
            image: ImageBuffer::new(frame),
            text: DrawStringAccumulator::new(),
            identity,
            serial,
        }
    }

    /// Create an idle peripheral reporting the board's own unique id
    pub fn with_board_id<B: UniqueId>(
        frame: &'a mut [u8],
        identity: DeviceIdentity,
        board: &mut B,
    ) -> Self {
        Self::new(frame, identity, SerialId(board.unique_id()))
    }

    pub fn frame_state(&self) -> FrameState {
        self.framer.state()
    }

    pub fn active_function(&self) -> ActiveFunction {
        self.active
    }

    pub fn image(&self) -> &ImageBuffer<'a> {
        &self.image
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn serial(&self) -> &SerialId {
        &self.serial
    }

    /// Render the splash screen without acknowledging it
    pub fn boot<R: Renderer>(&mut self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.splash(self.image.frame_mut(), &self.identity, &self.serial)
    }

    /// Return every piece of receive state to its initial value
    pub fn reset(&mut self) {
        self.framer.reset();
        self.active = ActiveFunction::Idle;
        self.image.begin_upload();
        self.text.clear();
    }

    /// Process one received character
    ///
    /// Errors are reported to the host and never stop the machine; the
    /// only failure returned here is a transport that refused a response.
    pub fn on_byte<R, T>(
        &mut self,
        byte: u8,
        renderer: &mut R,
        tx: &mut T,
    ) -> Result<Outcome, EmitError<T::Error>>
    where
        R: Renderer,
        T: UartTx,
    {
        let decoded = match self.framer.feed(byte) {
            Ok(None) => return Ok(Outcome::Pending),
            Ok(Some(FramerOutput::Reset)) => {
                self.reset();
                return Ok(Outcome::Reset);
            }
            Ok(Some(FramerOutput::Byte(decoded))) => decoded,
            Err(e) => return reject(tx, e.into()),
        };

        match self.active {
            ActiveFunction::Idle => self.dispatch(decoded, renderer, tx),
            ActiveFunction::ReceivingImage => self.receive_image(decoded, tx),
            ActiveFunction::ReceivingDrawString => self.receive_text(decoded, renderer, tx),
        }
    }

    fn dispatch<R, T>(
        &mut self,
        byte: u8,
        renderer: &mut R,
        tx: &mut T,
    ) -> Result<Outcome, EmitError<T::Error>>
    where
        R: Renderer,
        T: UartTx,
    {
        let Some(command) = Command::from_byte(byte) else {
            return reject(tx, DispatchError::UnsupportedCommand(byte).into());
        };
        let accepted = Outcome::Dispatched(command);

        match command {
            Command::Identify => match self.identity.to_json(&self.serial) {
                Ok(json) => {
                    emitter::ack(tx, json.as_str())?;
                    Ok(accepted)
                }
                Err(e) => reject(tx, PayloadError::Identity(e).into()),
            },
            Command::BeginImageUpload => {
                self.image.begin_upload();
                self.active = ActiveFunction::ReceivingImage;
                Ok(accepted)
            }
            Command::DisplayImage => {
                let result = renderer.display(self.image.frame());
                rendered(tx, result, AckMessage::Displayed, accepted)
            }
            Command::ClearDisplay => {
                let result = renderer.clear();
                rendered(tx, result, AckMessage::DisplayCleared, accepted)
            }
            Command::ShowSplash => {
                let result = renderer.splash(self.image.frame_mut(), &self.identity, &self.serial);
                rendered(tx, result, AckMessage::SplashShown, accepted)
            }
            Command::DrawString => {
                self.text.clear();
                self.active = ActiveFunction::ReceivingDrawString;
                Ok(accepted)
            }
        }
    }

    fn receive_image<T: UartTx>(
        &mut self,
        byte: u8,
        tx: &mut T,
    ) -> Result<Outcome, EmitError<T::Error>> {
        match self.image.push(byte) {
            Ok(UploadProgress::InProgress) => Ok(Outcome::Pending),
            Ok(UploadProgress::Complete) => {
                self.active = ActiveFunction::Idle;
                emitter::ack(tx, &AckMessage::ImageReceived)?;
                Ok(Outcome::ImageReceived)
            }
            Err(e) => {
                self.active = ActiveFunction::Idle;
                reject(tx, e.into())
            }
        }
    }

    fn receive_text<R, T>(
        &mut self,
        byte: u8,
        renderer: &mut R,
        tx: &mut T,
    ) -> Result<Outcome, EmitError<T::Error>>
    where
        R: Renderer,
        T: UartTx,
    {
        match self.text.push(byte) {
            Ok(false) => Ok(Outcome::Pending),
            Ok(true) => {
                self.active = ActiveFunction::Idle;
                let result = match DrawText::decode(self.text.as_slice()) {
                    Ok(text) => renderer
                        .draw_text(self.image.frame_mut(), &text)
                        .map_err(|_| ProtocolError::Render),
                    Err(e) => Err(PayloadError::DrawText(e).into()),
                };
                self.text.clear();
                match result {
                    Ok(()) => {
                        emitter::ack(tx, &AckMessage::Displayed)?;
                        Ok(Outcome::TextDrawn)
                    }
                    Err(e) => reject(tx, e),
                }
            }
            Err(e) => {
                self.active = ActiveFunction::Idle;
                self.text.clear();
                reject(tx, e.into())
            }
        }
    }
}

/// Send an error frame and report it
fn reject<T: UartTx>(tx: &mut T, error: ProtocolError) -> Result<Outcome, EmitError<T::Error>> {
    emitter::error(tx, &error)?;
    Ok(Outcome::Rejected(error))
}

/// Acknowledge a finished render operation, or report its failure
fn rendered<T: UartTx, E>(
    tx: &mut T,
    result: Result<(), E>,
    ack: AckMessage,
    outcome: Outcome,
) -> Result<Outcome, EmitError<T::Error>> {
    match result {
        Ok(()) => {
            emitter::ack(tx, &ack)?;
            Ok(outcome)
        }
        Err(_) => reject(tx, ProtocolError::Render),
    }
}
