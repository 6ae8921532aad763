//! Receive loop glue
//!
//! Reads one character from the transport and hands it to the peripheral.
//! The board owns the loop itself so it can log each [`Outcome`] and decide
//! how to report transport faults.

use picopaper_hal::{UartRx, UartTx};

use crate::emitter::{self, EmitError};
use crate::machine::{Outcome, Peripheral};
use crate::traits::Renderer;

/// Debug payload sent when a read from the transport fails
pub const READ_FAULT_MESSAGE: &str = "UART read error";

/// Transport failures seen by the receive loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<R, T> {
    /// Reading the next character failed
    Receive(R),
    /// A response could not be sent
    Transmit(EmitError<T>),
}

/// Block for one character and process it
pub fn step<Rx, Tx, R>(
    peripheral: &mut Peripheral<'_>,
    rx: &mut Rx,
    tx: &mut Tx,
    renderer: &mut R,
) -> Result<Outcome, LinkError<Rx::Error, Tx::Error>>
where
    Rx: UartRx,
    Tx: UartTx,
    R: Renderer,
{
    let byte = rx.read_byte().map_err(LinkError::Receive)?;
    peripheral
        .on_byte(byte, renderer, tx)
        .map_err(LinkError::Transmit)
}

/// Tell the host that a read failed
///
/// Receive state is left as it was; the host decides whether to reset.
pub fn report_read_fault<Tx: UartTx>(tx: &mut Tx) -> Result<(), EmitError<Tx::Error>> {
    emitter::debug(tx, READ_FAULT_MESSAGE)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::testing::{Disconnected, RecordingRenderer, RecordingTx, SliceRx};
    use picopaper_protocol::{host, AckMessage, Command, DeviceIdentity, ResponseKind, SerialId};
    use std::vec::Vec;

    #[test]
    fn test_step_until_disconnect() {
        let mut storage = [0u8; 2];
        let mut p = Peripheral::new(&mut storage, DeviceIdentity::PICO_PAPER, SerialId::default());
        let mut renderer = RecordingRenderer::new();
        let mut tx = RecordingTx::new();

        let mut input: Vec<u8> = host::reset().to_vec();
        input.extend(host::image_upload(&[0x0F, 0xF0]));
        input.extend(host::command(Command::DisplayImage));
        let mut rx = SliceRx::new(&input);

        let mut outcomes = Vec::new();
        let err = loop {
            match step(&mut p, &mut rx, &mut tx, &mut renderer) {
                Ok(Outcome::Pending) => {}
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => break e,
            }
        };

        assert_eq!(err, LinkError::Receive(Disconnected));
        assert_eq!(
            outcomes,
            [
                Outcome::Reset,
                Outcome::Dispatched(Command::BeginImageUpload),
                Outcome::ImageReceived,
                Outcome::Dispatched(Command::DisplayImage),
            ]
        );
        let frames = tx.frames();
        assert!(frames[0].is_ack(AckMessage::ImageReceived));
        assert!(frames[1].is_ack(AckMessage::Displayed));
    }

    #[test]
    fn test_transmit_failure_surfaces() {
        let mut storage = [0u8; 2];
        let mut p = Peripheral::new(&mut storage, DeviceIdentity::PICO_PAPER, SerialId::default());
        let mut renderer = RecordingRenderer::new();
        let mut tx = RecordingTx::failing();
        let mut rx = SliceRx::new(b"?");

        assert_eq!(
            step(&mut p, &mut rx, &mut tx, &mut renderer),
            Err(LinkError::Transmit(EmitError::Transport(Disconnected)))
        );
    }

    #[test]
    fn test_read_fault_is_debug_frame() {
        let mut tx = RecordingTx::new();
        report_read_fault(&mut tx).unwrap();
        let frames = tx.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].kind, ResponseKind::Debug);
        assert_eq!(frames[0].text(), Some(READ_FAULT_MESSAGE));
    }
}
