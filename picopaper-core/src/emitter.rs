//! Response emitter
//!
//! Writes `~ACK#`, `~ERR#` and `~DBG#` frames straight to the transport.
//! Payloads are not escaped.

use core::fmt;

use picopaper_hal::UartTx;
use picopaper_protocol::response::write_frame;
use picopaper_protocol::ResponseKind;

use crate::error::ProtocolError;

/// Failure to send a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmitError<E> {
    /// The transport rejected a write or flush
    Transport(E),
    /// A payload failed to format
    Format,
}

/// `fmt::Write` adapter that forwards to a UART and keeps the first error
struct FrameWriter<'t, T: UartTx> {
    tx: &'t mut T,
    error: Option<T::Error>,
}

impl<T: UartTx> fmt::Write for FrameWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.tx.write_blocking(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

/// Send one frame of `kind` carrying `payload`
pub fn send<T, P>(tx: &mut T, kind: ResponseKind, payload: &P) -> Result<(), EmitError<T::Error>>
where
    T: UartTx,
    P: fmt::Display + ?Sized,
{
    let mut writer = FrameWriter { tx, error: None };
    let written = write_frame(&mut writer, kind, payload);
    if let Some(e) = writer.error {
        return Err(EmitError::Transport(e));
    }
    written.map_err(|_| EmitError::Format)?;
    writer.tx.flush().map_err(EmitError::Transport)
}

/// Send an acknowledgement
pub fn ack<T, P>(tx: &mut T, payload: &P) -> Result<(), EmitError<T::Error>>
where
    T: UartTx,
    P: fmt::Display + ?Sized,
{
    send(tx, ResponseKind::Ack, payload)
}

/// Report a protocol error
pub fn error<T: UartTx>(tx: &mut T, error: &ProtocolError) -> Result<(), EmitError<T::Error>> {
    send(tx, ResponseKind::Error, error)
}

/// Send a diagnostic message
pub fn debug<T, P>(tx: &mut T, payload: &P) -> Result<(), EmitError<T::Error>>
where
    T: UartTx,
    P: fmt::Display + ?Sized,
{
    send(tx, ResponseKind::Debug, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use crate::testing::RecordingTx;
    use picopaper_protocol::AckMessage;

    #[test]
    fn test_ack_frame() {
        let mut tx = RecordingTx::new();
        ack(&mut tx, &AckMessage::DisplayCleared).unwrap();
        assert_eq!(tx.bytes(), b"~ACK#CLR_SCR^\n");
        assert_eq!(tx.flushes(), 1);
    }

    #[test]
    fn test_error_frame() {
        let mut tx = RecordingTx::new();
        let e = ProtocolError::Dispatch(DispatchError::UnsupportedCommand(0x07));
        error(&mut tx, &e).unwrap();
        assert_eq!(tx.bytes(), b"~ERR#Unsupported command: 0x07^\n");
    }

    #[test]
    fn test_debug_frame() {
        let mut tx = RecordingTx::new();
        debug(&mut tx, "UART read error").unwrap();
        assert_eq!(tx.bytes(), b"~DBG#UART read error^\n");
    }

    #[test]
    fn test_transport_failure_is_reported() {
        let mut tx = RecordingTx::failing();
        assert_eq!(
            ack(&mut tx, &AckMessage::SplashShown),
            Err(EmitError::Transport(crate::testing::Disconnected))
        );
    }
}
