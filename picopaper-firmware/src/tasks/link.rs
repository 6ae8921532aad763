//! Host link task
//!
//! Owns the protocol state machine and processes the UART stream one
//! character at a time. Rendering runs inside the loop, so nothing is read
//! while the panel refreshes; the UART ring buffer absorbs what arrives
//! in the meantime.

use defmt::*;
use picopaper_core::link::{self, LinkError};
use picopaper_core::{EmitError, Outcome, Peripheral, ProtocolError};

use crate::board::{SerialRx, SerialTx};
use crate::Renderer;

/// Everything the link task owns
pub struct LinkResources {
    pub peripheral: Peripheral<'static>,
    pub rx: SerialRx,
    pub tx: SerialTx,
    pub renderer: Renderer,
}

/// Host link task - boot splash, then the receive loop
#[embassy_executor::task]
pub async fn link_task(resources: LinkResources) {
    let LinkResources {
        mut peripheral,
        mut rx,
        mut tx,
        mut renderer,
    } = resources;
    info!("Link task started");

    match peripheral.boot(&mut renderer) {
        Ok(()) => info!("Splash screen shown"),
        Err(e) => error!("Splash screen failed: {:?}", e),
    }

    loop {
        match link::step(&mut peripheral, &mut rx, &mut tx, &mut renderer) {
            Ok(outcome) => log_outcome(outcome),
            Err(LinkError::Receive(e)) => {
                warn!("UART read error: {:?}", e);
                if let Err(e) = link::report_read_fault(&mut tx) {
                    log_emit_failure(e);
                }
            }
            Err(LinkError::Transmit(e)) => log_emit_failure(e),
        }
    }
}

fn log_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Pending => {}
        Outcome::Reset => debug!("Reset received"),
        Outcome::Dispatched(command) => info!("Command: {:?}", command),
        Outcome::ImageReceived => info!("Image received"),
        Outcome::TextDrawn => info!("Text drawn"),
        Outcome::Rejected(ProtocolError::Render) => error!("Render operation failed"),
        Outcome::Rejected(e) => warn!("Rejected: {:?}", e),
    }
}

fn log_emit_failure(e: EmitError<embassy_rp::uart::Error>) {
    match e {
        EmitError::Transport(e) => warn!("UART write error: {:?}", e),
        EmitError::Format => warn!("Response payload failed to format"),
    }
}
