//! Board-agnostic core logic for the PicoPaper peripheral
//!
//! This crate contains the receive-side protocol state machine and
//! everything it owns:
//!
//! - Byte framer (`:hh` triplets and the `/` reset)
//! - Command dispatcher and the active-function state
//! - Image receiver writing into the frame buffer
//! - Draw-string receiver and its bounded accumulator
//! - Response emitter over any [`picopaper_hal::UartTx`]
//! - The [`traits::Renderer`] capability the dispatcher drives
//!
//! The state machine is a plain value. It holds no globals and no hardware,
//! so tests drive it with a fake renderer and an in-memory UART.

#![no_std]
#![deny(unsafe_code)]

pub mod draw_string;
pub mod emitter;
pub mod error;
pub mod framer;
pub mod image;
pub mod link;
pub mod machine;
pub mod traits;

#[cfg(test)]
mod testing;

pub use draw_string::DrawStringAccumulator;
pub use emitter::EmitError;
pub use error::{DispatchError, FramingError, PayloadError, ProtocolError};
pub use framer::{ByteFramer, FrameState, FramerOutput};
pub use image::{ImageBuffer, UploadProgress};
pub use link::LinkError;
pub use machine::{ActiveFunction, Outcome, Peripheral};
pub use traits::Renderer;
