//! PicoPaper Communication Protocol
//!
//! This crate defines the UART protocol between a host computer and the
//! PicoPaper e-paper peripheral. It is shared by the device firmware and the
//! host utility, so both sides agree on every constant.
//!
//! # Protocol Overview
//!
//! Every protocol byte travels as three ASCII characters:
//! ```text
//! ┌───────┬──────────┬──────────┐
//! │ START │ HEX HIGH │ HEX LOW  │
//! │ ':'   │ 0-9a-f   │ 0-9a-f   │
//! └───────┴──────────┴──────────┘
//! ```
//!
//! A lone `/` resets the device's receive state at any time. The first
//! decoded byte while idle is a [`Command`]; image uploads and draw-text
//! requests are followed by their payload bytes, encoded the same way.
//!
//! The device answers with text frames:
//! ```text
//! ~ACK#<payload>^\n    ~ERR#<payload>^\n    ~DBG#<payload>^\n
//! ```
//!
//! There is no checksum and no escaping. A corrupted but well-framed byte is
//! delivered as-is.

#![no_std]
#![deny(unsafe_code)]

pub mod bitmap;
pub mod command;
pub mod draw_text;
pub mod host;
pub mod identity;
pub mod response;
pub mod wire;

pub use bitmap::Geometry;
pub use command::Command;
pub use draw_text::{DrawText, DrawTextError, Field, FontSize, TextColor};
pub use identity::{DeviceIdentity, DisplayInfo, IdentityError, SerialId};
pub use response::{AckMessage, ResponseError, ResponseFrame, ResponseKind, ResponseParser};
pub use wire::{RESET_CHAR, START_CHAR};
