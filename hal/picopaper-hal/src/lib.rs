//! PicoPaper Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the protocol state machine needs
//! from the board. Chip-specific code (the firmware crate) implements them,
//! and host tests implement them with in-memory fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  picopaper-core (state machine, loop)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picopaper-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  firmware     │       │  test fakes   │
//! │  (RP2350)     │       │  (host)       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`board::UniqueId`] - Factory-programmed board identifier

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod uart;

pub use board::{FixedId, UniqueId, UNIQUE_ID_LEN};
pub use uart::{UartConfig, UartRx, UartTx};
