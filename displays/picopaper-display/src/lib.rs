//! Render operations for the PicoPaper e-paper peripheral
//!
//! This crate provides:
//! - [`EpdPanel`], the interface a physical e-paper driver implements
//! - [`Epd7in5V2`], the Waveshare 7.5" V2 panel driver over `embedded-hal`
//! - [`Canvas`], an `embedded-graphics` draw target over the packed frame
//! - Font mapping and text drawing for draw-string requests
//! - The splash screen layout
//! - [`EpaperRenderer`], which implements the core `Renderer` on top of a panel
//!
//! # Architecture
//!
//! The protocol state machine owns the frame buffer and calls the renderer
//! with it. Drawing only touches the buffer; the panel sees it when the
//! renderer pushes a full frame, after which the panel is put to sleep.

#![no_std]
#![deny(unsafe_code)]

pub mod canvas;
pub mod epd7in5_v2;
pub mod panel;
pub mod renderer;
pub mod splash;
pub mod text;

pub use canvas::Canvas;
pub use epd7in5_v2::Epd7in5V2;
pub use panel::{DisplayError, EpdPanel};
pub use renderer::{EpaperRenderer, SETTLE_DELAY_MS};
