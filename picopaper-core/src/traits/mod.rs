//! Collaborator traits
//!
//! The dispatcher drives the display through these traits so it can run
//! against real hardware or a recording fake.

pub mod render;

pub use render::Renderer;
