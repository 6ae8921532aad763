//! Host side of the PicoPaper serial protocol
//!
//! - [`device`]: blocking request/acknowledge client over any `Read + Write` port
//! - [`info`]: the identity document returned by the device
//! - [`bitmap`]: loading images into the panel frame format

pub mod bitmap;
pub mod device;
pub mod info;

pub use device::{Device, DeviceError, DEFAULT_TIMEOUT};
pub use info::DeviceInfo;
