//! Compile-time device configuration
//!
//! Generated by build.rs from device.toml.

use picopaper_protocol::{DeviceIdentity, DisplayInfo, Geometry};

include!(concat!(env!("OUT_DIR"), "/device_config.rs"));

/// What the device reports on identify and on the splash screen
pub const IDENTITY: DeviceIdentity = DeviceIdentity {
    device: DEVICE_NAME,
    version: VERSION,
    board: BOARD,
    display: DisplayInfo {
        kind: DISPLAY_TYPE,
        size: DISPLAY_SIZE,
        width: DISPLAY_WIDTH,
        height: DISPLAY_HEIGHT,
        color: DISPLAY_COLOR,
        format: PIXEL_FORMAT,
    },
};

/// Panel geometry
pub const GEOMETRY: Geometry = Geometry::new(DISPLAY_WIDTH, DISPLAY_HEIGHT);

const _: () = assert!(GEOMETRY.buffer_len() == FRAME_LEN);
