//! Board identity

/// Length of the factory-programmed unique identifier in bytes
pub const UNIQUE_ID_LEN: usize = 8;

/// Source of the board's unique hardware identifier
///
/// On the Pico family this is the flash/OTP chip id. The identifier is
/// read once at boot and reported verbatim in the identify response.
pub trait UniqueId {
    /// Return the raw identifier bytes, most significant first
    fn unique_id(&mut self) -> [u8; UNIQUE_ID_LEN];
}

/// A fixed identifier, for boards without one and for tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedId(pub [u8; UNIQUE_ID_LEN]);

impl UniqueId for FixedId {
    fn unique_id(&mut self) -> [u8; UNIQUE_ID_LEN] {
        self.0
    }
}
