//! Driver for the Waveshare 7.5" V2 black/white e-paper panel
//!
//! The controller takes a command byte with DC low followed by data bytes
//! with DC high. Two RAM planes are written per refresh: the "old" plane
//! gets the frame as-is and the "new" plane gets it inverted.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use picopaper_protocol::bitmap::{BLACK_BYTE, WHITE_BYTE};
use picopaper_protocol::Geometry;

use crate::panel::{DisplayError, EpdPanel};

/// Controller command codes
pub mod cmd {
    pub const PANEL_SETTING: u8 = 0x00;
    pub const POWER_SETTING: u8 = 0x01;
    pub const POWER_OFF: u8 = 0x02;
    pub const POWER_ON: u8 = 0x04;
    pub const BOOSTER_SOFT_START: u8 = 0x06;
    pub const DEEP_SLEEP: u8 = 0x07;
    pub const START_TRANSMISSION_1: u8 = 0x10;
    pub const DISPLAY_REFRESH: u8 = 0x12;
    pub const START_TRANSMISSION_2: u8 = 0x13;
    pub const DUAL_SPI: u8 = 0x15;
    pub const VCOM_DATA_INTERVAL: u8 = 0x50;
    pub const TCON_SETTING: u8 = 0x60;
    pub const RESOLUTION_SETTING: u8 = 0x61;
    pub const GET_STATUS: u8 = 0x71;
}

/// Deep sleep check code
const DEEP_SLEEP_CHECK: u8 = 0xA5;

/// Poll interval while the panel reports busy
const BUSY_POLL_MS: u32 = 20;

/// Give up waiting for the panel after this long
pub const BUSY_TIMEOUT_MS: u32 = 30_000;

/// Bytes sent per SPI transfer when streaming a frame
const CHUNK_LEN: usize = 64;

/// One step of the power-on sequence
#[derive(Debug, Clone, Copy)]
pub enum InitStep {
    /// Toggle the reset line
    HardReset,
    /// Send a bare command
    Cmd(u8),
    /// Send a command with static data
    CmdData(u8, &'static [u8]),
    /// Send the panel resolution from the configured geometry
    Resolution,
    /// Wait a fixed time
    DelayMs(u8),
    /// Wait for the busy line to release
    WaitUntilIdle,
}

/// Power-on sequence for the 7.5" V2 panel
pub const INIT_SEQUENCE: &[InitStep] = &[
    InitStep::HardReset,
    // VGH=20V, VGL=-20V, VDH=15V, VDL=-15V
    InitStep::CmdData(cmd::POWER_SETTING, &[0x07, 0x07, 0x3F, 0x3F]),
    InitStep::CmdData(cmd::BOOSTER_SOFT_START, &[0x17, 0x17, 0x28, 0x17]),
    InitStep::Cmd(cmd::POWER_ON),
    InitStep::DelayMs(100),
    InitStep::WaitUntilIdle,
    // KW mode, scan up, shift right, booster on
    InitStep::CmdData(cmd::PANEL_SETTING, &[0x1F]),
    InitStep::Resolution,
    InitStep::CmdData(cmd::DUAL_SPI, &[0x00]),
    InitStep::CmdData(cmd::VCOM_DATA_INTERVAL, &[0x10, 0x07]),
    InitStep::CmdData(cmd::TCON_SETTING, &[0x22]),
];

/// Waveshare 7.5" V2 panel on an SPI bus with discrete control pins
///
/// The BUSY line is low while the controller is working.
pub struct Epd7in5V2<SPI, CS, DC, RST, BUSY, DELAY> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    busy: BUSY,
    delay: DELAY,
    geometry: Geometry,
}

impl<SPI, CS, DC, RST, BUSY, DELAY> Epd7in5V2<SPI, CS, DC, RST, BUSY, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    pub fn new(
        spi: SPI,
        cs: CS,
        dc: DC,
        rst: RST,
        busy: BUSY,
        delay: DELAY,
        geometry: Geometry,
    ) -> Self {
        Self {
            spi,
            cs,
            dc,
            rst,
            busy,
            delay,
            geometry,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn hard_reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(20);
        self.rst.set_low().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(2);
        self.rst.set_high().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(20);
        Ok(())
    }

    /// Write bytes with the DC line at `data`
    fn transfer(&mut self, data: bool, bytes: &[u8]) -> Result<(), DisplayError> {
        if data {
            self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        } else {
            self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        }
        self.cs.set_low().map_err(|_| DisplayError::Pin)?;
        let written = self
            .spi
            .write(bytes)
            .and_then(|()| self.spi.flush())
            .map_err(|_| DisplayError::Communication);
        self.cs.set_high().map_err(|_| DisplayError::Pin)?;
        written
    }

    fn command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.transfer(false, &[command])
    }

    fn command_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.command(command)?;
        self.transfer(true, data)
    }

    /// Stream `frame` as data, optionally inverted
    fn write_plane(&mut self, command: u8, frame: &[u8], invert: bool) -> Result<(), DisplayError> {
        self.command(command)?;
        let mut chunk = [0u8; CHUNK_LEN];
        for part in frame.chunks(CHUNK_LEN) {
            let out = &mut chunk[..part.len()];
            for (dst, src) in out.iter_mut().zip(part) {
                *dst = if invert { !src } else { *src };
            }
            self.transfer(true, out)?;
        }
        Ok(())
    }

    /// Stream a whole plane of one byte value
    fn fill_plane(&mut self, command: u8, value: u8) -> Result<(), DisplayError> {
        self.command(command)?;
        let chunk = [value; CHUNK_LEN];
        let mut remaining = self.geometry.buffer_len();
        while remaining > 0 {
            let n = remaining.min(CHUNK_LEN);
            self.transfer(true, &chunk[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Poll the controller until BUSY goes high
    fn wait_until_idle(&mut self) -> Result<(), DisplayError> {
        let mut waited = 0;
        loop {
            self.command(cmd::GET_STATUS)?;
            if self.busy.is_high().map_err(|_| DisplayError::Pin)? {
                break;
            }
            if waited >= BUSY_TIMEOUT_MS {
                return Err(DisplayError::Communication);
            }
            self.delay.delay_ms(BUSY_POLL_MS);
            waited += BUSY_POLL_MS;
        }
        self.delay.delay_ms(BUSY_POLL_MS);
        Ok(())
    }

    fn turn_on(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::DISPLAY_REFRESH)?;
        self.delay.delay_ms(100);
        self.wait_until_idle()
    }

    fn resolution(&self) -> [u8; 4] {
        let [w_hi, w_lo] = self.geometry.width.to_be_bytes();
        let [h_hi, h_lo] = self.geometry.height.to_be_bytes();
        [w_hi, w_lo, h_hi, h_lo]
    }
}

impl<SPI, CS, DC, RST, BUSY, DELAY> EpdPanel for Epd7in5V2<SPI, CS, DC, RST, BUSY, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        for step in INIT_SEQUENCE {
            match *step {
                InitStep::HardReset => self.hard_reset()?,
                InitStep::Cmd(c) => self.command(c)?,
                InitStep::CmdData(c, data) => self.command_with_data(c, data)?,
                InitStep::Resolution => {
                    let resolution = self.resolution();
                    self.command_with_data(cmd::RESOLUTION_SETTING, &resolution)?;
                }
                InitStep::DelayMs(ms) => self.delay.delay_ms(u32::from(ms)),
                InitStep::WaitUntilIdle => self.wait_until_idle()?,
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.fill_plane(cmd::START_TRANSMISSION_1, WHITE_BYTE)?;
        self.fill_plane(cmd::START_TRANSMISSION_2, BLACK_BYTE)?;
        self.turn_on()
    }

    fn display(&mut self, frame: &[u8]) -> Result<(), DisplayError> {
        if frame.len() != self.geometry.buffer_len() {
            return Err(DisplayError::BufferSize);
        }
        self.write_plane(cmd::START_TRANSMISSION_1, frame, false)?;
        self.write_plane(cmd::START_TRANSMISSION_2, frame, true)?;
        self.turn_on()
    }

    fn sleep(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::POWER_OFF)?;
        self.wait_until_idle()?;
        self.command_with_data(cmd::DEEP_SLEEP, &[DEEP_SLEEP_CHECK])
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Bus activity shared by all fake pins
    #[derive(Debug, Default)]
    struct Bus {
        dc_high: bool,
        /// (command, data) pairs in the order they were sent
        transactions: Vec<(u8, Vec<u8>)>,
        resets: Vec<bool>,
        delays_ms: Vec<u32>,
        /// Number of busy polls that read low before going idle
        busy_polls: usize,
    }

    type Shared = Rc<RefCell<Bus>>;

    struct FakeSpi(Shared);
    struct FakeCs;
    struct FakeDc(Shared);
    struct FakeRst(Shared);
    struct FakeBusy(Shared);
    struct FakeDelay(Shared);

    impl SpiErrorType for FakeSpi {
        type Error = Infallible;
    }

    impl SpiBus for FakeSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            let mut bus = self.0.borrow_mut();
            if bus.dc_high {
                if let Some((_, data)) = bus.transactions.last_mut() {
                    data.extend_from_slice(words);
                }
            } else {
                for &c in words {
                    bus.transactions.push((c, Vec::new()));
                }
            }
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.write(write)
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            self.write(words)
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    impl PinErrorType for FakeCs {
        type Error = Infallible;
    }

    impl OutputPin for FakeCs {
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    impl PinErrorType for FakeDc {
        type Error = Infallible;
    }

    impl OutputPin for FakeDc {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dc_high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dc_high = true;
            Ok(())
        }
    }

    impl PinErrorType for FakeRst {
        type Error = Infallible;
    }

    impl OutputPin for FakeRst {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().resets.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().resets.push(true);
            Ok(())
        }
    }

    impl PinErrorType for FakeBusy {
        type Error = Infallible;
    }

    impl InputPin for FakeBusy {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let mut bus = self.0.borrow_mut();
            if bus.busy_polls == 0 {
                Ok(true)
            } else {
                bus.busy_polls -= 1;
                Ok(false)
            }
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|high| !high)
        }
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().delays_ms.push(ms);
        }
    }

    type Panel = Epd7in5V2<FakeSpi, FakeCs, FakeDc, FakeRst, FakeBusy, FakeDelay>;

    fn panel(geometry: Geometry) -> (Panel, Shared) {
        let bus = Shared::default();
        let panel = Epd7in5V2::new(
            FakeSpi(bus.clone()),
            FakeCs,
            FakeDc(bus.clone()),
            FakeRst(bus.clone()),
            FakeBusy(bus.clone()),
            FakeDelay(bus.clone()),
            geometry,
        );
        (panel, bus)
    }

    /// Sent commands, without status polls
    fn commands(bus: &Shared) -> Vec<u8> {
        bus.borrow()
            .transactions
            .iter()
            .map(|(c, _)| *c)
            .filter(|&c| c != cmd::GET_STATUS)
            .collect()
    }

    fn data_for(bus: &Shared, command: u8) -> Vec<u8> {
        bus.borrow()
            .transactions
            .iter()
            .find(|(c, _)| *c == command)
            .map(|(_, d)| d.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_init_sequence() {
        let (mut panel, bus) = panel(Geometry::EPD_7IN5_V2);
        panel.init().unwrap();

        assert_eq!(bus.borrow().resets, [true, false, true]);
        assert_eq!(
            commands(&bus),
            [
                cmd::POWER_SETTING,
                cmd::BOOSTER_SOFT_START,
                cmd::POWER_ON,
                cmd::PANEL_SETTING,
                cmd::RESOLUTION_SETTING,
                cmd::DUAL_SPI,
                cmd::VCOM_DATA_INTERVAL,
                cmd::TCON_SETTING,
            ]
        );
        assert_eq!(data_for(&bus, cmd::POWER_SETTING), [0x07, 0x07, 0x3F, 0x3F]);
        assert_eq!(data_for(&bus, cmd::RESOLUTION_SETTING), [0x03, 0x20, 0x01, 0xE0]);
        assert_eq!(data_for(&bus, cmd::VCOM_DATA_INTERVAL), [0x10, 0x07]);
    }

    #[test]
    fn test_display_writes_both_planes() {
        let geometry = Geometry::new(16, 2);
        let (mut panel, bus) = panel(geometry);
        panel.display(&[0xF0, 0x0F, 0xFF, 0x00]).unwrap();

        assert_eq!(
            commands(&bus),
            [cmd::START_TRANSMISSION_1, cmd::START_TRANSMISSION_2, cmd::DISPLAY_REFRESH]
        );
        assert_eq!(data_for(&bus, cmd::START_TRANSMISSION_1), [0xF0, 0x0F, 0xFF, 0x00]);
        assert_eq!(data_for(&bus, cmd::START_TRANSMISSION_2), [0x0F, 0xF0, 0x00, 0xFF]);
    }

    #[test]
    fn test_display_rejects_wrong_frame() {
        let (mut panel, bus) = panel(Geometry::new(16, 2));
        assert_eq!(panel.display(&[0u8; 3]), Err(DisplayError::BufferSize));
        assert!(bus.borrow().transactions.is_empty());
    }

    #[test]
    fn test_clear_streams_full_planes() {
        let geometry = Geometry::new(80, 10);
        let (mut panel, bus) = panel(geometry);
        panel.clear().unwrap();

        let old = data_for(&bus, cmd::START_TRANSMISSION_1);
        let new = data_for(&bus, cmd::START_TRANSMISSION_2);
        assert_eq!(old.len(), 100);
        assert!(old.iter().all(|&b| b == WHITE_BYTE));
        assert_eq!(new.len(), 100);
        assert!(new.iter().all(|&b| b == BLACK_BYTE));
    }

    #[test]
    fn test_sleep_sequence() {
        let (mut panel, bus) = panel(Geometry::new(8, 1));
        panel.sleep().unwrap();
        assert_eq!(commands(&bus), [cmd::POWER_OFF, cmd::DEEP_SLEEP]);
        assert_eq!(data_for(&bus, cmd::DEEP_SLEEP), [0xA5]);
    }

    #[test]
    fn test_busy_wait_polls_status() {
        let (mut panel, bus) = panel(Geometry::new(8, 1));
        bus.borrow_mut().busy_polls = 3;
        panel.sleep().unwrap();

        let polls = bus
            .borrow()
            .transactions
            .iter()
            .filter(|(c, _)| *c == cmd::GET_STATUS)
            .count();
        assert_eq!(polls, 4);
        assert_eq!(bus.borrow().delays_ms, [20, 20, 20, 20]);
    }

    #[test]
    fn test_busy_timeout() {
        let (mut panel, bus) = panel(Geometry::new(8, 1));
        bus.borrow_mut().busy_polls = usize::MAX;
        assert_eq!(panel.sleep(), Err(DisplayError::Communication));
    }
}
