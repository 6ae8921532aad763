//! RP2350 implementations of the PicoPaper HAL traits

use defmt::*;
use embassy_rp::uart::{self, BufferedUartRx, BufferedUartTx, Error as UartError};
use embedded_io::{Read, Write};
use picopaper_hal::uart::{DataBits, Parity, StopBits};
use picopaper_hal::{UartConfig, UartRx, UartTx, UniqueId, UNIQUE_ID_LEN};

/// embassy-rp settings for a HAL line configuration
pub fn uart_config(line: &UartConfig) -> uart::Config {
    let mut config = uart::Config::default();
    config.baudrate = line.baudrate;
    config.data_bits = match line.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    config.parity = match line.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    config.stop_bits = match line.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    config
}

/// Receive half of the host UART
pub struct SerialRx(pub BufferedUartRx);

impl UartRx for SerialRx {
    type Error = UartError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        self.0.read(buf)
    }
}

/// Transmit half of the host UART
pub struct SerialTx(pub BufferedUartTx);

impl UartTx for SerialTx {
    type Error = UartError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartError> {
        self.0.write_all(data)
    }

    fn flush(&mut self) -> Result<(), UartError> {
        Write::flush(&mut self.0)
    }
}

/// Chip id burned into OTP at the factory
pub struct OtpChipId;

impl UniqueId for OtpChipId {
    fn unique_id(&mut self) -> [u8; UNIQUE_ID_LEN] {
        match embassy_rp::otp::get_chipid() {
            Ok(id) => id.to_be_bytes(),
            Err(_) => {
                warn!("Failed to read chip id, reporting zeros");
                [0; UNIQUE_ID_LEN]
            }
        }
    }
}
