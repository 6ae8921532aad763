//! PicoPaper - Serial E-Paper Display Firmware
//!
//! Firmware for a Raspberry Pi Pico 2 W driving a Waveshare 7.5" V2
//! e-paper panel. A host sends commands and bitmaps over UART0 as
//! ASCII-hex; the device renders them and answers with ACK/ERR frames.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{SPI1, UART0};
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::Delay;
use picopaper_core::Peripheral;
use picopaper_display::{Epd7in5V2, EpaperRenderer};
use picopaper_hal::UartConfig;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod board;
mod config;
mod tasks;

use crate::board::{uart_config, OtpChipId, SerialRx, SerialTx};
use crate::tasks::LinkResources;

/// Boot ROM image definition
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// SPI clock for the panel
const SPI_FREQUENCY_HZ: u32 = 4_000_000;

/// Host UART ring buffer sizes
const UART_TX_BUF_LEN: usize = 256;
const UART_RX_BUF_LEN: usize = 4096;

/// The panel on SPI1 with the Pico e-Paper HAT pinout
pub type Panel = Epd7in5V2<
    Spi<'static, SPI1, Blocking>,
    Output<'static>,
    Output<'static>,
    Output<'static>,
    Input<'static>,
    Delay,
>;

pub type Renderer = EpaperRenderer<Panel>;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; UART_TX_BUF_LEN]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; UART_RX_BUF_LEN]> = StaticCell::new();

// Frame buffer, allocated once and lent to the state machine
static FRAME: StaticCell<[u8; config::FRAME_LEN]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("PicoPaper firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host UART on GPIO0/1
    let line = UartConfig {
        baudrate: config::UART_BAUDRATE,
        ..UartConfig::default()
    };

    let tx_buf = TX_BUF.init([0u8; UART_TX_BUF_LEN]);
    let rx_buf = RX_BUF.init([0u8; UART_RX_BUF_LEN]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config(&line));
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", config::UART_BAUDRATE);

    // Panel on SPI1: CLK=GPIO10, MOSI=GPIO11, CS=GPIO9, DC=GPIO8, RST=GPIO12, BUSY=GPIO13
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let busy = Input::new(p.PIN_13, Pull::None);

    let panel = Epd7in5V2::new(spi, cs, dc, rst, busy, Delay, config::GEOMETRY);
    let renderer = EpaperRenderer::new(panel, config::GEOMETRY);
    info!(
        "Panel initialized: {}x{}",
        config::DISPLAY_WIDTH,
        config::DISPLAY_HEIGHT
    );

    let frame = FRAME.init([0xFF; config::FRAME_LEN]);
    let peripheral = Peripheral::with_board_id(frame, config::IDENTITY, &mut OtpChipId);
    info!("Board id: {}", peripheral.serial().to_hex().as_str());

    let resources = LinkResources {
        peripheral,
        rx: SerialRx(rx),
        tx: SerialTx(tx),
        renderer,
    };
    spawner.spawn(tasks::link_task(resources)).unwrap();

    info!("All tasks spawned");
}
