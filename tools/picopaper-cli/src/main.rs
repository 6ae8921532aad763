//! `picopaper` command line utility
//!
//! Commands:
//! - `identify` - print the device identity
//! - `clear` - clear the panel
//! - `splash` - show the splash screen
//! - `display <image>` - upload an image of the panel size and show it
//! - `draw-text <x> <y> <text>` - draw text into the frame buffer
//! - `show` - show the frame buffer
//! - `reset` - re-arm the device protocol
//!
//! Every command starts by sending the protocol reset byte.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serialport::SerialPort;

use picopaper_cli::{bitmap, Device};
use picopaper_protocol::{DrawText, FontSize, TextColor};

#[derive(Parser)]
#[command(name = "picopaper")]
#[command(about = "Drive a PicoPaper e-paper display over a serial port")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Serial port of the device (e.g. /dev/ttyACM0 or COM4)
    #[arg(short, long, global = true, default_value = "/dev/ttyACM0")]
    port: String,

    /// Baud rate
    #[arg(short = 'b', long, global = true, default_value_t = 115200)]
    baud: u32,

    /// Milliseconds to wait for each device response
    #[arg(long, global = true, default_value_t = 20_000)]
    timeout_ms: u64,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve identification information from the device
    Identify,
    /// Clear the display
    Clear,
    /// Show the splash screen
    Splash,
    /// Upload an image (PNG, BMP, PBM, ...) and display it
    Display {
        /// Path to the image, exactly the panel resolution; non-white pixels draw black
        path: PathBuf,
    },
    /// Draw text into the frame buffer
    DrawText {
        /// Left edge in pixels
        x: u16,
        /// Top edge in pixels
        y: u16,
        /// Text to draw (Latin-1 characters only)
        text: String,
        /// Glyph height: 8, 12, 16, 20 or 24
        #[arg(short, long, default_value = "16", value_parser = parse_font)]
        font: FontSize,
        /// Glyph colour
        #[arg(long, value_enum, default_value_t = Ink::Black)]
        foreground: Ink,
        /// Glyph cell colour
        #[arg(long, value_enum, default_value_t = Ink::White)]
        background: Ink,
        /// Show the frame buffer after drawing
        #[arg(short, long)]
        show: bool,
    },
    /// Show the current frame buffer
    Show,
    /// Reset the device protocol
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum Ink {
    Black,
    White,
}

impl From<Ink> for TextColor {
    fn from(ink: Ink) -> Self {
        match ink {
            Ink::Black => TextColor::Black,
            Ink::White => TextColor::White,
        }
    }
}

fn parse_font(value: &str) -> Result<FontSize, String> {
    value
        .parse::<u16>()
        .ok()
        .and_then(FontSize::from_selector)
        .ok_or_else(|| format!("unsupported font size {value:?} (use 8, 12, 16, 20 or 24)"))
}

/// Map text to single bytes, one per character
fn latin1(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(byte) => Ok(byte),
            Err(_) => bail!("character {c:?} cannot be sent to the device"),
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let port = open_port(&cli.port, cli.baud)?;
    let timeout = Duration::from_millis(cli.timeout_ms);
    let mut device = Device::connect(port, timeout)
        .with_context(|| format!("Failed to reset the device on {}", cli.port))?;

    match cli.command {
        Commands::Identify => {
            info!("Retrieving device information");
            let identity = device.identify()?;
            println!("{identity}");
        }
        Commands::Clear => {
            info!("Clearing the display");
            device.clear()?;
        }
        Commands::Splash => {
            info!("Showing splash screen");
            device.splash()?;
        }
        Commands::Display { path } => {
            let geometry = device.identify()?.geometry();
            let image = bitmap::load(&path, geometry)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            info!("Uploading {}", path.display());
            device.display_image(&image)?;
        }
        Commands::DrawText {
            x,
            y,
            text,
            font,
            foreground,
            background,
            show,
        } => {
            let content = latin1(&text)?;
            let request = DrawText {
                x,
                y,
                font,
                foreground: foreground.into(),
                background: background.into(),
                content: &content,
            };
            info!("Drawing text at {},{}", x, y);
            device.draw_text(&request)?;
            if show {
                device.show_buffer()?;
            }
        }
        Commands::Show => {
            info!("Showing frame buffer");
            device.show_buffer()?;
        }
        Commands::Reset => info!("Protocol reset sent"),
    }

    println!("Done");
    Ok(())
}

fn open_port(name: &str, baud: u32) -> Result<Box<dyn SerialPort>> {
    let mut port = serialport::new(name, baud)
        .timeout(Duration::from_millis(500))
        .data_bits(serialport::DataBits::Eight)
        .stop_bits(serialport::StopBits::One)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None)
        .open()
        .with_context(|| format!("Failed to open serial port {}", name))?;
    // USB CDC devices only start sending once DTR is raised
    let _ = port.write_data_terminal_ready(true);
    let _ = port.write_request_to_send(true);
    Ok(port)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_font_selector() {
        assert_eq!(parse_font("08"), Ok(FontSize::Px8));
        assert_eq!(parse_font("24"), Ok(FontSize::Px24));
        assert!(parse_font("10").is_err());
        assert!(parse_font("big").is_err());
    }

    #[test]
    fn test_latin1() {
        assert_eq!(latin1("Hé").unwrap(), vec![b'H', 0xE9]);
        assert!(latin1("€").is_err());
    }

    #[test]
    fn test_draw_text_arguments() {
        let cli = Cli::try_parse_from([
            "picopaper",
            "draw-text",
            "10",
            "20",
            "hello",
            "--font",
            "12",
            "--foreground",
            "white",
            "--background",
            "black",
            "--show",
            "-p",
            "COM4",
        ])
        .unwrap();
        assert_eq!(cli.port, "COM4");
        match cli.command {
            Commands::DrawText {
                x,
                y,
                text,
                font,
                foreground,
                background,
                show,
            } => {
                assert_eq!((x, y), (10, 20));
                assert_eq!(text, "hello");
                assert_eq!(font, FontSize::Px12);
                assert_eq!(TextColor::from(foreground), TextColor::White);
                assert_eq!(TextColor::from(background), TextColor::Black);
                assert!(show);
            }
            _ => panic!("expected draw-text"),
        }
    }
}
