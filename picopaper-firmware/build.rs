//! Build script for picopaper-firmware
//!
//! - Sets up linker search paths and arguments for memory.x
//! - Validates device.toml at compile time
//! - Generates `device_config.rs` with the validated values

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Largest identity document the firmware can send
const IDENT_JSON_CAPACITY: usize = 255;

/// Serial id rendered as 16 hex characters
const SERIAL_HEX_LEN: usize = 16;

/// Panel limits for the Waveshare 7.5" V2
const MAX_WIDTH: i64 = 800;
const MAX_HEIGHT: i64 = 480;

const COLORS: &[&str] = &["BW"];
const FORMATS: &[&str] = &["1bpp"];
const BAUD_RATES: &[i64] = &[9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600];

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated device configuration
struct DeviceConfig {
    name: String,
    version: String,
    board: String,
    display_type: String,
    display_size: String,
    width: u16,
    height: u16,
    color: String,
    format: String,
    baudrate: u32,
}

/// Validate device.toml configuration at compile time
fn validate_config() -> DeviceConfig {
    // Re-run if device.toml changes
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the picopaper-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let device = read_device(&config, &mut errors);
    report(&errors);

    println!("cargo:warning=device.toml validated successfully");
    device
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with every collected validation error
fn report(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid device.toml                                      ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn section<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => {
            errors.push(format!("Missing [{}] section", name));
            None
        }
    }
}

/// Read a string that is embedded verbatim in the identity JSON
fn text(table: Option<&toml::value::Table>, section: &str, key: &str, errors: &mut Vec<String>) -> String {
    let Some(table) = table else {
        return String::new();
    };
    match table.get(key) {
        Some(toml::Value::String(s)) => {
            if s.is_empty() {
                errors.push(format!("[{}] '{}' must not be empty", section, key));
            }
            if s.chars().any(|c| c == '"' || c == '\\' || c == '^' || c.is_control()) {
                errors.push(format!("[{}] '{}' contains a reserved character", section, key));
            }
            if !s.is_ascii() {
                errors.push(format!("[{}] '{}' must be ASCII", section, key));
            }
            s.clone()
        }
        Some(_) => {
            errors.push(format!("[{}] '{}' must be a string", section, key));
            String::new()
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            String::new()
        }
    }
}

fn integer(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> i64 {
    let Some(table) = table else {
        return 0;
    };
    match table.get(key) {
        Some(toml::Value::Integer(n)) => *n,
        Some(_) => {
            errors.push(format!("[{}] '{}' must be an integer", section, key));
            0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            0
        }
    }
}

fn read_device(config: &toml::Value, errors: &mut Vec<String>) -> DeviceConfig {
    let device = section(config, "device", errors);
    let display = section(config, "display", errors);
    let uart = section(config, "uart", errors);

    let name = text(device, "device", "name", errors);
    let version = text(device, "device", "version", errors);
    let board = text(device, "device", "board", errors);

    let parts: Vec<&str> = version.split('.').collect();
    if !version.is_empty()
        && (parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())))
    {
        errors.push("[device] version must look like MAJOR.MINOR.PATCH".to_string());
    }

    let display_type = text(display, "display", "type", errors);
    let display_size = text(display, "display", "size", errors);
    let color = text(display, "display", "color", errors);
    let format = text(display, "display", "format", errors);

    if !color.is_empty() && !COLORS.contains(&color.as_str()) {
        errors.push(format!("[display] color must be one of {:?}", COLORS));
    }
    if !format.is_empty() && !FORMATS.contains(&format.as_str()) {
        errors.push(format!("[display] format must be one of {:?}", FORMATS));
    }

    let width = integer(display, "display", "width", errors);
    let height = integer(display, "display", "height", errors);
    if !(8..=MAX_WIDTH).contains(&width) || width % 8 != 0 {
        errors.push(format!("[display] width must be a multiple of 8 in 8-{}", MAX_WIDTH));
    }
    if !(1..=MAX_HEIGHT).contains(&height) {
        errors.push(format!("[display] height must be 1-{}", MAX_HEIGHT));
    }

    let baudrate = integer(uart, "uart", "baudrate", errors);
    if uart.is_some() && !BAUD_RATES.contains(&baudrate) {
        errors.push(format!("[uart] baudrate must be one of {:?}", BAUD_RATES));
    }

    let config = DeviceConfig {
        name,
        version,
        board,
        display_type,
        display_size,
        width: width.clamp(0, MAX_WIDTH) as u16,
        height: height.clamp(0, MAX_HEIGHT) as u16,
        color,
        format,
        baudrate: baudrate.max(0) as u32,
    };

    let json_len = identity_json(&config).len();
    if json_len > IDENT_JSON_CAPACITY {
        errors.push(format!(
            "identity JSON is {} bytes, limit is {}",
            json_len, IDENT_JSON_CAPACITY
        ));
    }

    config
}

/// The identify response for a worst-case serial id
fn identity_json(c: &DeviceConfig) -> String {
    format!(
        "{{\"device\":\"{}\",\"version\":\"{}\",\"id\":\"{}\",\"board\":\"{}\",\
         \"Display\":{{\"type\":\"{}\",\"size\":\"{}\",\"Resolution\":{{\"width\":{},\"height\":{}}},\
         \"color\":\"{}\",\"format\":\"{}\"}}}}",
        c.name,
        c.version,
        "0".repeat(SERIAL_HEX_LEN),
        c.board,
        c.display_type,
        c.display_size,
        c.width,
        c.height,
        c.color,
        c.format
    )
}

/// Write `$OUT_DIR/device_config.rs`
fn generate_config(c: &DeviceConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let frame_len = (c.width as usize).div_ceil(8) * c.height as usize;
    let source = format!(
        "// Generated from device.toml\n\
         pub const DEVICE_NAME: &str = {:?};\n\
         pub const VERSION: &str = {:?};\n\
         pub const BOARD: &str = {:?};\n\
         pub const DISPLAY_TYPE: &str = {:?};\n\
         pub const DISPLAY_SIZE: &str = {:?};\n\
         pub const DISPLAY_WIDTH: u16 = {};\n\
         pub const DISPLAY_HEIGHT: u16 = {};\n\
         pub const DISPLAY_COLOR: &str = {:?};\n\
         pub const PIXEL_FORMAT: &str = {:?};\n\
         pub const FRAME_LEN: usize = {};\n\
         pub const UART_BAUDRATE: u32 = {};\n",
        c.name,
        c.version,
        c.board,
        c.display_type,
        c.display_size,
        c.width,
        c.height,
        c.color,
        c.format,
        frame_len,
        c.baudrate
    );
    fs::write(out_dir.join("device_config.rs"), source).unwrap();
}
