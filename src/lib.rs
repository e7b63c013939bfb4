use std::fmt::Display;

pub mod carton;
pub mod compose;
pub mod counter;
pub mod extract;
pub mod interface;
pub mod job;
pub mod session;
pub mod tspl;

/// baud rate used when none (or an unparsable one) is configured
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// minimum number of scanned records required to print a carton label
pub const MIN_RECORDS_PER_LABEL: usize = 2;

/// print orientation relative to the feed direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// label is printed as designed
    Normal,
    /// label is printed rotated by 180 degrees
    Inverted,
}

/// rotation applied to a single text, barcode or QR code element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

/// QR code error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrErrorLevel {
    /// recovers 7% of the data
    Low,
    /// recovers 15% of the data
    Medium,
    /// recovers 25% of the data
    Quartile,
    /// recovers 30% of the data
    High,
}

/// placement of the human readable line below a linear barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanReadable {
    Hidden,
    Left,
    Center,
    Right,
}

/// physical label dimensions in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSize {
    pub width_mm: u32,
    pub height_mm: u32,
    /// gap between two labels on the liner
    pub gap_mm: u32,
}

impl Default for LabelSize {
    fn default() -> Self {
        LabelSize {
            width_mm: 100,
            height_mm: 150,
            gap_mm: 2,
        }
    }
}

/// print quality settings sent ahead of every label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintSettings {
    /// print speed, 0-14 depending on the printer model
    pub speed: u8,
    /// print darkness, 0-15
    pub density: u8,
    pub direction: Direction,
}

impl Default for PrintSettings {
    fn default() -> Self {
        PrintSettings {
            speed: 4,
            density: 8,
            direction: Direction::Normal,
        }
    }
}

/// where and how fast to talk to the printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterSettings {
    /// device name of the serial port, e.g. `COM10` or `/dev/ttyUSB0`
    pub port: String,
    pub baud_rate: u32,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings {
            port: default_port_name().to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// the serial port name the printer is usually attached to on this platform
pub fn default_port_name() -> &'static str {
    if cfg!(windows) { "COM10" } else { "/dev/ttyUSB0" }
}

/// parse a baud rate typed by the operator
///
/// malformed or zero values are replaced by [`DEFAULT_BAUD_RATE`] instead of being rejected
pub fn parse_baud_rate(text: &str) -> u32 {
    match text.trim().parse::<u32>() {
        Ok(baud_rate) if baud_rate > 0 => baud_rate,
        _ => {
            tracing::debug!("invalid baud rate {:?}, using {}", text, DEFAULT_BAUD_RATE);
            DEFAULT_BAUD_RATE
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Normal => write!(f, "0"),
            Direction::Inverted => write!(f, "1"),
        }
    }
}

impl Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rotation::None => write!(f, "0"),
            Rotation::Clockwise90 => write!(f, "90"),
            Rotation::Clockwise180 => write!(f, "180"),
            Rotation::Clockwise270 => write!(f, "270"),
        }
    }
}

impl Display for QrErrorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QrErrorLevel::Low => write!(f, "L"),
            QrErrorLevel::Medium => write!(f, "M"),
            QrErrorLevel::Quartile => write!(f, "Q"),
            QrErrorLevel::High => write!(f, "H"),
        }
    }
}

impl Display for HumanReadable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HumanReadable::Hidden => write!(f, "0"),
            HumanReadable::Left => write!(f, "1"),
            HumanReadable::Center => write!(f, "2"),
            HumanReadable::Right => write!(f, "3"),
        }
    }
}
