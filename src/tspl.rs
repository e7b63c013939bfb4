use std::fmt::Display;

use crate::{Direction, HumanReadable, LabelSize, QrErrorLevel, Rotation};

/// a single TSPL command, rendered to its wire text via `Display` (without line ending)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// clear the image buffer
    Clear,
    /// declare the label dimensions
    Size(LabelSize),
    /// print speed in inches per second
    Speed(u8),
    /// print darkness
    Density(u8),
    Direction(Direction),
    /// place a line of text, `x`/`y` are in dots (203 dpi is ~8 dots/mm)
    Text {
        x: u32,
        y: u32,
        /// built-in font name, e.g. "3" for the 16x24 font
        font: String,
        rotation: Rotation,
        x_multiplier: u8,
        y_multiplier: u8,
        content: String,
    },
    /// place a QR code (auto encoding, model 2, mask 3)
    QrCode {
        x: u32,
        y: u32,
        error_level: QrErrorLevel,
        /// width of a single module in dots, 1-10
        cell_width: u8,
        rotation: Rotation,
        payload: String,
    },
    /// place a linear barcode
    Barcode {
        x: u32,
        y: u32,
        /// symbology, e.g. "128" or "39"
        code_type: String,
        height: u32,
        human_readable: HumanReadable,
        rotation: Rotation,
        narrow: u8,
        wide: u8,
        payload: String,
    },
    /// draw a filled rectangle, used as separator line
    Bar {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// print the buffer `sets` times with `copies` copies each
    Print { sets: u32, copies: u32 },
}

impl Command {
    /// text command with the given font and no rotation
    pub fn text(x: u32, y: u32, font: &str, multiplier: (u8, u8), content: &str) -> Self {
        Command::Text {
            x,
            y,
            font: font.to_string(),
            rotation: Rotation::None,
            x_multiplier: multiplier.0,
            y_multiplier: multiplier.1,
            content: content.to_string(),
        }
    }
}

/// terminate a command line the way the printer expects it
pub fn frame(command: &str) -> String {
    format!("{}\r\n", command)
}

/// escape a string for use inside a quoted TSPL parameter
///
/// TSPL has no backslash escapes, an embedded double quote is written as `\["]`
pub fn quote(content: &str) -> String {
    format!("\"{}\"", content.replace('"', "\\[\"]"))
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Clear => write!(f, "CLS"),
            Command::Size(size) => write!(
                f,
                "SIZE {} mm, {} mm, {} mm",
                size.width_mm, size.height_mm, size.gap_mm
            ),
            Command::Speed(speed) => write!(f, "SPEED {}", speed),
            Command::Density(density) => write!(f, "DENSITY {}", density),
            Command::Direction(direction) => write!(f, "DIRECTION {}", direction),
            Command::Text {
                x,
                y,
                font,
                rotation,
                x_multiplier,
                y_multiplier,
                content,
            } => write!(
                f,
                "TEXT {},{},{},{},{},{},{}",
                x,
                y,
                quote(font),
                rotation,
                x_multiplier,
                y_multiplier,
                quote(content)
            ),
            Command::QrCode {
                x,
                y,
                error_level,
                cell_width,
                rotation,
                payload,
            } => write!(
                f,
                "QRCODE {},{},{},{},A,{},M2,S3,{}",
                x,
                y,
                error_level,
                cell_width,
                rotation,
                quote(payload)
            ),
            Command::Barcode {
                x,
                y,
                code_type,
                height,
                human_readable,
                rotation,
                narrow,
                wide,
                payload,
            } => write!(
                f,
                "BARCODE {},{},{},{},{},{},{},{},{}",
                x,
                y,
                quote(code_type),
                height,
                human_readable,
                rotation,
                narrow,
                wide,
                quote(payload)
            ),
            Command::Bar {
                x,
                y,
                width,
                height,
            } => write!(f, "BAR {},{},{},{}", x, y, width, height),
            Command::Print { sets, copies } => write!(f, "PRINT {},{}", sets, copies),
        }
    }
}
