extern crate tspl_carton_printer;

use std::{thread, time::Duration};

use anyhow::{Result, anyhow};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use tspl_carton_printer::{
    HumanReadable, LabelSize, PrintSettings, PrinterSettings, QrErrorLevel, Rotation,
    interface::{CommandSink, PrinterChannel},
    tspl::Command,
};

fn main() -> Result<()> {
    // console output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(console_layer).init();

    let settings = PrinterSettings {
        port: "/dev/ttyUSB0".to_string(),
        baud_rate: 9600,
    };
    info!("using port {}", settings.port);
    let mut printer = PrinterChannel::new(settings);
    if !printer.open() {
        return Err(anyhow!("failed to connect to printer"));
    }

    let print_settings = PrintSettings::default();
    let commands = vec![
        Command::Clear,
        Command::Size(LabelSize {
            width_mm: 110,
            height_mm: 80,
            gap_mm: 2,
        }),
        Command::Speed(print_settings.speed),
        Command::Density(print_settings.density),
        Command::Direction(print_settings.direction),
        Command::text(50, 50, "3", (1, 1), "Hello World"),
        Command::QrCode {
            x: 300,
            y: 50,
            error_level: QrErrorLevel::Medium,
            cell_width: 4,
            rotation: Rotation::None,
            payload: "Hello World".to_string(),
        },
        Command::text(50, 100, "3", (2, 2), "TSC TTP-244 Pro"),
        Command::Barcode {
            x: 50,
            y: 150,
            code_type: "128".to_string(),
            height: 50,
            human_readable: HumanReadable::Left,
            rotation: Rotation::None,
            narrow: 2,
            wide: 4,
            payload: "123456789012".to_string(),
        },
        Command::Print { sets: 1, copies: 1 },
    ];

    info!("sending {} commands", commands.len());
    for command in &commands {
        if !printer.send(&command.to_string()) {
            printer.close();
            return Err(anyhow!("failed to send {}", command));
        }
        thread::sleep(Duration::from_millis(100));
    }
    println!("print command sent, the label should print now");
    printer.close();

    Ok(())
}
