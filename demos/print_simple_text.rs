extern crate tspl_carton_printer;

use std::{env, thread, time::Duration};

use anyhow::{Result, anyhow};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use tspl_carton_printer::{
    LabelSize, PrinterSettings,
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

    let text = env::args()
        .skip(1)
        .collect::<Vec<String>>()
        .join(" ");
    let text = if text.is_empty() { "Your Custom Text Here".to_string() } else { text };

    let settings = PrinterSettings {
        port: "/dev/ttyUSB0".to_string(),
        baud_rate: 9600,
    };
    info!("using port {}", settings.port);
    let mut printer = PrinterChannel::new(settings);
    if !printer.open() {
        return Err(anyhow!("failed to connect to printer"));
    }

    let commands = [
        Command::Clear,
        Command::Size(LabelSize {
            width_mm: 110,
            height_mm: 80,
            gap_mm: 2,
        }),
        Command::text(50, 50, "3", (2, 2), &text),
        Command::Print { sets: 1, copies: 1 },
    ];
    for command in &commands {
        if !printer.send(&command.to_string()) {
            printer.close();
            return Err(anyhow!("failed to send {}", command));
        }
        thread::sleep(Duration::from_millis(100));
    }
    println!("printed {:?}", text);
    printer.close();

    Ok(())
}
