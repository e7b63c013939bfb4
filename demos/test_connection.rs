extern crate tspl_carton_printer;

use anyhow::{Result, anyhow};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use tspl_carton_printer::{PrinterSettings, interface::PrinterChannel};

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
    println!("connected to {}", printer.settings().port);
    printer.close();

    Ok(())
}
