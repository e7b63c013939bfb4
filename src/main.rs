mod console;

use std::{
    io::{BufRead, Write, stdin, stdout},
    path::PathBuf,
    sync::mpsc,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use tspl_carton_printer::{
    PrinterSettings,
    compose::LabelLayout,
    counter::{CounterStore, DEFAULT_COUNTER_FILE},
    default_port_name,
    job::DEFAULT_SEND_DELAY,
    parse_baud_rate,
    session::Session,
};

use crate::console::{App, Event};

/// scan items with a keyboard-wedge scanner and print carton labels on a TSC printer
#[derive(Parser, Debug)]
#[command(name = "carton-printer", version, about)]
struct Cli {
    /// serial port the printer is attached to
    #[arg(long, env = "CARTON_PRINTER_PORT", default_value = default_port_name())]
    port: String,
    /// baud rate, invalid values fall back to 9600
    #[arg(long, env = "CARTON_PRINTER_BAUD", default_value = "9600")]
    baud: String,
    /// file the next carton sequence number is persisted in
    #[arg(long, value_name = "PATH", default_value = DEFAULT_COUNTER_FILE)]
    counter_file: PathBuf,
    /// print this carton id instead of the derived one (the counter is not advanced)
    #[arg(long, value_name = "ID")]
    carton_id: Option<String>,
    /// print this text as packing date instead of the current time
    #[arg(long, value_name = "TEXT")]
    packed_at: Option<String>,
    /// delay between two printer commands
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_SEND_DELAY.as_millis() as u64)]
    send_delay_ms: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // console output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::registry().with(console_layer).init();

    let store = CounterStore::new(cli.counter_file);
    let settings = PrinterSettings {
        port: cli.port,
        baud_rate: parse_baud_rate(&cli.baud),
    };
    let mut session = Session::new(settings, store.load());
    if cli.carton_id.is_some() {
        session.set_carton_override(cli.carton_id.as_deref());
    }
    if cli.packed_at.is_some() {
        session.set_timestamp_override(cli.packed_at.as_deref());
    }

    let (events, event_rx) = mpsc::channel::<Event>();
    let input_events = events.clone();
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in stdin().lock().lines() {
                let Ok(line) = line else { break };
                if input_events.send(Event::Input(line)).is_err() {
                    return;
                }
            }
            let _ = input_events.send(Event::InputClosed);
        })
        .context("starting input reader")?;

    let mut app = App {
        session,
        store,
        layout: LabelLayout::default(),
        send_delay: Duration::from_millis(cli.send_delay_ms),
        events,
        print_in_flight: false,
    };

    info!("application started, ready to scan and print");
    info!(
        "printer {} at {} baud, next carton number {} (from {})",
        app.session.printer.port,
        app.session.printer.baud_rate,
        app.session.next_carton_number(),
        app.store.path().display()
    );
    println!("scan items, then type :print once ready (:help lists all commands)");
    stdout().flush()?;

    app.run(&event_rx)?;

    Ok(())
}
