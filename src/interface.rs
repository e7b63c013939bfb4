use std::{thread, time::Duration};

use anyhow::{Result, anyhow};
use serial2::{CharSize, FlowControl, Parity, SerialPort, Settings, StopBits};
use tracing::{debug, trace, warn};

use crate::{PrinterSettings, tspl::frame};

/// time the printer needs after the port was opened before it accepts commands
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// maximum time a single command write may block
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// anything TSPL command lines can be written to
pub trait CommandSink {
    /// write a single command, the line ending is appended by the sink
    ///
    /// # Returns
    ///
    /// * `true` if the command was written, `false` otherwise
    fn send(&mut self, command: &str) -> bool;
}

/// write-only serial connection to a TSPL label printer
pub struct PrinterChannel {
    settings: PrinterSettings,
    /// open serial port, `None` while disconnected
    port: Option<SerialPort>,
}

impl PrinterChannel {
    /// create a disconnected channel for the given port and baud rate
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tspl_carton_printer::{PrinterSettings, interface::{CommandSink, PrinterChannel}};
    ///
    /// let mut printer = PrinterChannel::new(PrinterSettings {
    ///     port: "/dev/ttyUSB0".to_string(),
    ///     baud_rate: 9600,
    /// });
    /// if printer.open() {
    ///     printer.send("CLS");
    ///     printer.close();
    /// }
    /// ```
    pub fn new(settings: PrinterSettings) -> Self {
        PrinterChannel {
            settings,
            port: None,
        }
    }

    pub fn settings(&self) -> &PrinterSettings {
        &self.settings
    }

    /// open the serial port with 8 data bits, no parity and 1 stop bit
    ///
    /// # Returns
    ///
    /// * `true` if the printer is connected afterwards
    pub fn open(&mut self) -> bool {
        if self.port.is_some() {
            return true;
        }
        match connect(&self.settings) {
            Ok(port) => {
                debug!(
                    "opened {} at {} baud",
                    self.settings.port, self.settings.baud_rate
                );
                self.port = Some(port);
                thread::sleep(SETTLE_DELAY);
                true
            }
            Err(err) => {
                warn!("connection to {} failed: {:#}", self.settings.port, err);
                false
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    /// close the serial port, does nothing if it is not open
    pub fn close(&mut self) {
        if let Some(port) = self.port.take() {
            drop(port);
            debug!("closed {}", self.settings.port);
        }
    }

    /// write a command line to the printer
    fn write_command(&mut self, command: &str) -> Result<()> {
        let port = self
            .port
            .as_ref()
            .ok_or_else(|| anyhow!("printer not connected"))?;
        let line = frame(command);
        trace!("WRITE TO SERIAL {} bytes: {:?}", line.len(), line);
        port.write_all(line.as_bytes())?;
        Ok(())
    }
}

impl CommandSink for PrinterChannel {
    fn send(&mut self, command: &str) -> bool {
        match self.write_command(command) {
            Ok(()) => {
                debug!("sent {}", command);
                true
            }
            Err(err) => {
                warn!("sending {:?} failed: {:#}", command, err);
                false
            }
        }
    }
}

impl Drop for PrinterChannel {
    fn drop(&mut self) {
        self.close();
    }
}

fn connect(settings: &PrinterSettings) -> Result<SerialPort> {
    let baud_rate = settings.baud_rate;
    let mut port = SerialPort::open(&settings.port, |mut serial_settings: Settings| {
        serial_settings.set_raw();
        serial_settings.set_baud_rate(baud_rate)?;
        serial_settings.set_char_size(CharSize::Bits8);
        serial_settings.set_stop_bits(StopBits::One);
        serial_settings.set_parity(Parity::None);
        serial_settings.set_flow_control(FlowControl::None);
        Ok(serial_settings)
    })?;
    port.discard_buffers()?;
    port.set_write_timeout(WRITE_TIMEOUT)?;
    Ok(port)
}

/// command sink collecting every command in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub commands: Vec<String>,
    /// number of sends to accept before failing, `None` never fails
    pub fail_after: Option<usize>,
}

#[cfg(test)]
impl CommandSink for RecordingSink {
    fn send(&mut self, command: &str) -> bool {
        if let Some(limit) = self.fail_after {
            if self.commands.len() >= limit {
                return false;
            }
        }
        self.commands.push(command.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_port() -> PrinterSettings {
        PrinterSettings {
            port: "/dev/tspl-carton-printer-missing".to_string(),
            baud_rate: 9600,
        }
    }

    #[test]
    fn test_send_without_connection_fails() {
        let mut channel = PrinterChannel::new(missing_port());
        assert!(!channel.is_connected());
        assert!(!channel.send("CLS"));
    }

    #[test]
    fn test_open_missing_port_fails() {
        let mut channel = PrinterChannel::new(missing_port());
        assert!(!channel.open());
        assert!(!channel.is_connected());
        assert!(!channel.send("CLS"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut channel = PrinterChannel::new(missing_port());
        channel.close();
        channel.close();
        assert!(!channel.is_connected());
    }

    #[test]
    fn test_recording_sink_fails_after_limit() {
        let mut sink = RecordingSink {
            fail_after: Some(2),
            ..RecordingSink::default()
        };
        assert!(sink.send("CLS"));
        assert!(sink.send("SPEED 4"));
        assert!(!sink.send("DENSITY 8"));
        assert_eq!(sink.commands, vec!["CLS", "SPEED 4"]);
    }
}
