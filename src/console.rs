use std::{
    io::{Write, stdout},
    sync::mpsc,
    time::Duration,
};

use anyhow::Result;
use chrono::Local;
use tracing::{info, warn};
use tspl_carton_printer::{
    MIN_RECORDS_PER_LABEL,
    compose::LabelLayout,
    counter::CounterStore,
    job::{Completion, spawn_connection_test, spawn_print_job},
    parse_baud_rate,
    session::Session,
};

pub enum Event {
    Input(String),
    InputClosed,
    Finished(Completion),
}

/// operator commands, typed with a leading `:`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    List,
    Delete,
    Clear,
    Print,
    Preview,
    Test,
    Port,
    Baud,
    Carton,
    Date,
}

/// split `line` into a known command and its argument
///
/// anything else, including unknown `:` prefixed text, is a scan
fn parse_command(line: &str) -> Option<(Command, &str)> {
    let command = line.strip_prefix(':')?;
    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };
    let command = match name {
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "help" => Command::Help,
        "l" | "list" => Command::List,
        "d" | "del" | "delete" => Command::Delete,
        "clear" => Command::Clear,
        "p" | "print" => Command::Print,
        "preview" => Command::Preview,
        "t" | "test" => Command::Test,
        "port" => Command::Port,
        "baud" => Command::Baud,
        "carton" => Command::Carton,
        "date" => Command::Date,
        _ => return None,
    };
    Some((command, argument))
}

pub struct App {
    pub session: Session,
    pub store: CounterStore,
    pub layout: LabelLayout,
    pub send_delay: Duration,
    pub events: mpsc::Sender<Event>,
    pub print_in_flight: bool,
}

impl App {
    /// handle one line typed (or scanned) by the operator, `false` ends the session
    pub fn handle_input(&mut self, line: &str) -> bool {
        let line = line.trim();
        let Some((command, argument)) = parse_command(line) else {
            if self.session.scan(line).is_some() {
                self.show_status();
            }
            return true;
        };
        match command {
            Command::Quit => return false,
            Command::Help => print_help(),
            Command::List => self.show_list(),
            Command::Delete => self.delete(argument),
            Command::Clear => {
                self.session.clear();
                info!("scanned items cleared");
                self.show_status();
            }
            Command::Print => self.print(),
            Command::Preview => self.preview(),
            Command::Test => self.test_connection(),
            Command::Port => {
                if !argument.is_empty() {
                    self.session.printer.port = argument.to_string();
                }
                println!("port: {}", self.session.printer.port);
            }
            Command::Baud => {
                self.session.printer.baud_rate = parse_baud_rate(argument);
                println!("baud rate: {}", self.session.printer.baud_rate);
            }
            Command::Carton => self.session.set_carton_override(override_argument(argument)),
            Command::Date => self.session.set_timestamp_override(override_argument(argument)),
        }
        true
    }

    /// process events until the operator quits and no print job is running
    pub fn run(&mut self, events: &mpsc::Receiver<Event>) -> Result<()> {
        let mut input_open = true;
        for event in events.iter() {
            match event {
                Event::Input(line) => {
                    if !input_open {
                        continue;
                    }
                    if !self.handle_input(&line) {
                        input_open = false;
                        if !self.print_in_flight {
                            break;
                        }
                        println!("waiting for the running print job to finish");
                    }
                }
                Event::InputClosed => {
                    input_open = false;
                    if !self.print_in_flight {
                        break;
                    }
                }
                Event::Finished(completion) => {
                    self.handle_completion(completion);
                    if !input_open && !self.print_in_flight {
                        break;
                    }
                }
            }
            stdout().flush()?;
        }
        Ok(())
    }

    /// delete by the 1-based number shown in the list
    fn delete(&mut self, argument: &str) {
        let deleted = argument
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| self.session.delete(index));
        match deleted {
            Some(_) => self.show_list(),
            None => println!("no item {:?}, see :list", argument),
        }
    }

    fn print(&mut self) {
        if self.print_in_flight {
            println!("a label is still printing, please wait");
            return;
        }
        let job = match self.session.submit(Local::now().naive_local()) {
            Ok(job) => job,
            Err(err) => {
                warn!("not ready: {:#}", err);
                return;
            }
        };
        info!("printing {:?}", job.records);
        let events = self.events.clone();
        self.print_in_flight = true;
        spawn_print_job(
            self.session.printer.clone(),
            self.layout.clone(),
            job,
            self.send_delay,
            move |completion| {
                let _ = events.send(Event::Finished(completion));
            },
        );
    }

    fn preview(&self) {
        match self.session.submit(Local::now().naive_local()) {
            Ok(job) => {
                for command in self.layout.compose(&job.records, &job.carton_id, &job.timestamp) {
                    println!("{}", command);
                }
            }
            Err(err) => warn!("not ready: {:#}", err),
        }
    }

    fn test_connection(&self) {
        // the running job owns the port
        if self.print_in_flight {
            println!("a label is still printing, test the connection afterwards");
            return;
        }
        let events = self.events.clone();
        spawn_connection_test(self.session.printer.clone(), move |completion| {
            let _ = events.send(Event::Finished(completion));
        });
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::ConnectionTest(outcome) => {
                let title = if outcome.success { "Success" } else { "Error" };
                notify(title, &outcome.message);
            }
            Completion::Print {
                carton_id,
                carton_number,
                outcome,
            } => {
                self.print_in_flight = false;
                self.session
                    .record_print_outcome(carton_number, &outcome, &self.store);
                if outcome.success {
                    notify("Success", &format!("Carton {} printed!", carton_id));
                    println!("type :clear to scan another batch");
                } else {
                    notify("Error", &outcome.message);
                }
                self.show_status();
            }
        }
    }

    fn show_status(&self) {
        let count = self.session.records().len();
        if self.session.can_submit() {
            println!("scanned: {} (:print to print the label)", count);
        } else {
            println!(
                "scanned: {} (scan at least {} items to print)",
                count, MIN_RECORDS_PER_LABEL
            );
        }
        if let Some(carton_id) = self.session.carton_override() {
            println!("carton ID override: {}", carton_id);
        }
        if let Some(timestamp) = self.session.timestamp_override() {
            println!("date override: {}", timestamp);
        }
    }

    fn show_list(&self) {
        for entry in self.session.entries() {
            println!("{}", entry);
        }
        self.show_status();
    }
}

/// `off` (or nothing) disables an override, any other text enables it
fn override_argument(argument: &str) -> Option<&str> {
    match argument {
        "" | "off" => None,
        text => Some(text),
    }
}

fn notify(title: &str, message: &str) {
    println!("*** {}: {} ***", title, message);
}

fn print_help() {
    println!("scan an item (or type it followed by Enter) to add it, or use a command:");
    println!("  :list            show the scanned items");
    println!("  :del N           delete item number N");
    println!("  :clear           delete all items");
    println!("  :print           print the carton label");
    println!("  :preview         show the printer commands without printing");
    println!("  :test            test the printer connection");
    println!("  :port NAME       change the serial port");
    println!("  :baud N          change the baud rate");
    println!("  :carton ID|off   override the carton id (format YYWW-XXX, e.g. 2544-001)");
    println!("  :date TEXT|off   override the packing date (format YYYY-MM-DD HH:MM:SS)");
    println!("  :quit            exit");
}
