use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{error, info};

use crate::{
    PrinterSettings,
    compose::LabelLayout,
    interface::{CommandSink, PrinterChannel},
    session::PrintJob,
};

/// delay between two commands, gives the printer time to process each line
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_millis(100);

/// result of a background job as reported to the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub success: bool,
    pub message: String,
}

impl JobOutcome {
    fn succeeded(message: String) -> Self {
        info!("{}", message);
        JobOutcome {
            success: true,
            message,
        }
    }

    fn failed(message: String) -> Self {
        error!("{}", message);
        JobOutcome {
            success: false,
            message,
        }
    }
}

/// completion signal of a job started with [`spawn_print_job`] or [`spawn_connection_test`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    ConnectionTest(JobOutcome),
    Print {
        carton_id: String,
        /// counter value the carton id was derived from, see [`PrintJob::carton_number`]
        carton_number: Option<u32>,
        outcome: JobOutcome,
    },
}

/// write a composed carton label to `sink`
///
/// stops at the first command that could not be sent, the commands sent before stay on the device
pub fn execute_print_job<S: CommandSink>(
    sink: &mut S,
    layout: &LabelLayout,
    job: &PrintJob,
    send_delay: Duration,
) -> JobOutcome {
    let commands = layout.compose(&job.records, &job.carton_id, &job.timestamp);
    let total = commands.len();
    for (index, command) in commands.iter().enumerate() {
        if index > 0 && !send_delay.is_zero() {
            thread::sleep(send_delay);
        }
        if !sink.send(&command.to_string()) {
            return JobOutcome::failed(format!(
                "print error: command {} of {} could not be sent ({})",
                index + 1,
                total,
                command
            ));
        }
    }
    JobOutcome::succeeded(format!(
        "carton {} printed, {} items",
        job.carton_id,
        job.records.len()
    ))
}

/// print `job` on a background thread that owns its own printer connection
///
/// `notify` is called exactly once with the outcome, the job cannot be cancelled
pub fn spawn_print_job<F>(
    settings: PrinterSettings,
    layout: LabelLayout,
    job: PrintJob,
    send_delay: Duration,
    notify: F,
) -> JoinHandle<()>
where
    F: FnOnce(Completion) + Send + 'static,
{
    thread::spawn(move || {
        info!("printing {} items as carton {}", job.records.len(), job.carton_id);
        let mut channel = PrinterChannel::new(settings);
        let outcome = if channel.open() {
            info!("connected to printer");
            let outcome = execute_print_job(&mut channel, &layout, &job, send_delay);
            channel.close();
            outcome
        } else {
            JobOutcome::failed(format!(
                "failed to connect to printer on {}",
                channel.settings().port
            ))
        };
        notify(Completion::Print {
            carton_id: job.carton_id,
            carton_number: job.carton_number,
            outcome,
        });
    })
}

/// open and close the printer port on a background thread
pub fn spawn_connection_test<F>(settings: PrinterSettings, notify: F) -> JoinHandle<()>
where
    F: FnOnce(Completion) + Send + 'static,
{
    thread::spawn(move || {
        info!(
            "testing connection to {} at {} baud",
            settings.port, settings.baud_rate
        );
        let mut channel = PrinterChannel::new(settings);
        let outcome = if channel.open() {
            channel.close();
            JobOutcome::succeeded(format!(
                "connected to {} successfully",
                channel.settings().port
            ))
        } else {
            JobOutcome::failed(format!(
                "failed to connect to {}",
                channel.settings().port
            ))
        };
        notify(Completion::ConnectionTest(outcome));
    })
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::interface::RecordingSink;

    fn job() -> PrintJob {
        PrintJob {
            carton_id: "C2544-007".to_string(),
            timestamp: "2025-06-01 10:00:00".to_string(),
            records: vec!["HAA02-2544-336".to_string(), "HAA02-2544-337".to_string()],
            carton_number: Some(7),
        }
    }

    fn missing_port() -> PrinterSettings {
        PrinterSettings {
            port: "/dev/tspl-carton-printer-missing".to_string(),
            baud_rate: 9600,
        }
    }

    #[test]
    fn test_print_job_sends_every_command() {
        let mut sink = RecordingSink::default();
        let outcome = execute_print_job(&mut sink, &LabelLayout::default(), &job(), Duration::ZERO);
        assert!(outcome.success);
        assert_eq!(sink.commands.len(), 12);
        assert_eq!(sink.commands[0], "CLS");
        assert_eq!(sink.commands[9], "TEXT 50,200,\"3\",0,1,1,\"01. HAA02-2544-336\"");
        assert_eq!(sink.commands[10], "TEXT 430,200,\"3\",0,1,1,\"02. HAA02-2544-337\"");
        assert_eq!(sink.commands[11], "PRINT 1,1");
    }

    #[test]
    fn test_print_job_stops_at_failed_write() {
        let mut sink = RecordingSink {
            fail_after: Some(3),
            ..RecordingSink::default()
        };
        let outcome = execute_print_job(&mut sink, &LabelLayout::default(), &job(), Duration::ZERO);
        assert!(!outcome.success);
        assert!(outcome.message.contains("command 4 of 12"), "{}", outcome.message);
        assert_eq!(sink.commands.len(), 3);
        assert!(!sink.commands.iter().any(|c| c.starts_with("PRINT")));
    }

    #[test]
    fn test_print_job_reports_connection_failure() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_print_job(
            missing_port(),
            LabelLayout::default(),
            job(),
            Duration::ZERO,
            move |completion| {
                let _ = tx.send(completion);
            },
        );
        handle.join().unwrap();
        match rx.recv().unwrap() {
            Completion::Print {
                carton_id,
                carton_number,
                outcome,
            } => {
                assert_eq!(carton_id, "C2544-007");
                assert_eq!(carton_number, Some(7));
                assert!(!outcome.success);
            }
            other => panic!("unexpected completion {:?}", other),
        }
    }

    #[test]
    fn test_connection_test_reports_failure() {
        let (tx, rx) = mpsc::channel();
        spawn_connection_test(missing_port(), move |completion| {
            let _ = tx.send(completion);
        })
        .join()
        .unwrap();
        match rx.recv().unwrap() {
            Completion::ConnectionTest(outcome) => assert!(!outcome.success),
            other => panic!("unexpected completion {:?}", other),
        }
    }
}
