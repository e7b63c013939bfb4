use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::{
    MIN_RECORDS_PER_LABEL, PrinterSettings,
    carton::{carton_id, pack_timestamp},
    compose::numbered_entry,
    counter::CounterStore,
    extract::extract_serial_number,
    job::JobOutcome,
};

/// everything needed to print one carton label, taken at submission time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub carton_id: String,
    pub timestamp: String,
    pub records: Vec<String>,
    /// counter value the carton id was derived from, `None` when the id was overridden
    pub carton_number: Option<u32>,
}

/// operator session: printer settings, overrides, the scanned records and the carton counter
#[derive(Debug, Clone)]
pub struct Session {
    pub printer: PrinterSettings,
    carton_override: Option<String>,
    timestamp_override: Option<String>,
    records: Vec<String>,
    next_carton_number: u32,
}

impl Session {
    pub fn new(printer: PrinterSettings, next_carton_number: u32) -> Self {
        Session {
            printer,
            carton_override: None,
            timestamp_override: None,
            records: Vec::new(),
            next_carton_number,
        }
    }

    /// add a raw scanner payload, the extracted serial number is stored
    ///
    /// # Returns
    ///
    /// * the stored record, or `None` if the payload was blank
    pub fn scan(&mut self, raw: &str) -> Option<&str> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let record = extract_serial_number(raw);
        self.records.push(record);
        let index = self.records.len();
        info!("scanned: {}", raw.chars().take(50).collect::<String>());
        info!("extracted S/N: {} ({})", self.records[index - 1], index);
        self.records.last().map(String::as_str)
    }

    /// remove the record at zero based `index`, later records move up one position
    pub fn delete(&mut self, index: usize) -> Option<String> {
        if index >= self.records.len() {
            return None;
        }
        let deleted = self.records.remove(index);
        info!("deleted: {}", deleted);
        Some(deleted)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[String] {
        &self.records
    }

    /// the records as shown to the operator, `01. <value>`, `02. <value>`, ...
    pub fn entries(&self) -> Vec<String> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| numbered_entry(index, record))
            .collect()
    }

    pub fn can_submit(&self) -> bool {
        self.records.len() >= MIN_RECORDS_PER_LABEL
    }

    pub fn next_carton_number(&self) -> u32 {
        self.next_carton_number
    }

    /// use `carton_id` verbatim instead of the derived carton id, blank text disables the override
    pub fn set_carton_override(&mut self, carton_id: Option<&str>) {
        self.carton_override = non_blank(carton_id);
        match &self.carton_override {
            Some(carton_id) => info!("carton ID override enabled: {}", carton_id),
            None => info!("carton ID override disabled"),
        }
    }

    pub fn carton_override(&self) -> Option<&str> {
        self.carton_override.as_deref()
    }

    /// use `timestamp` verbatim instead of the current time, blank text disables the override
    pub fn set_timestamp_override(&mut self, timestamp: Option<&str>) {
        self.timestamp_override = non_blank(timestamp);
        match &self.timestamp_override {
            Some(timestamp) => info!("date override enabled: {}", timestamp),
            None => info!("date override disabled"),
        }
    }

    pub fn timestamp_override(&self) -> Option<&str> {
        self.timestamp_override.as_deref()
    }

    /// take a snapshot of the session for printing
    ///
    /// later edits to the session do not affect the returned job
    pub fn submit(&self, now: NaiveDateTime) -> Result<PrintJob> {
        if !self.can_submit() {
            return Err(anyhow!(
                "at least {} scanned items are required to print, got {}",
                MIN_RECORDS_PER_LABEL,
                self.records.len()
            ));
        }
        let (carton_id, carton_number) = match &self.carton_override {
            Some(carton_id) => {
                info!("using override carton ID: {}", carton_id);
                (carton_id.clone(), None)
            }
            None => (
                carton_id(now, self.next_carton_number),
                Some(self.next_carton_number),
            ),
        };
        let timestamp = match &self.timestamp_override {
            Some(timestamp) => {
                info!("using override date: {}", timestamp);
                timestamp.clone()
            }
            None => pack_timestamp(now),
        };
        Ok(PrintJob {
            carton_id,
            timestamp,
            records: self.records.clone(),
            carton_number,
        })
    }

    /// apply the outcome of a finished print job to the carton counter
    ///
    /// the counter only advances after a successful job whose carton id was derived from it
    pub fn record_print_outcome(
        &mut self,
        carton_number: Option<u32>,
        outcome: &JobOutcome,
        store: &CounterStore,
    ) {
        if !outcome.success {
            warn!("carton counter not incremented (print failed)");
            return;
        }
        match carton_number {
            Some(number) => {
                self.next_carton_number = number.saturating_add(1);
                store.save(self.next_carton_number);
                info!("carton counter incremented to: {}", self.next_carton_number);
            }
            None => info!("carton counter NOT incremented (override used)"),
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn session_with(records: &[&str]) -> Session {
        let mut session = Session::new(PrinterSettings::default(), 7);
        for record in records {
            session.scan(record);
        }
        session
    }

    fn succeeded() -> JobOutcome {
        JobOutcome {
            success: true,
            message: "printed".to_string(),
        }
    }

    #[test]
    fn test_scan_extracts_serial_number() {
        let mut session = session_with(&[]);
        assert_eq!(
            session.scan("EBD S/N: HAA02-2544-336PCB S/No: HB25390000142PCB"),
            Some("HAA02-2544-336")
        );
        assert_eq!(session.scan("  raw-value \n"), Some("raw-value"));
        assert_eq!(session.scan("   "), None);
        assert_eq!(session.records(), &["HAA02-2544-336", "raw-value"]);
    }

    #[test]
    fn test_minimum_records_to_submit() {
        assert!(session_with(&[]).submit(now()).is_err());
        assert!(session_with(&["A"]).submit(now()).is_err());
        assert!(!session_with(&["A"]).can_submit());
        assert!(session_with(&["A", "B"]).submit(now()).is_ok());
        assert!(session_with(&["A", "B"]).can_submit());
    }

    #[test]
    fn test_delete_renumbers_entries() {
        let mut session = session_with(&["A", "B", "C", "D"]);
        assert_eq!(session.delete(1).as_deref(), Some("B"));
        assert_eq!(session.entries(), vec!["01. A", "02. C", "03. D"]);
        assert_eq!(session.delete(3), None);
        assert_eq!(session.records().len(), 3);
    }

    #[test]
    fn test_submit_derives_carton_id_and_timestamp() -> Result<()> {
        let job = session_with(&["A", "B"]).submit(now())?;
        assert_eq!(job.carton_id, "C2544-007");
        assert_eq!(job.timestamp, "2025-11-03 09:30:00");
        assert_eq!(job.carton_number, Some(7));
        assert_eq!(job.records, vec!["A", "B"]);
        Ok(())
    }

    #[test]
    fn test_submit_uses_overrides() -> Result<()> {
        let mut session = session_with(&["A", "B"]);
        session.set_carton_override(Some(" 2544-001 "));
        session.set_timestamp_override(Some("2025-06-01 10:00:00"));
        let job = session.submit(now())?;
        assert_eq!(job.carton_id, "2544-001");
        assert_eq!(job.timestamp, "2025-06-01 10:00:00");
        assert_eq!(job.carton_number, None);

        session.set_carton_override(Some(""));
        session.set_timestamp_override(None);
        let job = session.submit(now())?;
        assert_eq!(job.carton_id, "C2544-007");
        assert_eq!(job.timestamp, "2025-11-03 09:30:00");
        Ok(())
    }

    #[test]
    fn test_job_is_a_snapshot() -> Result<()> {
        let mut session = session_with(&["A", "B", "C"]);
        let job = session.submit(now())?;
        session.delete(0);
        session.scan("D");
        assert_eq!(job.records, vec!["A", "B", "C"]);
        Ok(())
    }

    #[test]
    fn test_counter_advances_after_success() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = CounterStore::new(dir.path().join("carton_counter.txt"));
        let mut session = session_with(&["A", "B"]);
        let job = session.submit(now())?;
        session.record_print_outcome(job.carton_number, &succeeded(), &store);
        assert_eq!(session.next_carton_number(), 8);
        assert_eq!(store.load(), 8);
        Ok(())
    }

    #[test]
    fn test_counter_unchanged_with_override() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = CounterStore::new(dir.path().join("carton_counter.txt"));
        store.save(7);
        let mut session = session_with(&["A", "B"]);
        session.set_carton_override(Some("2544-001"));
        let job = session.submit(now())?;
        session.record_print_outcome(job.carton_number, &succeeded(), &store);
        assert_eq!(session.next_carton_number(), 7);
        assert_eq!(store.load(), 7);
        Ok(())
    }

    #[test]
    fn test_counter_unchanged_after_failure() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = CounterStore::new(dir.path().join("carton_counter.txt"));
        store.save(7);
        let mut session = session_with(&["A", "B"]);
        let job = session.submit(now())?;
        let failed = JobOutcome {
            success: false,
            message: "failed to connect to printer".to_string(),
        };
        session.record_print_outcome(job.carton_number, &failed, &store);
        assert_eq!(session.next_carton_number(), 7);
        assert_eq!(store.load(), 7);
        Ok(())
    }
}
