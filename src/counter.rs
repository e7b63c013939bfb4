use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// file the next carton sequence number is kept in when nothing else is configured
pub const DEFAULT_COUNTER_FILE: &str = "carton_counter.txt";

/// sequence number used when no counter has been persisted yet
pub const FIRST_CARTON_NUMBER: u32 = 1;

/// file backed store for the next carton sequence number
///
/// the file holds a single decimal integer, there is no protection against concurrent writers
#[derive(Debug, Clone)]
pub struct CounterStore {
    path: PathBuf,
}

impl CounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CounterStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// read the next carton number
    ///
    /// # Returns
    ///
    /// * the persisted number, or [`FIRST_CARTON_NUMBER`] if the file is missing or unreadable
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(value) => {
                debug!("loaded carton counter {} from {}", value, self.path.display());
                value
            }
            Err(err) => {
                debug!("no usable carton counter ({:#}), starting at {}", err, FIRST_CARTON_NUMBER);
                FIRST_CARTON_NUMBER
            }
        }
    }

    /// persist the next carton number
    ///
    /// best effort, a failure is logged and otherwise ignored
    pub fn save(&self, value: u32) {
        if let Err(err) = self.try_save(value) {
            warn!("could not save carton counter: {:#}", err);
        }
    }

    fn try_load(&self) -> Result<u32> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let value = content
            .trim()
            .parse::<u32>()
            .with_context(|| format!("parsing {:?}", content.trim()))?;
        Ok(value)
    }

    fn try_save(&self, value: u32) -> Result<()> {
        fs::write(&self.path, value.to_string())
            .with_context(|| format!("writing {}", self.path.display()))?;
        debug!("saved carton counter {} to {}", value, self.path.display());
        Ok(())
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        CounterStore::new(DEFAULT_COUNTER_FILE)
    }
}
