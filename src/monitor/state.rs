use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::config::EnabledSet;
use crate::prayer_times::PrayerTimeTable;

/// State the UI writes and the monitor reads. Each field is swapped as a
/// whole; readers get clones.
#[derive(Debug, Default)]
pub struct MonitorState {
    table: RwLock<PrayerTimeTable>,
    enabled: RwLock<EnabledSet>,
    audio_file: RwLock<Option<PathBuf>>,
}

impl MonitorState {
    pub fn new(enabled: EnabledSet, audio_file: Option<PathBuf>) -> Self {
        Self {
            table: RwLock::new(PrayerTimeTable::new()),
            enabled: RwLock::new(enabled),
            audio_file: RwLock::new(audio_file),
        }
    }

    pub fn table(&self) -> PrayerTimeTable {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_table(&self, table: PrayerTimeTable) {
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = table;
    }

    pub fn enabled(&self) -> EnabledSet {
        *self.enabled.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_enabled(&self, enabled: EnabledSet) {
        *self.enabled.write().unwrap_or_else(PoisonError::into_inner) = enabled;
    }

    pub fn audio_file(&self) -> Option<PathBuf> {
        self.audio_file
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_audio_file(&self, file: Option<PathBuf>) {
        *self.audio_file.write().unwrap_or_else(PoisonError::into_inner) = file;
    }
}
