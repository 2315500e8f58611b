use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::audio::{AdhaanPlayer, AudioError};
use crate::config::{AppConfig, LocationMode, REFRESH_CHOICES};
use crate::db::VoiceRepo;
use crate::location::{self, Coordinates, Geocoder};
use crate::models::{PrayerType, Voice};
use crate::monitor::{MonitorHandle, MonitorState, PrayerMonitor};
use crate::prayer_times::calculator::canonical_method;
use crate::prayer_times::{PrayerCalculator, PrayerTimeTable};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no Adhaan audio file selected")]
    NoAudioSelected,
    #[error("unknown voice '{0}'")]
    UnknownVoice(String),
    #[error("refresh interval must be 1, 2, 5, 10, 15 or 30 minutes, got {0}")]
    BadInterval(u32),
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// Whether a test Adhaan is now playing or was just stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPlayback {
    Started,
    Stopped,
}

/// Owns the app's settings and live state; the UI drives it and the
/// monitor reads from its shared [`MonitorState`].
pub struct Controller {
    pub config: AppConfig,
    config_path: Option<PathBuf>,
    voices_path: PathBuf,
    voices: Vec<Voice>,
    coords: Coordinates,
    state: Arc<MonitorState>,
    player: Arc<dyn AdhaanPlayer>,
    geocoder: Box<dyn Geocoder>,
    testing: bool,
}

impl Controller {
    /// `config_path` is where settings changes get saved; `None` keeps them
    /// in memory only.
    pub fn new(
        config: AppConfig,
        config_path: Option<PathBuf>,
        player: Arc<dyn AdhaanPlayer>,
        geocoder: Box<dyn Geocoder>,
    ) -> Result<Self> {
        let voices_path = config.voices_path()?;
        let voices = VoiceRepo::load(&voices_path);
        let coords = Coordinates::new(config.location.latitude, config.location.longitude);
        let state = Arc::new(MonitorState::new(config.adhaan.enabled, None));

        let mut controller = Self {
            config,
            config_path,
            voices_path,
            voices,
            coords,
            state,
            player,
            geocoder,
            testing: false,
        };
        if controller.config.adhaan.voice.is_none() {
            controller.config.adhaan.voice = controller.voices.first().map(|v| v.name.clone());
        }
        controller.sync_audio_file();
        Ok(controller)
    }

    pub fn state(&self) -> Arc<MonitorState> {
        self.state.clone()
    }

    pub fn table(&self) -> PrayerTimeTable {
        self.state.table()
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voices_path(&self) -> &Path {
        &self.voices_path
    }

    pub fn is_testing(&self) -> bool {
        self.testing && self.player.is_playing()
    }

    fn calculator(&self) -> Result<PrayerCalculator> {
        PrayerCalculator::new(
            self.coords.latitude,
            self.coords.longitude,
            &self.config.prayer.calc_method,
            &self.config.prayer.madhab,
            self.config.prayer.effective_tz_offset(),
        )
    }

    /// Current time in the frame the table is calculated in.
    pub fn now(&self) -> NaiveDateTime {
        self.config.prayer.now()
    }

    /// Recomputes today's table and swaps it in.
    pub fn refresh_times(&self) -> PrayerTimeTable {
        self.refresh_times_on(self.now().date())
    }

    pub fn refresh_times_on(&self, date: NaiveDate) -> PrayerTimeTable {
        info!("Updating prayer times...");
        let table = match self.calculator() {
            Ok(calc) => calc.table_or_empty(date),
            Err(e) => {
                error!("Error calculating prayer times: {:#}", e);
                PrayerTimeTable::new()
            }
        };
        self.state.set_table(table.clone());
        table
    }

    /// Runs the location chain, then refreshes the times for the new spot.
    pub fn update_location(&mut self) -> Coordinates {
        self.coords = location::resolve(&self.config.location, self.geocoder.as_ref());
        self.refresh_times();
        self.coords
    }

    /// Stores the current coordinates as the manual location.
    pub fn save_location(&mut self) -> Result<()> {
        self.config.location.mode = LocationMode::Manual;
        self.config.location.latitude = self.coords.latitude;
        self.config.location.longitude = self.coords.longitude;
        self.persist()
    }

    pub fn set_method(&mut self, method: &str) -> Result<()> {
        let method = canonical_method(method)?;
        self.config.prayer.calc_method = method.to_string();
        info!("Calculation method changed to: {}", method);
        self.persist()?;
        self.refresh_times();
        Ok(())
    }

    pub fn set_refresh_minutes(&mut self, minutes: u32) -> Result<()> {
        if !REFRESH_CHOICES.contains(&minutes) {
            return Err(ControllerError::BadInterval(minutes).into());
        }
        self.config.prayer.refresh_minutes = minutes;
        info!("Auto fetch interval updated to {} min", minutes);
        self.persist()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.config.prayer.refresh_minutes.max(1)) * 60)
    }

    /// Flips a prayer's Adhaan and returns whether it is now on.
    pub fn toggle_prayer(&mut self, prayer: PrayerType) -> Result<bool> {
        let on = self.config.adhaan.enabled.toggle(prayer);
        self.state.set_enabled(self.config.adhaan.enabled);
        info!(
            "Adhaan for {} {}.",
            prayer,
            if on { "enabled" } else { "disabled" }
        );
        self.persist()?;
        Ok(on)
    }

    pub fn select_voice(&mut self, name: &str) -> Result<()> {
        let voice = VoiceRepo::find(&self.voices, name)
            .ok_or_else(|| ControllerError::UnknownVoice(name.to_string()))?;
        self.config.adhaan.voice = Some(voice.name.clone());
        self.config.adhaan.custom_file = None;
        self.sync_audio_file();
        self.persist()
    }

    pub fn select_custom_file(&mut self, path: PathBuf) -> Result<()> {
        info!("Manual voice file selected: {:?}", path);
        self.config.adhaan.custom_file = Some(path);
        self.sync_audio_file();
        self.persist()
    }

    pub fn vote(&mut self, name: &str) -> Result<Voice> {
        let voice = VoiceRepo::vote(&self.voices_path, name)?;
        self.voices = VoiceRepo::load(&self.voices_path);
        Ok(voice)
    }

    /// The file the next Adhaan will play: the custom file if set, otherwise
    /// the selected voice's recording.
    pub fn audio_file(&self) -> Option<PathBuf> {
        if let Some(custom) = &self.config.adhaan.custom_file {
            return Some(custom.clone());
        }
        let name = self.config.adhaan.voice.as_deref()?;
        match VoiceRepo::find(&self.voices, name) {
            Some(voice) => Some(VoiceRepo::resolve_file(&self.voices_path, voice)),
            None => {
                warn!("No matching voice found in database.");
                None
            }
        }
    }

    /// Label of the current selection for display.
    pub fn selection_label(&self) -> String {
        if let Some(custom) = &self.config.adhaan.custom_file {
            let name = custom
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| custom.display().to_string());
            return format!("Custom: {}", name);
        }
        self.config
            .adhaan
            .voice
            .as_deref()
            .and_then(|name| VoiceRepo::find(&self.voices, name))
            .map(|v| v.label())
            .unwrap_or_else(|| "None".to_string())
    }

    fn sync_audio_file(&self) {
        self.state.set_audio_file(self.audio_file());
    }

    /// Starts the test Adhaan, or stops it if one is playing.
    pub fn toggle_test(&mut self) -> Result<TestPlayback, ControllerError> {
        if self.is_testing() {
            self.player.stop();
            self.testing = false;
            return Ok(TestPlayback::Stopped);
        }
        let file = self.audio_file().ok_or(ControllerError::NoAudioSelected)?;
        self.player.play(&file)?;
        self.testing = true;
        Ok(TestPlayback::Started)
    }

    pub fn stop_audio(&mut self) {
        self.player.stop();
        self.testing = false;
    }

    pub fn start_monitor(&self) -> Result<MonitorHandle> {
        let interval = self.config.adhaan.poll_interval();
        PrayerMonitor::new(
            self.state.clone(),
            self.player.clone(),
            self.config.prayer.timezone_offset,
        )
        .spawn(interval)
        .context("Spawning prayer monitor")
    }

    fn persist(&self) -> Result<()> {
        match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => Ok(()),
        }
    }
}
