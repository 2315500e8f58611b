use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::location::FALLBACK;
use crate::models::PrayerType;
use crate::utils::clock;

fn default_latitude() -> f64 {
    FALLBACK.latitude
}
fn default_longitude() -> f64 {
    FALLBACK.longitude
}
fn default_region() -> String {
    "USA".to_string()
}
fn default_calc_method() -> String {
    "ISNA".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}
fn default_refresh_minutes() -> u32 {
    5
}
fn default_poll_seconds() -> u64 {
    10
}
fn default_hijri_offset() -> i32 {
    0
}
fn default_true() -> bool {
    true
}

/// Refresh intervals offered in the UI, in minutes.
pub const REFRESH_CHOICES: &[u32] = &[1, 2, 5, 10, 15, 30];

const MAX_POLL_SECONDS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationMode {
    #[default]
    Auto,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub mode: LocationMode,
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default)]
    pub zip: String,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            mode: LocationMode::Auto,
            latitude: default_latitude(),
            longitude: default_longitude(),
            zip: String::new(),
            region: default_region(),
        }
    }
}

impl LocationConfig {
    /// Applies `locate` overrides. `auto` switches to IP lookup; explicit
    /// coordinates or a ZIP switch to manual mode. A ZIP given without
    /// coordinates blanks the stored pair so the ZIP lookup is used.
    pub fn apply_overrides(
        &mut self,
        auto: bool,
        coords: Option<(f64, f64)>,
        zip: Option<String>,
        region: Option<String>,
    ) {
        if auto {
            self.mode = LocationMode::Auto;
        } else if coords.is_some() || zip.is_some() {
            self.mode = LocationMode::Manual;
            let (lat, lng) = coords.unwrap_or((f64::NAN, f64::NAN));
            self.latitude = lat;
            self.longitude = lng;
        }
        if let Some(zip) = zip {
            self.zip = zip;
        }
        if let Some(region) = region {
            self.region = region;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerConfig {
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
    /// Minutes from UTC. Unset means "use the system's local offset".
    #[serde(default)]
    pub timezone_offset: Option<i32>,
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u32,
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
}

impl Default for PrayerConfig {
    fn default() -> Self {
        Self {
            calc_method: default_calc_method(),
            madhab: default_madhab(),
            timezone_offset: None,
            refresh_minutes: default_refresh_minutes(),
            hijri_offset: default_hijri_offset(),
        }
    }
}

impl PrayerConfig {
    pub fn effective_tz_offset(&self) -> i32 {
        self.timezone_offset
            .unwrap_or_else(|| chrono::Local::now().offset().local_minus_utc() / 60)
    }

    /// Current wall-clock time in the frame the prayer times use.
    pub fn now(&self) -> NaiveDateTime {
        clock::now(self.timezone_offset)
    }
}

/// Per-prayer Adhaan switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledSet {
    #[serde(default = "default_true")]
    pub fajr: bool,
    #[serde(default = "default_true")]
    pub dhuhr: bool,
    #[serde(default = "default_true")]
    pub asr: bool,
    #[serde(default = "default_true")]
    pub maghrib: bool,
    #[serde(default = "default_true")]
    pub isha: bool,
}

impl Default for EnabledSet {
    fn default() -> Self {
        Self {
            fajr: true,
            dhuhr: true,
            asr: true,
            maghrib: true,
            isha: true,
        }
    }
}

impl EnabledSet {
    fn slot_mut(&mut self, prayer: PrayerType) -> &mut bool {
        match prayer {
            PrayerType::Fajr => &mut self.fajr,
            PrayerType::Dhuhr => &mut self.dhuhr,
            PrayerType::Asr => &mut self.asr,
            PrayerType::Maghrib => &mut self.maghrib,
            PrayerType::Isha => &mut self.isha,
        }
    }

    pub fn is_enabled(&self, prayer: PrayerType) -> bool {
        match prayer {
            PrayerType::Fajr => self.fajr,
            PrayerType::Dhuhr => self.dhuhr,
            PrayerType::Asr => self.asr,
            PrayerType::Maghrib => self.maghrib,
            PrayerType::Isha => self.isha,
        }
    }

    pub fn set(&mut self, prayer: PrayerType, enabled: bool) {
        *self.slot_mut(prayer) = enabled;
    }

    /// Flips the switch and returns the new value.
    pub fn toggle(&mut self, prayer: PrayerType) -> bool {
        let slot = self.slot_mut(prayer);
        *slot = !*slot;
        *slot
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdhaanConfig {
    #[serde(default)]
    pub enabled: EnabledSet,
    /// Name of the selected voice from the voice database.
    #[serde(default)]
    pub voice: Option<String>,
    /// Custom audio file; takes precedence over `voice`.
    #[serde(default)]
    pub custom_file: Option<PathBuf>,
    #[serde(default)]
    pub voices_path: Option<PathBuf>,
    #[serde(default = "default_poll_seconds")]
    pub poll_seconds: u64,
}

impl Default for AdhaanConfig {
    fn default() -> Self {
        Self {
            enabled: EnabledSet::default(),
            voice: None,
            custom_file: None,
            voices_path: None,
            poll_seconds: default_poll_seconds(),
        }
    }
}

impl AdhaanConfig {
    /// Monitor poll interval. Capped at 30 s so every minute gets at least
    /// one check.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_seconds.clamp(1, MAX_POLL_SECONDS))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub prayer: PrayerConfig,
    #[serde(default)]
    pub adhaan: AdhaanConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "adhaan").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("adhaan.log"))
    }

    /// Location of the voice database, honouring the config override.
    pub fn voices_path(&self) -> Result<PathBuf> {
        match &self.adhaan.voices_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("adhan_votes.json")),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.location.mode, LocationMode::Auto);
        assert_eq!(config.location.latitude, 21.3891);
        assert_eq!(config.location.longitude, 39.8579);
        assert_eq!(config.prayer.calc_method, "ISNA");
        assert_eq!(config.prayer.refresh_minutes, 5);
        assert_eq!(config.adhaan.poll_seconds, 10);
        assert_eq!(config.adhaan.enabled, EnabledSet::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[location]\nmode = \"manual\"\nzip = \"10001\"\n\n[adhaan.enabled]\nasr = false\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.location.mode, LocationMode::Manual);
        assert_eq!(config.location.zip, "10001");
        assert_eq!(config.location.region, "USA");
        assert!(!config.adhaan.enabled.is_enabled(PrayerType::Asr));
        assert!(config.adhaan.enabled.is_enabled(PrayerType::Isha));
    }

    #[test]
    fn save_then_load_keeps_toggles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.adhaan.enabled.toggle(PrayerType::Fajr);
        config.prayer.timezone_offset = Some(180);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert!(!loaded.adhaan.enabled.fajr);
        assert_eq!(loaded.prayer.timezone_offset, Some(180));
    }

    #[test]
    fn toggle_returns_new_state() {
        let mut set = EnabledSet::default();
        assert!(!set.toggle(PrayerType::Maghrib));
        assert!(set.toggle(PrayerType::Maghrib));
        set.set(PrayerType::Isha, false);
        assert!(!set.is_enabled(PrayerType::Isha));
    }

    #[test]
    fn poll_interval_is_clamped() {
        let mut adhaan = AdhaanConfig::default();
        assert_eq!(adhaan.poll_interval(), Duration::from_secs(10));
        adhaan.poll_seconds = 0;
        assert_eq!(adhaan.poll_interval(), Duration::from_secs(1));
        adhaan.poll_seconds = 90;
        assert_eq!(adhaan.poll_interval(), Duration::from_secs(30));
    }

    #[test]
    fn zip_override_blanks_stored_coordinates() {
        let mut location = LocationConfig::default();
        location.apply_overrides(false, None, Some("10001".to_string()), None);
        assert_eq!(location.mode, LocationMode::Manual);
        assert!(location.latitude.is_nan());
        assert!(location.longitude.is_nan());
        assert_eq!(location.zip, "10001");
        assert_eq!(location.region, "USA");
    }

    #[test]
    fn coordinate_override_is_stored() {
        let mut location = LocationConfig::default();
        location.apply_overrides(false, Some((40.71, -74.0)), None, Some("".to_string()));
        assert_eq!(location.mode, LocationMode::Manual);
        assert_eq!((location.latitude, location.longitude), (40.71, -74.0));
        assert_eq!(location.region, "");
    }

    #[test]
    fn auto_override_keeps_stored_coordinates() {
        let mut location = LocationConfig {
            mode: LocationMode::Manual,
            latitude: 51.5,
            longitude: -0.12,
            ..LocationConfig::default()
        };
        location.apply_overrides(true, None, None, None);
        assert_eq!(location.mode, LocationMode::Auto);
        assert_eq!(location.latitude, 51.5);
    }

    #[test]
    fn prayer_now_follows_configured_offset() {
        let prayer = PrayerConfig {
            timezone_offset: Some(-600),
            ..PrayerConfig::default()
        };
        let expected = clock::at_offset(chrono::Utc::now(), -600).unwrap();
        assert!((prayer.now() - expected).num_seconds().abs() <= 1);
    }
}
