pub mod settings;

pub use settings::{AppConfig, EnabledSet, LocationMode, REFRESH_CHOICES};
