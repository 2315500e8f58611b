pub mod calculator;
pub mod table;

pub use calculator::{next_prayer, PrayerCalculator, CALC_METHODS};
pub use table::PrayerTimeTable;
