use chrono::{NaiveTime, Timelike};
use std::collections::BTreeMap;

use crate::models::TimeSlot;
use crate::utils::format::format_time;

/// Shown for any slot the table has no time for.
pub const UNSET: &str = "--:--";

/// One day's computed times at minute precision.
///
/// Tables are never patched in place: every recomputation builds a new one
/// and swaps it in whole. An empty table means the calculation failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrayerTimeTable {
    times: BTreeMap<TimeSlot, NaiveTime>,
}

impl PrayerTimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `time` with its seconds dropped.
    pub fn insert(&mut self, slot: TimeSlot, time: NaiveTime) {
        let minute = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
        self.times.insert(slot, minute);
    }

    pub fn get(&self, slot: TimeSlot) -> Option<NaiveTime> {
        self.times.get(&slot).copied()
    }

    /// 24-hour "HH:MM", or [`UNSET`] when missing.
    pub fn hhmm(&self, slot: TimeSlot) -> String {
        self.get(slot)
            .map(format_time)
            .unwrap_or_else(|| UNSET.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl std::fmt::Display for PrayerTimeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = TimeSlot::ALL
            .iter()
            .map(|slot| format!("{}={}", slot.key(), self.hhmm(*slot)))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}
