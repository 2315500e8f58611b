use anyhow::{anyhow, Result};
use chrono::{Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use log::{error, info};
use salah::prelude::*;

use crate::models::{PrayerType, TimeSlot};
use crate::prayer_times::table::PrayerTimeTable;

#[derive(Debug, Clone)]
pub struct PrayerTimesLocal {
    pub fajr: NaiveTime,
    pub sunrise: NaiveTime,
    pub dhuhr: NaiveTime,
    pub asr: NaiveTime,
    pub maghrib: NaiveTime,
    pub isha: NaiveTime,
}

pub struct PrayerCalculator {
    pub lat: f64,
    pub lng: f64,
    pub method_str: String,
    pub madhab_str: String,
    pub tz_offset_minutes: i32,
}

impl PrayerCalculator {
    pub fn new(
        lat: f64,
        lng: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: i32,
    ) -> Result<Self> {
        // Validate method + madhab early
        parse_method(method)?;
        parse_madhab(madhab)?;
        Ok(Self {
            lat,
            lng,
            method_str: method.to_string(),
            madhab_str: madhab.to_string(),
            tz_offset_minutes,
        })
    }

    /// The six computed times for `date`, in the configured local offset.
    pub fn times_for_date(&self, date: NaiveDate) -> Result<PrayerTimesLocal> {
        let coords = Coordinates::new(self.lat, self.lng);
        let method = parse_method(&self.method_str)?;
        let madhab = parse_madhab(&self.madhab_str)?;
        let params = Configuration::with(method, madhab);

        let times = PrayerSchedule::new()
            .on(date)
            .for_location(coords)
            .with_configuration(params)
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", self.tz_offset_minutes))?;

        let to_local = |utc: chrono::DateTime<chrono::Utc>| -> NaiveTime {
            utc.with_timezone(&offset).time()
        };

        Ok(PrayerTimesLocal {
            fajr: to_local(times.time(Prayer::Fajr)),
            sunrise: to_local(times.time(Prayer::Sunrise)),
            dhuhr: to_local(times.time(Prayer::Dhuhr)),
            asr: to_local(times.time(Prayer::Asr)),
            maghrib: to_local(times.time(Prayer::Maghrib)),
            isha: to_local(times.time(Prayer::Isha)),
        })
    }

    /// Full table for `today`, including the night markers derived from
    /// tomorrow's fajr and sunrise.
    pub fn table_for(&self, today: NaiveDate) -> Result<PrayerTimeTable> {
        let times = self.times_for_date(today)?;
        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| anyhow!("No day after {}", today))?;
        let next = self.times_for_date(tomorrow)?;

        // Maghrib doubles as sunset for the night arithmetic.
        let sunset = today.and_time(times.maghrib);
        let next_fajr = tomorrow.and_time(next.fajr);
        let next_sunrise = tomorrow.and_time(next.sunrise);

        let mut table = PrayerTimeTable::new();
        table.insert(TimeSlot::Fajr, times.fajr);
        table.insert(TimeSlot::Sunrise, times.sunrise);
        table.insert(TimeSlot::Dhuhr, times.dhuhr);
        table.insert(TimeSlot::Asr, times.asr);
        table.insert(TimeSlot::Maghrib, times.maghrib);
        table.insert(TimeSlot::Isha, times.isha);
        table.insert(TimeSlot::Midnight, midnight(sunset, next_sunrise).time());
        table.insert(TimeSlot::LastThird, last_third(sunset, next_fajr).time());
        Ok(table)
    }

    /// Like [`table_for`](Self::table_for), but any failure yields the empty
    /// table instead of an error.
    pub fn table_or_empty(&self, today: NaiveDate) -> PrayerTimeTable {
        match self.table_for(today) {
            Ok(table) => {
                info!("Prayer times for {}: {}", today, table);
                table
            }
            Err(e) => {
                error!("Error calculating prayer times: {:#}", e);
                PrayerTimeTable::new()
            }
        }
    }
}

/// Start of the last third of the night: two thirds of the way from
/// sunset to the next fajr.
pub fn last_third(sunset: NaiveDateTime, next_fajr: NaiveDateTime) -> NaiveDateTime {
    let night = next_fajr - sunset;
    sunset + night * 2 / 3
}

/// Midway between sunset and the next sunrise.
pub fn midnight(sunset: NaiveDateTime, next_sunrise: NaiveDateTime) -> NaiveDateTime {
    let night = next_sunrise - sunset;
    sunset + night / 2
}

/// Returns (next PrayerType, seconds until it).
/// After isha this wraps to tomorrow's fajr, using today's fajr as the estimate.
pub fn next_prayer(table: &PrayerTimeTable, now_time: NaiveTime) -> Option<(PrayerType, i64)> {
    for prayer in PrayerType::all() {
        if let Some(time) = table.get(prayer.slot()) {
            if time > now_time {
                return Some((prayer, (time - now_time).num_seconds()));
            }
        }
    }

    // Past isha: tomorrow's fajr
    let fajr = table.get(TimeSlot::Fajr)?;
    let secs = (Duration::days(1) - (now_time - fajr)).num_seconds();
    Some((PrayerType::Fajr, secs))
}

pub fn parse_method(s: &str) -> Result<Method> {
    match s.to_lowercase().as_str() {
        "isna" => Ok(Method::NorthAmerica),
        "mwl" => Ok(Method::MuslimWorldLeague),
        "egypt" => Ok(Method::Egyptian),
        "makkah" => Ok(Method::UmmAlQura),
        "karachi" => Ok(Method::Karachi),
        "tehran" => Ok(Method::Tehran),
        _ => Err(anyhow!(
            "Unknown calculation method: '{}'. Use one of: {}",
            s,
            CALC_METHODS.join(", ")
        )),
    }
}

/// Normalises a user-typed method name to its entry in [`CALC_METHODS`].
pub fn canonical_method(s: &str) -> Result<&'static str> {
    CALC_METHODS
        .iter()
        .copied()
        .find(|m| m.eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| anyhow!("Unknown calculation method: '{}'", s))
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

pub const CALC_METHODS: &[&str] = &["ISNA", "MWL", "Egypt", "Makkah", "Karachi", "Tehran"];

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn last_third_is_two_thirds_into_the_night() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let tomorrow = today.succ_opt().unwrap();
        let sunset = at(today, 18, 0);
        let fajr = at(tomorrow, 5, 0);

        let third = last_third(sunset, fajr);
        assert_eq!(third, at(tomorrow, 1, 20));
        assert!(third > sunset && third < fajr);
    }

    #[test]
    fn midnight_is_halfway_to_sunrise() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let tomorrow = today.succ_opt().unwrap();
        let mid = midnight(at(today, 18, 30), at(tomorrow, 6, 30));
        assert_eq!(mid, at(tomorrow, 0, 30));
    }

    #[test]
    fn table_for_mecca_is_complete_and_ordered() {
        let calc = PrayerCalculator::new(21.3891, 39.8579, "Makkah", "Shafi", 180).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let table = calc.table_for(date).unwrap();

        assert!(TimeSlot::ALL.iter().all(|s| table.get(*s).is_some()));
        let fajr = table.get(TimeSlot::Fajr).unwrap();
        let sunrise = table.get(TimeSlot::Sunrise).unwrap();
        let dhuhr = table.get(TimeSlot::Dhuhr).unwrap();
        let asr = table.get(TimeSlot::Asr).unwrap();
        let maghrib = table.get(TimeSlot::Maghrib).unwrap();
        let isha = table.get(TimeSlot::Isha).unwrap();
        assert!(fajr < sunrise && sunrise < dhuhr && dhuhr < asr && asr < maghrib && maghrib < isha);

        // Mecca's night ends before sunrise, so both markers fall after midnight.
        let third = table.get(TimeSlot::LastThird).unwrap();
        let mid = table.get(TimeSlot::Midnight).unwrap();
        assert!(mid < third && third < fajr);
    }

    #[test]
    fn bad_offset_produces_empty_table() {
        let calc = PrayerCalculator::new(21.3891, 39.8579, "ISNA", "Shafi", 100_000).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(calc.table_for(date).is_err());

        let table = calc.table_or_empty(date);
        assert!(table.is_empty());
        assert_eq!(table.hhmm(TimeSlot::LastThird), "--:--");
    }

    #[test]
    fn methods_parse_case_insensitively() {
        for name in CALC_METHODS {
            assert!(parse_method(name).is_ok(), "{name}");
            assert!(parse_method(&name.to_uppercase()).is_ok(), "{name}");
        }
        assert!(parse_method("Jafari").is_err());
        assert!(PrayerCalculator::new(0.0, 0.0, "Bogus", "Shafi", 0).is_err());
        assert_eq!(canonical_method("makkah").unwrap(), "Makkah");
        assert!(canonical_method("Dubai").is_err());
    }

    #[test]
    fn next_prayer_counts_down_and_wraps() {
        let mut table = PrayerTimeTable::new();
        table.insert(TimeSlot::Fajr, hm(5, 0));
        table.insert(TimeSlot::Dhuhr, hm(12, 0));
        table.insert(TimeSlot::Asr, hm(15, 30));
        table.insert(TimeSlot::Maghrib, hm(18, 0));
        table.insert(TimeSlot::Isha, hm(19, 30));

        assert_eq!(next_prayer(&table, hm(11, 0)), Some((PrayerType::Dhuhr, 3600)));
        // 22:00 -> 05:00 tomorrow is seven hours
        assert_eq!(next_prayer(&table, hm(22, 0)), Some((PrayerType::Fajr, 7 * 3600)));
        assert_eq!(next_prayer(&PrayerTimeTable::new(), hm(22, 0)), None);
    }
}
