use chrono::{Datelike, Duration, NaiveDate};
use hijri_date::HijriDate;

/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

fn hijri_month_name(month: usize) -> &'static str {
    if month >= 1 && month <= 12 {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "Unknown"
    }
}

/// Hijri date for `date`, shifted by `offset_days` for local moon sighting.
pub fn hijri_string(date: NaiveDate, offset_days: i32) -> String {
    let adjusted = date + Duration::days(offset_days as i64);

    match HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    ) {
        Ok(hd) => format!("{} {} {}", hd.day(), hijri_month_name(hd.month()), hd.year()),
        Err(_) => {
            // Out of the supported range: show today instead
            let hd = HijriDate::today();
            format!("{} {} {}", hd.day(), hijri_month_name(hd.month()), hd.year())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_are_one_based() {
        assert_eq!(hijri_month_name(1), "Muharram");
        assert_eq!(hijri_month_name(9), "Ramadan");
        assert_eq!(hijri_month_name(13), "Unknown");
    }

    #[test]
    fn offset_shifts_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let plain = hijri_string(date, 0);
        let shifted = hijri_string(date, -1);
        assert_ne!(plain, shifted);
        assert!(plain.contains("Ramadan"));
    }
}
