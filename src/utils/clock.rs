use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use log::warn;

/// Wall-clock reading of `utc` at `offset_minutes` east of UTC, or `None`
/// when the offset is out of range.
pub fn at_offset(utc: DateTime<Utc>, offset_minutes: i32) -> Option<NaiveDateTime> {
    let offset = FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
    Some(utc.with_timezone(&offset).naive_local())
}

/// "Now" in the frame prayer times are calculated in: the configured UTC
/// offset if there is one, the system zone otherwise.
pub fn now(offset_minutes: Option<i32>) -> NaiveDateTime {
    match offset_minutes {
        None => Local::now().naive_local(),
        Some(minutes) => at_offset(Utc::now(), minutes).unwrap_or_else(|| {
            warn!("Invalid timezone offset {}; using the system clock", minutes);
            Local::now().naive_local()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn shifts_utc_by_the_offset() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 22, 30, 0).unwrap();
        let riyadh = at_offset(utc, 180).unwrap();
        assert_eq!(
            riyadh,
            NaiveDate::from_ymd_opt(2024, 6, 2)
                .unwrap()
                .and_hms_opt(1, 30, 0)
                .unwrap()
        );
        let new_york = at_offset(utc, -240).unwrap();
        assert_eq!(new_york.format("%Y-%m-%d %H:%M").to_string(), "2024-06-01 18:30");
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert!(at_offset(utc, 100_000).is_none());
        assert!(at_offset(utc, i32::MAX).is_none());
    }

    #[test]
    fn configured_offset_ignores_system_zone() {
        let expected = at_offset(Utc::now(), 330).unwrap();
        let got = now(Some(330));
        assert!((got - expected).num_seconds().abs() <= 1);
    }
}
