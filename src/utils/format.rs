use chrono::NaiveTime;
use log::warn;

/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: i64) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// "18:00" -> "06:00 PM". Input that isn't "HH:MM" comes back untouched.
pub fn to_12h(time_str: &str) -> String {
    match NaiveTime::parse_from_str(time_str, "%H:%M") {
        Ok(t) => t.format("%I:%M %p").to_string(),
        Err(e) => {
            warn!("Error converting time {}: {}", time_str, e);
            time_str.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_hour_conversion() {
        assert_eq!(to_12h("05:30"), "05:30 AM");
        assert_eq!(to_12h("18:00"), "06:00 PM");
        assert_eq!(to_12h("00:05"), "12:05 AM");
        assert_eq!(to_12h("--:--"), "--:--");
        assert_eq!(to_12h("25:99"), "25:99");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration_secs(0), "now");
        assert_eq!(format_duration_secs(59 * 60), "59m");
        assert_eq!(format_duration_secs(2 * 3600 + 5 * 60 + 30), "2h 5m");
    }
}
