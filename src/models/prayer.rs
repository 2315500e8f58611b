use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five obligatory prayers. Only these trigger the Adhaan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerType {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerType {
    pub fn all() -> [PrayerType; 5] {
        [
            PrayerType::Fajr,
            PrayerType::Dhuhr,
            PrayerType::Asr,
            PrayerType::Maghrib,
            PrayerType::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "fajr",
            PrayerType::Dhuhr => "dhuhr",
            PrayerType::Asr => "asr",
            PrayerType::Maghrib => "maghrib",
            PrayerType::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "Fajr",
            PrayerType::Dhuhr => "Dhuhr",
            PrayerType::Asr => "Asr",
            PrayerType::Maghrib => "Maghrib",
            PrayerType::Isha => "Isha",
        }
    }

    pub fn slot(&self) -> TimeSlot {
        match self {
            PrayerType::Fajr => TimeSlot::Fajr,
            PrayerType::Dhuhr => TimeSlot::Dhuhr,
            PrayerType::Asr => TimeSlot::Asr,
            PrayerType::Maghrib => TimeSlot::Maghrib,
            PrayerType::Isha => TimeSlot::Isha,
        }
    }
}

impl std::fmt::Display for PrayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerType::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" => Ok(PrayerType::Dhuhr),
            "asr" => Ok(PrayerType::Asr),
            "maghrib" => Ok(PrayerType::Maghrib),
            "isha" => Ok(PrayerType::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer type: {}", s)),
        }
    }
}

/// Every row of the daily table, obligatory or informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Midnight,
    LastThird,
}

impl TimeSlot {
    /// Display order, earliest first.
    pub const ALL: [TimeSlot; 8] = [
        TimeSlot::Fajr,
        TimeSlot::Sunrise,
        TimeSlot::Dhuhr,
        TimeSlot::Asr,
        TimeSlot::Maghrib,
        TimeSlot::Isha,
        TimeSlot::Midnight,
        TimeSlot::LastThird,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TimeSlot::Fajr => "fajr",
            TimeSlot::Sunrise => "sunrise",
            TimeSlot::Dhuhr => "dhuhr",
            TimeSlot::Asr => "asr",
            TimeSlot::Maghrib => "maghrib",
            TimeSlot::Isha => "isha",
            TimeSlot::Midnight => "midnight",
            TimeSlot::LastThird => "lastthird",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TimeSlot::Fajr => "Fajr",
            TimeSlot::Sunrise => "Sunrise",
            TimeSlot::Dhuhr => "Dhuhr",
            TimeSlot::Asr => "Asr",
            TimeSlot::Maghrib => "Maghrib",
            TimeSlot::Isha => "Isha",
            TimeSlot::Midnight => "Midnight",
            TimeSlot::LastThird => "Last Third",
        }
    }

    /// The obligatory prayer at this slot, if any.
    pub fn prayer(&self) -> Option<PrayerType> {
        match self {
            TimeSlot::Fajr => Some(PrayerType::Fajr),
            TimeSlot::Dhuhr => Some(PrayerType::Dhuhr),
            TimeSlot::Asr => Some(PrayerType::Asr),
            TimeSlot::Maghrib => Some(PrayerType::Maghrib),
            TimeSlot::Isha => Some(PrayerType::Isha),
            TimeSlot::Sunrise | TimeSlot::Midnight | TimeSlot::LastThird => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prayer_names_and_aliases() {
        assert_eq!("FAJR".parse::<PrayerType>().unwrap(), PrayerType::Fajr);
        assert_eq!("zuhr".parse::<PrayerType>().unwrap(), PrayerType::Dhuhr);
        assert_eq!("Dhuhr".parse::<PrayerType>().unwrap(), PrayerType::Dhuhr);
        assert!("sunrise".parse::<PrayerType>().is_err());
    }

    #[test]
    fn only_five_slots_are_obligatory() {
        let obligatory: Vec<_> = TimeSlot::ALL.iter().filter_map(|s| s.prayer()).collect();
        assert_eq!(obligatory, PrayerType::all().to_vec());
        for p in PrayerType::all() {
            assert_eq!(p.slot().prayer(), Some(p));
        }
    }

    #[test]
    fn slot_keys_match_table_names() {
        let keys: Vec<_> = TimeSlot::ALL.iter().map(|s| s.key()).collect();
        assert_eq!(
            keys,
            ["fajr", "sunrise", "dhuhr", "asr", "maghrib", "isha", "midnight", "lastthird"]
        );
    }
}
