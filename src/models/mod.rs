pub mod prayer;
pub mod voice;

pub use prayer::{PrayerType, TimeSlot};
pub use voice::{Voice, VoiceFile};
