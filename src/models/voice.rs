use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    pub votes: i64,
    pub file: PathBuf,
}

impl Voice {
    pub fn new(name: &str, votes: i64, file: &str) -> Self {
        Self {
            name: name.to_string(),
            votes,
            file: PathBuf::from(file),
        }
    }

    /// Label used in voice pickers, e.g. "Abdul Basit (300 votes)".
    pub fn label(&self) -> String {
        format!("{} ({} votes)", self.name, self.votes)
    }
}

/// On-disk shape of the voice database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceFile {
    #[serde(default)]
    pub voices: Vec<Voice>,
}

/// Entries written when no database exists yet.
pub fn sample_voices() -> Vec<Voice> {
    vec![
        Voice::new("Mishary Rashid Alafasy", 250, "adhan_alafasy.mp3"),
        Voice::new("Abdul Basit", 300, "adhan_basit.mp3"),
        Voice::new("Saad Al-Ghamdi", 200, "adhan_ghamdi.mp3"),
    ]
}
