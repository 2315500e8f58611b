use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::models::voice::{sample_voices, Voice, VoiceFile};

// ─── Voice database (JSON) ───────────────────────────────────────────────────

pub struct VoiceRepo;

impl VoiceRepo {
    /// Reads the voice list at `path`.
    ///
    /// A missing file is created with the sample voices. A file that can't be
    /// read or parsed is moved aside to `<name>.bak` and replaced the same
    /// way. Write failures are logged; the sample list is returned regardless.
    pub fn load(path: &Path) -> Vec<Voice> {
        if !path.exists() {
            info!("Voice database {:?} not found. Creating sample database...", path);
            return Self::write_sample(path);
        }

        info!("Loading voice database from {:?}...", path);
        match Self::read(path) {
            Ok(voices) => {
                info!("Loaded {} voices.", voices.len());
                voices
            }
            Err(e) => {
                error!("Error loading voice database: {:#}", e);
                let backup = backup_path(path);
                match std::fs::rename(path, &backup) {
                    Ok(()) => warn!("Moved unreadable voice database to {:?}", backup),
                    Err(e) => error!("Could not move {:?} aside: {}", path, e),
                }
                Self::write_sample(path)
            }
        }
    }

    fn read(path: &Path) -> Result<Vec<Voice>> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let file: VoiceFile = serde_json::from_str(&content).context("Parsing voice database")?;
        Ok(file.voices)
    }

    fn write_sample(path: &Path) -> Vec<Voice> {
        let sample = sample_voices();
        match Self::save(path, &sample) {
            Ok(()) => info!("Sample voice database created."),
            Err(e) => error!("Error writing sample voice database: {:#}", e),
        }
        sample
    }

    pub fn save(path: &Path, voices: &[Voice]) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = VoiceFile {
            voices: voices.to_vec(),
        };
        let content = serde_json::to_string_pretty(&file).context("Serializing voices")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    /// Adds one vote to `name` and writes the database back.
    pub fn vote(path: &Path, name: &str) -> Result<Voice> {
        let mut voices = Self::load(path);
        let voice = voices
            .iter_mut()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Voice '{}' not found", name))?;
        voice.votes += 1;
        let updated = voice.clone();
        Self::save(path, &voices)?;
        Ok(updated)
    }

    pub fn find<'a>(voices: &'a [Voice], name: &str) -> Option<&'a Voice> {
        voices.iter().find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Audio path for `voice`; relative entries live next to the database.
    pub fn resolve_file(db_path: &Path, voice: &Voice) -> PathBuf {
        if voice.file.is_absolute() {
            return voice.file.clone();
        }
        match db_path.parent() {
            Some(dir) => dir.join(&voice.file),
            None => voice.file.clone(),
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(voices: &[Voice]) -> Vec<i64> {
        voices.iter().map(|v| v.votes).collect()
    }

    #[test]
    fn missing_database_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adhan_votes.json");

        let first = VoiceRepo::load(&path);
        assert!(path.exists());
        assert_eq!(first.len(), 3);
        assert_eq!(votes(&first), vec![250, 300, 200]);

        let second = VoiceRepo::load(&path);
        assert_eq!(second, first);
        assert_eq!(second[0].name, "Mishary Rashid Alafasy");
        assert_eq!(second[1].file, PathBuf::from("adhan_basit.mp3"));
    }

    #[test]
    fn corrupt_database_is_replaced_and_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adhan_votes.json");
        std::fs::write(&path, "{ not json").unwrap();

        let voices = VoiceRepo::load(&path);
        assert_eq!(votes(&voices), vec![250, 300, 200]);
        assert!(dir.path().join("adhan_votes.json.bak").exists());
        assert_eq!(VoiceRepo::load(&path), voices);
    }

    #[test]
    fn unwritable_location_still_returns_sample() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "plain file").unwrap();
        let path = blocker.join("adhan_votes.json");

        let voices = VoiceRepo::load(&path);
        assert_eq!(votes(&voices), vec![250, 300, 200]);
        assert!(!path.exists());
        assert!(VoiceRepo::save(&path, &voices).is_err());
    }

    #[test]
    fn existing_database_is_read_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voices.json");
        std::fs::write(
            &path,
            r#"{"voices": [{"name": "Local", "votes": 7, "file": "/tmp/local.ogg"}]}"#,
        )
        .unwrap();

        let voices = VoiceRepo::load(&path);
        assert_eq!(voices, vec![Voice::new("Local", 7, "/tmp/local.ogg")]);
        assert_eq!(voices[0].label(), "Local (7 votes)");
    }

    #[test]
    fn vote_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adhan_votes.json");
        VoiceRepo::load(&path);

        let updated = VoiceRepo::vote(&path, "abdul basit").unwrap();
        assert_eq!(updated.votes, 301);
        assert_eq!(votes(&VoiceRepo::load(&path)), vec![250, 301, 200]);
        assert!(VoiceRepo::vote(&path, "Nobody").is_err());
    }

    #[test]
    fn relative_files_resolve_next_to_database() {
        let db = Path::new("/data/adhaan/adhan_votes.json");
        let voice = Voice::new("A", 1, "a.mp3");
        assert_eq!(
            VoiceRepo::resolve_file(db, &voice),
            PathBuf::from("/data/adhaan/a.mp3")
        );
        let absolute = Voice::new("B", 1, "/music/b.mp3");
        assert_eq!(
            VoiceRepo::resolve_file(db, &absolute),
            PathBuf::from("/music/b.mp3")
        );
    }
}
