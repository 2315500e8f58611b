//! Adhaan playback.
//!
//! One player is shared by the whole process: scheduled Adhaans and test
//! playback both go through it, and starting a new file replaces whatever
//! is currently playing.

mod player;

use log::warn;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub use player::RodioPlayer;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available: {0}")]
    Unavailable(String),
    #[error("could not open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {path:?}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("playback failed: {0}")]
    Playback(String),
}

pub trait AdhaanPlayer: Send + Sync {
    /// Starts `file` in the background, replacing anything already playing.
    fn play(&self, file: &Path) -> Result<(), AudioError>;

    fn stop(&self);

    fn is_playing(&self) -> bool;
}

/// Stand-in used when no output device could be opened.
pub struct SilentPlayer {
    reason: String,
}

impl SilentPlayer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AdhaanPlayer for SilentPlayer {
    fn play(&self, _file: &Path) -> Result<(), AudioError> {
        Err(AudioError::Unavailable(self.reason.clone()))
    }

    fn stop(&self) {}

    fn is_playing(&self) -> bool {
        false
    }
}

/// The process-wide player. Falls back to [`SilentPlayer`] so the rest of
/// the app keeps working without sound.
pub fn open_default() -> Arc<dyn AdhaanPlayer> {
    match RodioPlayer::new() {
        Ok(player) => Arc::new(player),
        Err(e) => {
            warn!("Audio disabled: {}", e);
            Arc::new(SilentPlayer::new(e.to_string()))
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Records every play call instead of making noise.
    #[derive(Debug, Default)]
    pub struct MockPlayer {
        pub plays: Mutex<Vec<PathBuf>>,
        pub should_fail: AtomicBool,
        playing: AtomicBool,
    }

    impl MockPlayer {
        pub fn play_count(&self) -> usize {
            self.plays.lock().unwrap().len()
        }

        pub fn set_should_fail(&self, fail: bool) {
            self.should_fail.store(fail, Ordering::SeqCst);
        }
    }

    impl AdhaanPlayer for MockPlayer {
        fn play(&self, file: &Path) -> Result<(), AudioError> {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(AudioError::Playback("mock failure".to_string()));
            }
            self.plays.lock().unwrap().push(file.to_path_buf());
            self.playing.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn stop(&self) {
            self.playing.store(false, Ordering::SeqCst);
        }

        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::SeqCst)
        }
    }
}
