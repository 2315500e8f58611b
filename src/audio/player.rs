use log::{debug, info};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc;
use std::thread;

use super::{AdhaanPlayer, AudioError};

/// rodio-backed player.
///
/// `OutputStream` can't leave the thread that opened it, so a small thread
/// holds it open for the player's lifetime and hands back the `Send` handle.
pub struct RodioPlayer {
    handle: OutputStreamHandle,
    sink: Mutex<Option<Sink>>,
    // Dropping this lets the stream thread exit.
    _shutdown: mpsc::Sender<()>,
}

impl RodioPlayer {
    pub fn new() -> Result<Self, AudioError> {
        let (ready_tx, ready_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    if ready_tx.send(Ok(handle)).is_err() {
                        return;
                    }
                    // Blocks until the player is dropped.
                    let _ = shutdown_rx.recv();
                    drop(stream);
                    debug!("Audio output closed");
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                }
            })
            .map_err(|e| AudioError::Unavailable(e.to_string()))?;

        let handle = ready_rx
            .recv()
            .map_err(|e| AudioError::Unavailable(e.to_string()))?
            .map_err(AudioError::Unavailable)?;

        Ok(Self {
            handle,
            sink: Mutex::new(None),
            _shutdown: shutdown_tx,
        })
    }
}

impl AdhaanPlayer for RodioPlayer {
    fn play(&self, file: &Path) -> Result<(), AudioError> {
        info!("Playing audio file: {:?}", file);
        let reader = File::open(file).map_err(|source| AudioError::Open {
            path: file.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(reader)).map_err(|e| AudioError::Decode {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;
        let sink =
            Sink::try_new(&self.handle).map_err(|e| AudioError::Playback(e.to_string()))?;
        sink.append(source);

        let mut current = self
            .sink
            .lock()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        if let Some(previous) = current.replace(sink) {
            previous.stop();
        }
        Ok(())
    }

    fn stop(&self) {
        if let Ok(mut current) = self.sink.lock() {
            if let Some(sink) = current.take() {
                sink.stop();
                info!("Playback stopped");
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .lock()
            .map(|current| current.as_ref().is_some_and(|sink| !sink.empty()))
            .unwrap_or(false)
    }
}
