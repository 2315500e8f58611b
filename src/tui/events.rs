use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind};

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Forwards terminal input and a steady tick from a reader thread. The
/// thread exits once the handler is dropped.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("tui-events".to_string())
            .spawn(move || {
                let mut last_tick = Instant::now();
                loop {
                    let timeout = tick_rate
                        .checked_sub(last_tick.elapsed())
                        .unwrap_or(Duration::ZERO);

                    if event::poll(timeout).unwrap_or(false) {
                        let forwarded = match event::read() {
                            // Some terminals also report releases and repeats
                            Ok(CEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            Ok(CEvent::Resize(..)) => Some(Event::Resize),
                            Ok(_) => None,
                            Err(_) => break,
                        };
                        if let Some(ev) = forwarded {
                            if tx.send(ev).is_err() {
                                break;
                            }
                        }
                    }

                    if last_tick.elapsed() >= tick_rate {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                        last_tick = Instant::now();
                    }
                }
            });
        if let Err(e) = spawned {
            log::error!("Could not start terminal event thread: {}", e);
        }

        Self { rx }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
