//! Background watcher that plays the Adhaan when a prayer comes due.

mod state;

use chrono::NaiveTime;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub use state::MonitorState;

use crate::audio::AdhaanPlayer;
use crate::models::PrayerType;
use crate::utils::clock;
use crate::utils::format::format_time;

pub struct PrayerMonitor {
    state: Arc<MonitorState>,
    player: Arc<dyn AdhaanPlayer>,
    /// Configured UTC offset in minutes; `None` follows the system zone.
    utc_offset: Option<i32>,
    /// Minute ("HH:MM") at which each prayer last fired.
    triggered: HashMap<PrayerType, String>,
}

impl PrayerMonitor {
    /// `utc_offset` must be the offset the table was calculated in, so the
    /// clock is read in the same frame.
    pub fn new(
        state: Arc<MonitorState>,
        player: Arc<dyn AdhaanPlayer>,
        utc_offset: Option<i32>,
    ) -> Self {
        Self {
            state,
            player,
            utc_offset,
            triggered: HashMap::new(),
        }
    }

    /// One check against the clock. Returns the prayers whose Adhaan was
    /// started.
    ///
    /// A prayer is due when `now` shows the same minute as its table entry
    /// and it has not already fired in that minute. Due prayers are marked
    /// fired whether or not they are enabled or anything could be played.
    pub fn poll(&mut self, now: NaiveTime) -> Vec<PrayerType> {
        let now_str = format_time(now);
        // Once the clock leaves a minute, that trigger no longer suppresses anything.
        self.triggered.retain(|_, minute| *minute == now_str);

        let table = self.state.table();
        if table.is_empty() {
            debug!("No prayer times available; skipping this check");
            return Vec::new();
        }

        let enabled = self.state.enabled();
        let mut started = Vec::new();

        for prayer in PrayerType::all() {
            if table.hhmm(prayer.slot()) != now_str {
                continue;
            }
            if self.triggered.get(&prayer) == Some(&now_str) {
                continue;
            }

            if enabled.is_enabled(prayer) {
                match self.state.audio_file() {
                    Some(file) => match self.player.play(&file) {
                        Ok(()) => {
                            info!("{} Adhaan started at {}", prayer, now_str);
                            started.push(prayer);
                        }
                        Err(e) => error!("Error playing audio for {}: {}", prayer, e),
                    },
                    None => warn!("No Adhaan audio file selected."),
                }
            } else {
                info!("{} is due but its Adhaan is disabled", prayer);
            }
            self.triggered.insert(prayer, now_str.clone());
        }
        started
    }

    /// [`poll`](Self::poll) against the current time in the table's frame.
    pub fn poll_now(&mut self) -> Vec<PrayerType> {
        self.poll(clock::now(self.utc_offset).time())
    }

    /// Runs [`poll_now`](Self::poll_now) every `interval` on its own thread
    /// until the returned handle is stopped or dropped.
    pub fn spawn(mut self, interval: Duration) -> std::io::Result<MonitorHandle> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let thread = thread::Builder::new()
            .name("prayer-monitor".to_string())
            .spawn(move || {
                info!("Starting prayer monitor thread.");
                loop {
                    self.poll_now();
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("Prayer monitor stopped.");
            })?;

        Ok(MonitorHandle {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

pub struct MonitorHandle {
    stop_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signals the monitor and waits for its thread to exit.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Prayer monitor thread panicked");
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::mock::MockPlayer;
    use crate::config::EnabledSet;
    use crate::models::TimeSlot;
    use crate::prayer_times::PrayerTimeTable;
    use chrono::Timelike;
    use std::path::PathBuf;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn table() -> PrayerTimeTable {
        let mut t = PrayerTimeTable::new();
        t.insert(TimeSlot::Fajr, hm(5, 0));
        t.insert(TimeSlot::Sunrise, hm(6, 20));
        t.insert(TimeSlot::Dhuhr, hm(12, 15));
        t.insert(TimeSlot::Asr, hm(15, 40));
        t.insert(TimeSlot::Maghrib, hm(18, 5));
        t.insert(TimeSlot::Isha, hm(19, 30));
        t.insert(TimeSlot::LastThird, hm(1, 20));
        t
    }

    fn setup() -> (Arc<MonitorState>, Arc<MockPlayer>, PrayerMonitor) {
        let state = Arc::new(MonitorState::new(
            EnabledSet::default(),
            Some(PathBuf::from("adhan.mp3")),
        ));
        state.set_table(table());
        let player = Arc::new(MockPlayer::default());
        let monitor = PrayerMonitor::new(state.clone(), player.clone(), None);
        (state, player, monitor)
    }

    #[test]
    fn fires_once_per_minute() {
        let (_state, player, mut monitor) = setup();

        assert!(monitor.poll(hms(12, 14, 55)).is_empty());
        assert_eq!(monitor.poll(hms(12, 15, 3)), vec![PrayerType::Dhuhr]);
        assert!(monitor.poll(hms(12, 15, 13)).is_empty());
        assert!(monitor.poll(hms(12, 15, 53)).is_empty());
        assert!(monitor.poll(hms(12, 16, 3)).is_empty());
        assert_eq!(player.play_count(), 1);
        assert_eq!(
            player.plays.lock().unwrap().as_slice(),
            [PathBuf::from("adhan.mp3")]
        );
    }

    #[test]
    fn informational_slots_never_fire() {
        let (_state, player, mut monitor) = setup();
        monitor.poll(hm(6, 20));
        monitor.poll(hm(1, 20));
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn disabled_prayer_is_silent() {
        let (state, player, mut monitor) = setup();
        let mut enabled = EnabledSet::default();
        enabled.set(PrayerType::Asr, false);
        state.set_enabled(enabled);

        assert!(monitor.poll(hm(15, 40)).is_empty());
        assert_eq!(player.play_count(), 0);

        // Re-enabling inside the same minute does not replay it.
        state.set_enabled(EnabledSet::default());
        assert!(monitor.poll(hms(15, 40, 30)).is_empty());
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn missing_audio_file_still_records_trigger() {
        let (state, player, mut monitor) = setup();
        state.set_audio_file(None);
        assert!(monitor.poll(hm(5, 0)).is_empty());

        state.set_audio_file(Some(PathBuf::from("late.mp3")));
        assert!(monitor.poll(hms(5, 0, 40)).is_empty());
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn playback_error_does_not_block_later_prayers() {
        let (_state, player, mut monitor) = setup();
        player.set_should_fail(true);
        assert!(monitor.poll(hm(18, 5)).is_empty());

        player.set_should_fail(false);
        assert_eq!(monitor.poll(hm(19, 30)), vec![PrayerType::Isha]);
        assert_eq!(player.play_count(), 1);
    }

    #[test]
    fn empty_table_skips_cycle_without_recording() {
        let (state, player, mut monitor) = setup();
        state.set_table(PrayerTimeTable::new());
        assert!(monitor.poll(hm(5, 0)).is_empty());

        // Times come back within the same minute: fajr still fires.
        state.set_table(table());
        assert_eq!(monitor.poll(hms(5, 0, 20)), vec![PrayerType::Fajr]);
        assert_eq!(player.play_count(), 1);
    }

    #[test]
    fn reads_latest_table_each_poll() {
        let (state, player, mut monitor) = setup();
        let mut moved = table();
        moved.insert(TimeSlot::Maghrib, hm(18, 7));
        state.set_table(moved);

        assert!(monitor.poll(hm(18, 5)).is_empty());
        assert_eq!(monitor.poll(hm(18, 7)), vec![PrayerType::Maghrib]);
        assert_eq!(player.play_count(), 1);
    }

    #[test]
    fn fires_again_the_next_day() {
        let (_state, player, mut monitor) = setup();
        monitor.poll(hm(5, 0));
        monitor.poll(hm(12, 15));
        monitor.poll(hm(5, 0));
        assert_eq!(player.play_count(), 3);
    }

    #[test]
    fn spawned_monitor_stops_on_request() {
        let (_state, _player, monitor) = setup();
        let mut handle = monitor.spawn(Duration::from_secs(60)).unwrap();
        assert!(handle.is_running());
        handle.stop();
        assert!(!handle.is_running());
    }

    #[test]
    fn reads_clock_in_configured_offset() {
        // Three hours away from the system zone, wrapped into the valid range.
        let system = chrono::Local::now().offset().local_minus_utc() / 60;
        let offset = if system + 180 <= 14 * 60 { system + 180 } else { system - 180 };

        let now = clock::now(Some(offset)).time();
        let minute = hm(now.hour(), now.minute());
        let mut t = PrayerTimeTable::new();
        t.insert(TimeSlot::Dhuhr, minute);
        // Covers the clock rolling over to the next minute mid-test.
        t.insert(TimeSlot::Asr, minute + chrono::Duration::minutes(1));

        let state = Arc::new(MonitorState::new(
            EnabledSet::default(),
            Some(PathBuf::from("adhan.mp3")),
        ));
        state.set_table(t);
        let player = Arc::new(MockPlayer::default());
        let mut monitor = PrayerMonitor::new(state, player.clone(), Some(offset));

        assert_eq!(monitor.poll_now().len(), 1);
        assert_eq!(player.play_count(), 1);
    }
}
