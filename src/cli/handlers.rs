use anyhow::{anyhow, bail, Result};
use log::info;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use crate::cli::args::VoiceCommands;
use crate::controller::{Controller, ControllerError, TestPlayback};
use crate::models::{PrayerType, TimeSlot};
use crate::prayer_times::{next_prayer, CALC_METHODS};
use crate::utils::format::{format_duration_secs, to_12h};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(controller: &mut Controller) -> Result<()> {
    let coords = controller.update_location();
    let table = controller.table();
    let now = controller.config.prayer.now();
    let today_str = now.date().format("%Y-%m-%d").to_string();
    let now_time = now.time();
    let enabled = controller.config.adhaan.enabled;

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({}, {})",
        coords,
        controller.config.prayer.calc_method,
        today_str
    );
    println!();

    if table.is_empty() {
        println_colored!(RED, "  Prayer times could not be calculated");
        println!();
        return Ok(());
    }

    for slot in TimeSlot::ALL {
        let display = to_12h(&table.hhmm(slot));
        let bell = match slot.prayer() {
            Some(p) if enabled.is_enabled(p) => "🔔",
            Some(_) => "🔕",
            None => "  ",
        };
        let is_past = slot.prayer().is_some() && table.get(slot).is_some_and(|t| t < now_time);
        if is_past {
            println_colored!(DIM, "  {:<11} {}  {}", slot.display_name(), display, bell);
        } else {
            println_colored!(BOLD, "  {:<11} {}  {}", slot.display_name(), display, bell);
        }
    }

    // Countdown to next prayer
    if let Some((prayer, secs)) = next_prayer(&table, now_time) {
        println!();
        println_colored!(
            AMBER,
            "  Next: {} in {}",
            prayer.display_name(),
            format_duration_secs(secs)
        );
    }
    println!();
    Ok(())
}

// ─── Watch ───────────────────────────────────────────────────────────────────

/// Keeps the table fresh while the monitor plays Adhaans. Only returns on
/// error, e.g. when the monitor thread dies.
pub fn handle_watch(controller: &mut Controller) -> Result<()> {
    controller.update_location();
    let monitor = controller.start_monitor()?;
    info!(
        "Watching; refreshing prayer times every {} min",
        controller.config.prayer.refresh_minutes
    );

    loop {
        thread::sleep(controller.refresh_interval());
        if !monitor.is_running() {
            bail!("Prayer monitor exited unexpectedly");
        }
        controller.refresh_times();
    }
}

// ─── Location ────────────────────────────────────────────────────────────────

pub fn handle_locate(
    controller: &mut Controller,
    auto: bool,
    lat: Option<f64>,
    lng: Option<f64>,
    zip: Option<String>,
    region: Option<String>,
    save: bool,
) -> Result<()> {
    controller
        .config
        .location
        .apply_overrides(auto, lat.zip(lng), zip, region);

    let coords = controller.update_location();
    println_colored!(GOLD, "  Location: {}", coords);

    if save {
        controller.save_location()?;
        println_colored!(GREEN, "  ✓ Saved as manual location");
    }
    Ok(())
}

// ─── Method ──────────────────────────────────────────────────────────────────

pub fn handle_method(controller: &mut Controller, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            controller.set_method(name)?;
            println_colored!(
                GREEN,
                "  ✓ Calculation method set to {}",
                controller.config.prayer.calc_method
            );
        }
        None => {
            println!();
            for method in CALC_METHODS {
                if *method == controller.config.prayer.calc_method {
                    println_colored!(GOLD, "  ● {}", method);
                } else {
                    println_colored!(DIM, "  ○ {}", method);
                }
            }
            println!();
        }
    }
    Ok(())
}

// ─── Toggle ──────────────────────────────────────────────────────────────────

pub fn handle_toggle(controller: &mut Controller, prayer_str: &str) -> Result<()> {
    let prayer = PrayerType::from_str(prayer_str).map_err(|_| {
        anyhow!(
            "Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha",
            prayer_str
        )
    })?;
    if controller.toggle_prayer(prayer)? {
        println_colored!(GREEN, "  🔔 Adhaan for {} enabled", prayer.display_name());
    } else {
        println_colored!(DIM, "  🔕 Adhaan for {} disabled", prayer.display_name());
    }
    Ok(())
}

// ─── Voices ──────────────────────────────────────────────────────────────────

pub fn handle_voices(controller: &mut Controller, action: &VoiceCommands) -> Result<()> {
    match action {
        VoiceCommands::List => {
            let selected = controller.config.adhaan.voice.clone();
            let custom = controller.config.adhaan.custom_file.is_some();
            println!();
            println_colored!(GOLD, "  Adhaan Voices  ({:?})", controller.voices_path());
            println!();
            for voice in controller.voices() {
                let is_selected = !custom && selected.as_deref() == Some(voice.name.as_str());
                if is_selected {
                    println_colored!(GOLD, "  ● {}", voice.label());
                } else {
                    println!("  ○ {}", voice.label());
                }
            }
            if custom {
                println!();
                println_colored!(AMBER, "  Using {}", controller.selection_label());
            }
            println!();
        }
        VoiceCommands::Vote { name } => {
            let voice = controller.vote(name)?;
            println_colored!(GREEN, "  ✓ Voted for {}", voice.label());
        }
        VoiceCommands::Select { name } => {
            controller.select_voice(name)?;
            println_colored!(GREEN, "  ✓ Selected {}", controller.selection_label());
        }
        VoiceCommands::File { path } => {
            if !path.is_file() {
                bail!("No audio file at {:?}", path);
            }
            let path = path.canonicalize().unwrap_or_else(|_| path.clone());
            controller.select_custom_file(path)?;
            println_colored!(GREEN, "  ✓ Selected {}", controller.selection_label());
        }
    }
    Ok(())
}

// ─── Test ────────────────────────────────────────────────────────────────────

pub fn handle_test(controller: &mut Controller) -> Result<()> {
    match controller.toggle_test() {
        Ok(TestPlayback::Started) => {
            println_colored!(AMBER, "  ▶ Playing {}", controller.selection_label());
            while controller.is_testing() {
                thread::sleep(Duration::from_millis(200));
            }
            Ok(())
        }
        Ok(TestPlayback::Stopped) => Ok(()),
        Err(ControllerError::NoAudioSelected) => {
            bail!("Please select an Adhaan audio file to test (see `adhaan voices`)")
        }
        Err(e) => Err(e.into()),
    }
}

// ─── Interval ────────────────────────────────────────────────────────────────

pub fn handle_interval(controller: &mut Controller, minutes: u32) -> Result<()> {
    controller.set_refresh_minutes(minutes)?;
    println_colored!(GREEN, "  ✓ Prayer times refresh every {} min", minutes);
    Ok(())
}
