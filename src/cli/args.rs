use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "adhaan", version, author, about = "Daily prayer times in the terminal, with the Adhaan played on time")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayer times and countdown to next prayer
    Times,
    /// Run the Adhaan monitor without the dashboard
    Watch,
    /// Resolve the current location
    Locate {
        /// Use IP geolocation instead of the configured mode
        #[arg(long, conflicts_with_all = ["lat", "lng", "zip"])]
        auto: bool,
        /// Manual latitude
        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,
        /// Manual longitude
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,
        /// ZIP / postal code to look up
        #[arg(long)]
        zip: Option<String>,
        /// Region or country for the ZIP lookup
        #[arg(long)]
        region: Option<String>,
        /// Store the result as the manual location
        #[arg(long)]
        save: bool,
    },
    /// List calculation methods, or switch to one
    Method {
        /// ISNA, MWL, Egypt, Makkah, Karachi or Tehran
        name: Option<String>,
    },
    /// Turn the Adhaan for one prayer on or off
    Toggle {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        prayer: String,
    },
    /// Adhaan voice database and selection
    Voices {
        #[command(subcommand)]
        action: VoiceCommands,
    },
    /// Play the selected Adhaan once
    Test,
    /// Set how often prayer times are recalculated
    Interval {
        /// Minutes: 1, 2, 5, 10, 15 or 30
        minutes: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum VoiceCommands {
    /// Show the available voices and their votes
    List,
    /// Add a vote for a voice
    Vote {
        /// Voice name
        name: String,
    },
    /// Use a voice from the database
    Select {
        /// Voice name
        name: String,
    },
    /// Use a custom audio file (mp3, wav or ogg)
    File {
        path: PathBuf,
    },
}

impl Commands {
    /// Commands that never play audio skip opening the output device.
    pub fn needs_audio(&self) -> bool {
        matches!(self, Commands::Watch | Commands::Test)
    }
}
