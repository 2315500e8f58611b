pub mod voices;

pub use voices::VoiceRepo;
