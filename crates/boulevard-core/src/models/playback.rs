//! Playback state handed to and from the external player.
//!
//! The core never drives playback itself; this is the shape the player
//! reports back so the library can show what is playing.

use serde::{Deserialize, Serialize};

/// Repeat mode for queue playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub media_id: Option<String>,
    pub is_playing: bool,
    /// Seconds.
    pub position: f64,
    /// Seconds.
    pub duration: f64,
    /// 0.0 to 1.0.
    pub volume: f32,
    pub is_muted: bool,
    pub playback_rate: f32,
    pub repeat: RepeatMode,
    pub shuffle: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            media_id: None,
            is_playing: false,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            is_muted: false,
            playback_rate: 1.0,
            repeat: RepeatMode::Off,
            shuffle: false,
        }
    }
}

impl PlaybackState {
    /// Fresh state for a media item about to be handed to the player.
    pub fn for_media(media_id: impl Into<String>, duration: f64) -> Self {
        Self {
            media_id: Some(media_id.into()),
            duration,
            ..Self::default()
        }
    }

    /// Position as a fraction of duration, 0.0 when duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.position / self.duration).clamp(0.0, 1.0)
    }
}
