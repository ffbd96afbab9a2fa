//! Media entities.
//!
//! `Media` carries the fields every item has; what only a video or only an
//! audio track knows lives in [`MediaDetails`]. The media type is derived
//! from the details variant, so it cannot change after construction.

use serde::{Deserialize, Serialize};

/// What kind of media this item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Audio,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Some(MediaType::Video),
            "audio" => Some(MediaType::Audio),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

/// Subtype-specific fields. Serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaDetails {
    Video(VideoDetails),
    Audio(AudioDetails),
}

/// A library item as the domain layer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    pub title: String,
    pub uri: String,
    /// Seconds.
    pub duration: f64,
    /// Bytes.
    pub size: u64,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(flatten)]
    pub details: MediaDetails,
}

impl Media {
    /// A video with empty details; fill the remaining fields with struct update syntax.
    pub fn video(id: impl Into<String>, title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::with_details(id, title, uri, MediaDetails::Video(VideoDetails::default()))
    }

    /// An audio track with empty details.
    pub fn audio(id: impl Into<String>, title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::with_details(id, title, uri, MediaDetails::Audio(AudioDetails::default()))
    }

    fn with_details(
        id: impl Into<String>,
        title: impl Into<String>,
        uri: impl Into<String>,
        details: MediaDetails,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            uri: uri.into(),
            duration: 0.0,
            size: 0,
            created_at: 0,
            updated_at: 0,
            thumbnail_uri: None,
            is_favorite: false,
            details,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self.details {
            MediaDetails::Video(_) => MediaType::Video,
            MediaDetails::Audio(_) => MediaType::Audio,
        }
    }

    /// Artist, if this kind of media has one at all.
    ///
    /// Videos have no artist field and return `None`. Audio tracks always have
    /// the field and return `Some("")` when it is unset.
    pub fn artist(&self) -> Option<&str> {
        match &self.details {
            MediaDetails::Audio(audio) => Some(audio.artist.as_deref().unwrap_or("")),
            MediaDetails::Video(_) => None,
        }
    }

    /// Album, with the same absent-vs-empty rule as [`Media::artist`].
    pub fn album(&self) -> Option<&str> {
        match &self.details {
            MediaDetails::Audio(audio) => Some(audio.album.as_deref().unwrap_or("")),
            MediaDetails::Video(_) => None,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        if let MediaDetails::Audio(audio) = &mut self.details {
            audio.artist = Some(artist.into());
        }
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        if let MediaDetails::Audio(audio) = &mut self.details {
            audio.album = Some(album.into());
        }
        self
    }
}

/// Tag data read from a file, before it becomes a [`Media`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub duration: f64,
    /// Base64 thumbnail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_data: Option<String>,
}

impl From<&MediaMetadata> for AudioDetails {
    fn from(tags: &MediaMetadata) -> Self {
        Self {
            artist: tags.artist.clone(),
            album: tags.album.clone(),
            genre: tags.genre.clone(),
            year: tags.year,
        }
    }
}

/// Span inside a media item, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn length(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_follows_details() {
        assert_eq!(Media::video("v", "Movie", "file:///v.mp4").media_type(), MediaType::Video);
        assert_eq!(Media::audio("a", "Song", "file:///a.mp3").media_type(), MediaType::Audio);
    }

    #[test]
    fn artist_absent_for_video_empty_for_bare_audio() {
        let video = Media::video("v", "Movie", "file:///v.mp4");
        let bare = Media::audio("a", "Song", "file:///a.mp3");
        let tagged = Media::audio("b", "Song", "file:///b.mp3").with_artist("Queen");

        assert_eq!(video.artist(), None);
        assert_eq!(bare.artist(), Some(""));
        assert_eq!(tagged.artist(), Some("Queen"));
        assert_eq!(video.album(), None);
        assert_eq!(bare.album(), Some(""));
    }

    #[test]
    fn with_artist_ignored_on_video() {
        let video = Media::video("v", "Movie", "file:///v.mp4").with_artist("Nobody");
        assert_eq!(video.artist(), None);
    }

    #[test]
    fn media_json_shape() {
        let song = Media::audio("a", "Song", "file:///a.mp3").with_album("Opera");
        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["type"], "audio");
        assert_eq!(value["album"], "Opera");
        assert_eq!(value["isFavorite"], false);

        let back: Media = serde_json::from_value(value).unwrap();
        assert_eq!(back, song);
    }

    #[test]
    fn media_type_parse() {
        assert_eq!(MediaType::parse("VIDEO"), Some(MediaType::Video));
        assert_eq!(MediaType::parse("audio"), Some(MediaType::Audio));
        assert_eq!(MediaType::parse("image"), None);
    }

    #[test]
    fn time_range_length_and_contains() {
        let range = TimeRange { start: 10.0, end: 25.0 };
        assert_eq!(range.length(), 15.0);
        assert!(range.contains(10.0));
        assert!(!range.contains(25.0));
        assert_eq!(TimeRange { start: 5.0, end: 1.0 }.length(), 0.0);
    }
}
