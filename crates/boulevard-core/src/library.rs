//! Library view — what the library screen shows for the latest scan.
//!
//! Holds scanned media mapped into display rows, newest first, and answers
//! the category tab + search box query the screen makes.

use serde::{Deserialize, Serialize};

use crate::models::{
    AudioDetails, Media, MediaDetails, MediaMetadata, MediaType, ScannedMedia, VideoDetails,
};
use crate::scanner::format::{format_duration, format_file_size, get_resolution_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryCategory {
    #[default]
    All,
    Video,
    Audio,
}

impl LibraryCategory {
    pub fn includes(&self, media_type: MediaType) -> bool {
        match self {
            LibraryCategory::All => true,
            LibraryCategory::Video => media_type == MediaType::Video,
            LibraryCategory::Audio => media_type == MediaType::Audio,
        }
    }
}

/// One display row. Duration and size are preformatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub uri: String,
    pub duration: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl MediaItem {
    pub fn from_scanned(scanned: &ScannedMedia) -> Self {
        let resolution = match scanned.media_type {
            MediaType::Video => Some(get_resolution_string(scanned.width, scanned.height)),
            MediaType::Audio => None,
        };
        Self {
            id: scanned.id.clone(),
            title: title_from_filename(&scanned.filename),
            media_type: scanned.media_type,
            uri: scanned.uri.clone(),
            duration: format_duration(scanned.duration),
            size: scanned
                .size
                .map(format_file_size)
                .unwrap_or_else(|| "Unknown".to_string()),
            resolution,
            thumbnail: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LibraryCounts {
    pub videos: usize,
    pub audios: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LibraryView {
    items: Vec<MediaItem>,
}

impl LibraryView {
    /// Build the view from a scan, newest first. Equal times keep scan order.
    pub fn from_scan(mut scanned: Vec<ScannedMedia>) -> Self {
        scanned.sort_by(|a, b| b.creation_time.cmp(&a.creation_time));
        Self {
            items: scanned.iter().map(MediaItem::from_scanned).collect(),
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Rows in `category` whose title contains `query`, case-insensitively.
    pub fn visible(&self, category: LibraryCategory, query: &str) -> Vec<&MediaItem> {
        let query = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| category.includes(item.media_type))
            .filter(|item| item.title.to_lowercase().contains(&query))
            .collect()
    }

    pub fn counts(&self) -> LibraryCounts {
        self.items
            .iter()
            .fold(LibraryCounts::default(), |mut counts, item| {
                match item.media_type {
                    MediaType::Video => counts.videos += 1,
                    MediaType::Audio => counts.audios += 1,
                }
                counts
            })
    }
}

/// Domain entity for a scanned asset, enriched with tags when the source read
/// any. The title falls back to the filename without its extension; times are
/// converted to milliseconds.
pub fn media_from_scanned(scanned: &ScannedMedia, tags: Option<&MediaMetadata>) -> Media {
    let details = match scanned.media_type {
        MediaType::Video => MediaDetails::Video(VideoDetails {
            resolution: Some(get_resolution_string(scanned.width, scanned.height)),
            ..VideoDetails::default()
        }),
        MediaType::Audio => MediaDetails::Audio(tags.map(AudioDetails::from).unwrap_or_default()),
    };
    let title = tags
        .map(|t| t.title.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| title_from_filename(&scanned.filename));
    let duration = match tags {
        Some(t) if scanned.duration <= 0.0 => t.duration,
        _ => scanned.duration,
    };

    Media {
        id: scanned.id.clone(),
        title,
        uri: scanned.uri.clone(),
        duration: duration.max(0.0),
        size: scanned.size.unwrap_or(0),
        created_at: scanned.creation_time.saturating_mul(1000),
        updated_at: scanned.modification_time.saturating_mul(1000),
        thumbnail_uri: None,
        is_favorite: false,
        details,
    }
}

fn title_from_filename(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename[..idx].to_string(),
        _ => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(id: &str, filename: &str, media_type: MediaType, created: i64) -> ScannedMedia {
        ScannedMedia {
            id: id.into(),
            filename: filename.into(),
            uri: format!("file:///{filename}"),
            media_type,
            duration: 355.0,
            size: Some(8_598_323),
            creation_time: created,
            modification_time: created,
            width: None,
            height: None,
            album_id: None,
        }
    }

    fn sample() -> LibraryView {
        LibraryView::from_scan(vec![
            scanned("1", "Inception.mkv", MediaType::Video, 10),
            scanned("2", "Bohemian Rhapsody.mp3", MediaType::Audio, 30),
            scanned("3", "Interstellar.mp4", MediaType::Video, 20),
            scanned("4", "Hotel California.flac", MediaType::Audio, 20),
        ])
    }

    #[test]
    fn newest_first_with_stable_ties() {
        let view = sample();
        let ids: Vec<&str> = view.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "4", "1"]);
    }

    #[test]
    fn rows_are_formatted() {
        let view = sample();
        let song = &view.items()[0];
        assert_eq!(song.title, "Bohemian Rhapsody");
        assert_eq!(song.duration, "5:55");
        assert_eq!(song.size, "8.2 MB");
        assert_eq!(song.resolution, None);

        let movie = view.items().iter().find(|i| i.id == "1").unwrap();
        assert_eq!(movie.resolution.as_deref(), Some("Unknown"));
    }

    #[test]
    fn category_and_search() {
        let view = sample();
        let ids = |items: Vec<&MediaItem>| {
            items.into_iter().map(|i| i.id.clone()).collect::<Vec<_>>()
        };

        assert_eq!(ids(view.visible(LibraryCategory::All, "")).len(), 4);
        assert_eq!(ids(view.visible(LibraryCategory::Video, "")), ["3", "1"]);
        assert_eq!(ids(view.visible(LibraryCategory::All, "IA")), ["2", "4"]);
        assert_eq!(ids(view.visible(LibraryCategory::Audio, "hotel")), ["4"]);
        assert!(view.visible(LibraryCategory::Video, "hotel").is_empty());
    }

    #[test]
    fn counts_by_type() {
        assert_eq!(sample().counts(), LibraryCounts { videos: 2, audios: 2 });
        assert_eq!(LibraryView::default().counts(), LibraryCounts::default());
    }

    #[test]
    fn media_from_scanned_maps_fields() {
        let mut video = scanned("v", "Trip.2024.mov", MediaType::Video, 1_700_000_000);
        video.width = Some(1920);
        video.height = Some(1080);
        let media = media_from_scanned(&video, None);
        assert_eq!(media.title, "Trip.2024");
        assert_eq!(media.media_type(), MediaType::Video);
        assert_eq!(media.created_at, 1_700_000_000_000);
        assert_eq!(media.size, 8_598_323);
        assert_eq!(
            media.details,
            MediaDetails::Video(VideoDetails {
                resolution: Some("Full HD".into()),
                ..VideoDetails::default()
            })
        );

        let song = media_from_scanned(&scanned("a", ".hidden", MediaType::Audio, 0), None);
        assert_eq!(song.title, ".hidden");
        assert_eq!(song.artist(), Some(""));
    }

    #[test]
    fn tags_fill_title_artist_and_album() {
        let mut track = scanned("a", "01-track.mp3", MediaType::Audio, 0);
        track.duration = 0.0;
        let tags = MediaMetadata {
            title: "Under Pressure".into(),
            artist: Some("Queen".into()),
            album: Some("Hot Space".into()),
            year: Some(1982),
            duration: 248.0,
            ..MediaMetadata::default()
        };

        let media = media_from_scanned(&track, Some(&tags));
        assert_eq!(media.title, "Under Pressure");
        assert_eq!(media.artist(), Some("Queen"));
        assert_eq!(media.album(), Some("Hot Space"));
        assert_eq!(media.duration, 248.0);

        let untitled = MediaMetadata {
            title: "  ".into(),
            ..tags
        };
        assert_eq!(media_from_scanned(&track, Some(&untitled)).title, "01-track");
    }
}
