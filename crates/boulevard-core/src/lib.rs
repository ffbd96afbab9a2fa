//! boulevard-core — media library core for the Boulevard browser.
//!
//! Discovers video and audio through a platform asset source, turns scans
//! into library rows, and answers filtered/sorted list queries. Playback and
//! persistence stay with the host application.
//!
//! # Architecture
//!
//! ```text
//! AssetSource (platform) → MediaScanner → Vec<ScannedMedia>
//!                                            ├→ LibraryView (category + search)
//!                                            └→ MediaRepository
//!                                                  → GetMediaList (filter/sort)
//! ```

pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod outcome;
pub mod repository;
pub mod scanner;
pub mod usecases;

pub use config::{ScanConfig, Settings};
pub use error::{Error, Result};
pub use library::{LibraryCategory, LibraryView, MediaItem};
pub use models::*;
pub use outcome::{combine, wrap_async, OutcomeExt};
pub use repository::{MediaRepository, MemoryRepository};
pub use scanner::{AssetSource, MediaScanner, ScanState};
pub use usecases::{GetMediaList, GetMediaListParams};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::media_from_scanned;
    use crate::scanner::{Asset, AssetPage, AssetQuery, PermissionStatus};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Single-page source: three videos, two audio tracks.
    struct StaticSource;

    fn asset(id: &str, filename: &str, created: i64) -> Asset {
        Asset {
            id: id.into(),
            filename: filename.into(),
            uri: format!("file:///{filename}"),
            duration: 120.0,
            size: Some(1_024),
            creation_time: Some(created),
            modification_time: Some(created),
            width: Some(1280),
            height: Some(720),
            album_id: None,
        }
    }

    #[async_trait]
    impl AssetSource for StaticSource {
        async fn permission_status(&self) -> Result<PermissionStatus> {
            Ok(PermissionStatus::Granted)
        }

        async fn request_permission(&self) -> Result<PermissionStatus> {
            Ok(PermissionStatus::Granted)
        }

        async fn assets(&self, query: AssetQuery) -> Result<AssetPage> {
            let assets = match query.media_type {
                MediaType::Video => vec![
                    asset("v1", "Inception.mkv", 10),
                    asset("v2", "Interstellar.mp4", 30),
                    asset("v3", "The Dark Knight.mp4", 20),
                ],
                MediaType::Audio => vec![
                    asset("a1", "Stairway to Heaven.mp3", 40),
                    asset("a2", "Hotel California.flac", 5),
                ],
            };
            Ok(AssetPage {
                total_count: assets.len() as u64,
                assets,
                has_next_page: false,
                end_cursor: None,
            })
        }

        async fn asset_info(&self, _id: &str) -> Result<Option<Asset>> {
            Ok(None)
        }

        async fn albums(&self) -> Result<Vec<scanner::Album>> {
            Ok(Vec::new())
        }

        async fn create_album(&self, name: &str) -> Result<String> {
            Ok(name.to_string())
        }
    }

    #[tokio::test]
    async fn scan_into_repository_then_query() {
        let scanner = MediaScanner::new(Arc::new(StaticSource));
        let scanned = scanner.scan_all_media(|_| {}).await.unwrap();
        assert_eq!(scanned.len(), 5);

        let repo = Arc::new(MemoryRepository::new(
            scanned.iter().map(|m| media_from_scanned(m, None)).collect(),
        ));
        repo.set_favorite("v2", true).unwrap();
        repo.set_favorite("a1", true).unwrap();

        let use_case = GetMediaList::new(repo.clone());

        let newest_videos = use_case
            .execute(&GetMediaListParams {
                media_type: Some(MediaType::Video),
                filter: Some(MediaFilter::new(SortOption::DateAdded, SortOrder::Desc)),
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<&str> = newest_videos.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Interstellar", "The Dark Knight", "Inception"]);

        let favorite_audio = use_case
            .execute(&GetMediaListParams {
                favorites_only: true,
                media_type: Some(MediaType::Audio),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(favorite_audio.len(), 1);
        assert_eq!(favorite_audio[0].id, "a1");
    }

    #[tokio::test]
    async fn scan_into_library_view() {
        let scanner = MediaScanner::new(Arc::new(StaticSource));
        let view = LibraryView::from_scan(scanner.scan_all_media(|_| {}).await.unwrap());

        assert_eq!(view.items()[0].title, "Stairway to Heaven");
        assert_eq!(view.items()[0].duration, "2:00");
        assert_eq!(view.items()[0].size, "1.0 KB");
        assert_eq!(view.counts().videos, 3);
        assert_eq!(view.visible(LibraryCategory::Video, "T").len(), 3);
    }
}
