//! Media scanner — permission-gated, paginated discovery of video and audio.
//!
//! A full scan walks an explicit state machine:
//!
//! ```text
//! Idle → CheckingPermission ─granted──────────────────────→ Granted
//!             └─not granted→ RequestingPermission ─granted─┘    │
//!                                    └─denied→ Failed           ↓
//!                                 ScanningVideo → ScanningAudio → Completed
//! ```
//!
//! Pages are awaited strictly in cursor order, video before audio, so progress
//! for one media type never interleaves with the other. A source error while
//! paging degrades to the assets collected so far for that type.

pub mod format;
pub mod source;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::models::{MediaType, ScanProgress, ScannedMedia};

pub use format::{
    classify_filename, format_duration, format_file_size, get_file_extension,
    get_resolution_string, is_supported_audio, is_supported_video,
};
pub use source::{Album, Asset, AssetPage, AssetQuery, AssetSortBy, AssetSource, PermissionStatus};

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    CheckingPermission,
    RequestingPermission,
    Granted,
    ScanningVideo,
    ScanningAudio,
    Completed,
    /// Permission refused. Terminal; a new scan starts again from `Idle`.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    Start,
    PermissionChecked { granted: bool },
    PermissionRequested { granted: bool },
    BeginScan,
    MediaTypeDone,
}

impl ScanState {
    /// Transition on `event`. Events that do not apply leave the state as is.
    pub fn next(self, event: ScanEvent) -> ScanState {
        use ScanEvent as E;
        use ScanState as S;

        match (self, event) {
            (S::Idle, E::Start) => S::CheckingPermission,
            (S::CheckingPermission, E::PermissionChecked { granted: true }) => S::Granted,
            (S::CheckingPermission, E::PermissionChecked { granted: false }) => {
                S::RequestingPermission
            }
            (S::RequestingPermission, E::PermissionRequested { granted: true }) => S::Granted,
            (S::RequestingPermission, E::PermissionRequested { granted: false }) => S::Failed,
            (S::Granted, E::BeginScan) => S::ScanningVideo,
            (S::ScanningVideo, E::MediaTypeDone) => S::ScanningAudio,
            (S::ScanningAudio, E::MediaTypeDone) => S::Completed,
            (state, _) => state,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Completed | ScanState::Failed)
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

pub struct MediaScanner {
    source: Arc<dyn AssetSource>,
    config: ScanConfig,
    /// State reached by the most recent `scan_all_media` call.
    last_state: Mutex<ScanState>,
}

impl std::fmt::Debug for MediaScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaScanner")
            .field("config", &self.config)
            .field("last_state", &*self.last_state.lock())
            .finish_non_exhaustive()
    }
}

impl MediaScanner {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self::with_config(source, ScanConfig::default())
    }

    pub fn with_config(source: Arc<dyn AssetSource>, config: ScanConfig) -> Self {
        Self {
            source,
            config,
            last_state: Mutex::new(ScanState::Idle),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn last_state(&self) -> ScanState {
        *self.last_state.lock()
    }

    /// Ask for media library access. Source errors read as "not granted".
    pub async fn request_permissions(&self) -> bool {
        match self.source.request_permission().await {
            Ok(status) => status.is_granted(),
            Err(e) => {
                log::error!("boulevard: permission request failed: {}", e);
                false
            }
        }
    }

    /// Check current media library access. Source errors read as "not granted".
    pub async fn check_permissions(&self) -> bool {
        match self.source.permission_status().await {
            Ok(status) => status.is_granted(),
            Err(e) => {
                log::error!("boulevard: permission check failed: {}", e);
                false
            }
        }
    }

    /// Full scan: videos, then audio.
    ///
    /// Fails only when permission is denied. Each call is independent of any
    /// previous scan.
    pub async fn scan_all_media<F>(&self, mut on_progress: F) -> Result<Vec<ScannedMedia>>
    where
        F: FnMut(&ScanProgress),
    {
        let mut state = self.advance(ScanState::Idle, ScanEvent::Start);

        let granted = self.check_permissions().await;
        state = self.advance(state, ScanEvent::PermissionChecked { granted });
        if state == ScanState::RequestingPermission {
            let granted = self.request_permissions().await;
            state = self.advance(state, ScanEvent::PermissionRequested { granted });
        }
        if state == ScanState::Failed {
            return Err(Error::PermissionDenied("media library".to_string()));
        }

        state = self.advance(state, ScanEvent::BeginScan);
        let mut all_media = self.scan_videos(&mut on_progress).await;

        state = self.advance(state, ScanEvent::MediaTypeDone);
        all_media.extend(self.scan_audio(&mut on_progress).await);

        self.advance(state, ScanEvent::MediaTypeDone);
        log::debug!("boulevard: scan completed with {} assets", all_media.len());
        Ok(all_media)
    }

    /// Scan video assets. Never fails; a source error yields what was collected.
    pub async fn scan_videos<F>(&self, on_progress: F) -> Vec<ScannedMedia>
    where
        F: FnMut(&ScanProgress),
    {
        self.scan_type(MediaType::Video, on_progress).await
    }

    /// Scan audio assets. Never fails; a source error yields what was collected.
    pub async fn scan_audio<F>(&self, on_progress: F) -> Vec<ScannedMedia>
    where
        F: FnMut(&ScanProgress),
    {
        self.scan_type(MediaType::Audio, on_progress).await
    }

    pub async fn asset_info(&self, id: &str) -> Option<Asset> {
        match self.source.asset_info(id).await {
            Ok(asset) => asset,
            Err(e) => {
                log::error!("boulevard: failed to get asset info for {}: {}", id, e);
                None
            }
        }
    }

    pub async fn albums(&self) -> Vec<Album> {
        match self.source.albums().await {
            Ok(albums) => albums,
            Err(e) => {
                log::error!("boulevard: failed to get albums: {}", e);
                Vec::new()
            }
        }
    }

    /// Create an album and return its id, or `None` if the source refused.
    pub async fn create_album(&self, name: &str) -> Option<String> {
        match self.source.create_album(name).await {
            Ok(id) => Some(id),
            Err(e) => {
                log::error!("boulevard: failed to create album {:?}: {}", name, e);
                None
            }
        }
    }

    fn advance(&self, state: ScanState, event: ScanEvent) -> ScanState {
        let next = state.next(event);
        log::debug!("boulevard: scan {:?} --{:?}--> {:?}", state, event, next);
        *self.last_state.lock() = next;
        next
    }

    async fn scan_type<F>(&self, media_type: MediaType, mut on_progress: F) -> Vec<ScannedMedia>
    where
        F: FnMut(&ScanProgress),
    {
        let mut found = Vec::new();
        if let Err(e) = self
            .collect_pages(media_type, &mut found, &mut on_progress)
            .await
        {
            log::error!(
                "boulevard: {} scan failed after {} assets: {}",
                media_type.as_str(),
                found.len(),
                e
            );
        }
        found
    }

    async fn collect_pages<F>(
        &self,
        media_type: MediaType,
        found: &mut Vec<ScannedMedia>,
        on_progress: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&ScanProgress),
    {
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .source
                .assets(AssetQuery {
                    media_type,
                    page_size: self.config.page_size,
                    after: cursor.take(),
                    sort_by: self.config.sort_by,
                })
                .await?;

            for asset in page.assets {
                on_progress(&ScanProgress {
                    current: found.len() as u64 + 1,
                    total: page.total_count,
                    current_file: asset.filename.clone(),
                });
                found.push(to_scanned(asset, media_type));
            }

            if !page.has_next_page {
                return Ok(());
            }
            match page.end_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    // Without a cursor the next request would restart at page one.
                    log::warn!(
                        "boulevard: {} source reported another page without a cursor",
                        media_type.as_str()
                    );
                    return Ok(());
                }
            }
        }
    }
}

fn to_scanned(asset: Asset, media_type: MediaType) -> ScannedMedia {
    let (width, height) = match media_type {
        MediaType::Video => (asset.width, asset.height),
        MediaType::Audio => (None, None),
    };
    ScannedMedia {
        id: asset.id,
        filename: asset.filename,
        uri: asset.uri,
        media_type,
        duration: asset.duration,
        size: asset.size,
        creation_time: asset.creation_time.unwrap_or(0),
        modification_time: asset.modification_time.unwrap_or(0),
        width,
        height,
        album_id: asset.album_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// In-memory asset store. Pages are slices of the per-type asset lists;
    /// `fail_at_page` makes the N-th page request (0-based) of a type fail.
    struct FakeSource {
        videos: Vec<Asset>,
        audio: Vec<Asset>,
        status: PermissionStatus,
        grant_on_request: bool,
        fail_video_at_page: Option<usize>,
        fail_audio_at_page: Option<usize>,
        /// Report more pages but never hand out a cursor.
        withhold_cursor: bool,
        queries: Mutex<Vec<AssetQuery>>,
        permission_requests: Mutex<u32>,
    }

    impl FakeSource {
        fn new(videos: usize, audio: usize) -> Self {
            Self {
                videos: (0..videos).map(|i| asset("v", i, Some(1920), Some(1080))).collect(),
                audio: (0..audio).map(|i| asset("a", i, Some(1), Some(1))).collect(),
                status: PermissionStatus::Granted,
                grant_on_request: true,
                fail_video_at_page: None,
                fail_audio_at_page: None,
                withhold_cursor: false,
                queries: Mutex::new(Vec::new()),
                permission_requests: Mutex::new(0),
            }
        }
    }

    fn asset(prefix: &str, i: usize, width: Option<u32>, height: Option<u32>) -> Asset {
        Asset {
            id: format!("{prefix}{i}"),
            filename: format!("{prefix}{i}.bin"),
            uri: format!("file:///media/{prefix}{i}"),
            duration: 10.0 + i as f64,
            size: Some(1_024 * (i as u64 + 1)),
            creation_time: if i == 0 { None } else { Some(1_000 + i as i64) },
            modification_time: Some(2_000),
            width,
            height,
            album_id: None,
        }
    }

    #[async_trait]
    impl AssetSource for FakeSource {
        async fn permission_status(&self) -> Result<PermissionStatus> {
            Ok(self.status)
        }

        async fn request_permission(&self) -> Result<PermissionStatus> {
            *self.permission_requests.lock() += 1;
            Ok(if self.grant_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            })
        }

        async fn assets(&self, query: AssetQuery) -> Result<AssetPage> {
            let (list, fail_at) = match query.media_type {
                MediaType::Video => (&self.videos, self.fail_video_at_page),
                MediaType::Audio => (&self.audio, self.fail_audio_at_page),
            };
            let start: usize = query
                .after
                .as_deref()
                .map(|c| c.parse().unwrap())
                .unwrap_or(0);
            let page_index = start / query.page_size as usize;
            self.queries.lock().push(query.clone());
            if fail_at == Some(page_index) {
                return Err(Error::asset_source("store went away"));
            }
            let end = (start + query.page_size as usize).min(list.len());
            Ok(AssetPage {
                assets: list[start..end].to_vec(),
                total_count: list.len() as u64,
                has_next_page: end < list.len(),
                end_cursor: (!self.withhold_cursor).then(|| end.to_string()),
            })
        }

        async fn asset_info(&self, id: &str) -> Result<Option<Asset>> {
            if id == "broken" {
                return Err(Error::asset_source("lookup failed"));
            }
            Ok(self.videos.iter().chain(&self.audio).find(|a| a.id == id).cloned())
        }

        async fn albums(&self) -> Result<Vec<Album>> {
            Err(Error::asset_source("albums unavailable"))
        }

        async fn create_album(&self, name: &str) -> Result<String> {
            Ok(format!("album-{name}"))
        }
    }

    fn scanner(source: FakeSource, page_size: u32) -> (Arc<FakeSource>, MediaScanner) {
        let source = Arc::new(source);
        let config = ScanConfig {
            page_size,
            ..ScanConfig::default()
        };
        let scanner = MediaScanner::with_config(source.clone(), config);
        (source, scanner)
    }

    // -------------------------------------------------------------------
    // State machine
    // -------------------------------------------------------------------

    #[test]
    fn state_machine_happy_path() {
        let state = ScanState::Idle
            .next(ScanEvent::Start)
            .next(ScanEvent::PermissionChecked { granted: true })
            .next(ScanEvent::BeginScan)
            .next(ScanEvent::MediaTypeDone)
            .next(ScanEvent::MediaTypeDone);
        assert_eq!(state, ScanState::Completed);
        assert!(state.is_terminal());
    }

    #[test]
    fn state_machine_denied_is_terminal() {
        let state = ScanState::Idle
            .next(ScanEvent::Start)
            .next(ScanEvent::PermissionChecked { granted: false });
        assert_eq!(state, ScanState::RequestingPermission);
        let state = state.next(ScanEvent::PermissionRequested { granted: false });
        assert_eq!(state, ScanState::Failed);
        assert_eq!(state.next(ScanEvent::BeginScan), ScanState::Failed);
        assert_eq!(state.next(ScanEvent::Start), ScanState::Failed);
    }

    #[test]
    fn state_machine_ignores_out_of_order_events() {
        assert_eq!(ScanState::Idle.next(ScanEvent::BeginScan), ScanState::Idle);
        assert_eq!(
            ScanState::Granted.next(ScanEvent::MediaTypeDone),
            ScanState::Granted
        );
    }

    // -------------------------------------------------------------------
    // Scanning
    // -------------------------------------------------------------------

    #[tokio::test]
    async fn scan_all_returns_videos_then_audio() {
        let (source, scanner) = scanner(FakeSource::new(5, 3), 2);

        let mut events = Vec::new();
        let media = scanner.scan_all_media(|p| events.push(p.clone())).await.unwrap();

        let ids: Vec<&str> = media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["v0", "v1", "v2", "v3", "v4", "a0", "a1", "a2"]);
        assert_eq!(scanner.last_state(), ScanState::Completed);

        let currents: Vec<u64> = events.iter().map(|e| e.current).collect();
        assert_eq!(currents, [1, 2, 3, 4, 5, 1, 2, 3]);
        assert!(events[..5].iter().all(|e| e.total == 5));
        assert!(events[5..].iter().all(|e| e.total == 3));
        assert_eq!(events[0].current_file, "v0.bin");

        let queries = source.queries.lock();
        assert_eq!(queries.len(), 3 + 2);
        assert!(queries.iter().all(|q| q.page_size == 2));
        assert_eq!(queries[0].after, None);
        assert_eq!(queries[1].after.as_deref(), Some("2"));
        assert_eq!(queries[3].media_type, MediaType::Audio);
        assert_eq!(queries[3].after, None);
    }

    #[tokio::test]
    async fn audio_never_carries_dimensions() {
        let (_source, scanner) = scanner(FakeSource::new(1, 2), 100);
        let media = scanner.scan_all_media(|_| {}).await.unwrap();

        assert_eq!(media[0].media_type, MediaType::Video);
        assert_eq!(media[0].width, Some(1920));
        assert_eq!(media[0].height, Some(1080));
        for audio in &media[1..] {
            assert_eq!(audio.media_type, MediaType::Audio);
            assert_eq!(audio.width, None);
            assert_eq!(audio.height, None);
        }
    }

    #[tokio::test]
    async fn unknown_times_default_to_zero() {
        let (_source, scanner) = scanner(FakeSource::new(2, 0), 100);
        let media = scanner.scan_videos(|_| {}).await;
        assert_eq!(media[0].creation_time, 0);
        assert_eq!(media[1].creation_time, 1_001);
        assert_eq!(media[1].modification_time, 2_000);
    }

    #[tokio::test]
    async fn partial_video_failure_keeps_collected_and_scans_audio() {
        let mut source = FakeSource::new(10, 2);
        source.fail_video_at_page = Some(1);
        let (_source, scanner) = scanner(source, 3);

        let videos = scanner.scan_videos(|_| {}).await;
        assert_eq!(videos.len(), 3);

        let media = scanner.scan_all_media(|_| {}).await.unwrap();
        let ids: Vec<&str> = media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["v0", "v1", "v2", "a0", "a1"]);
        assert_eq!(scanner.last_state(), ScanState::Completed);
    }

    #[tokio::test]
    async fn failure_on_first_page_yields_empty() {
        let mut source = FakeSource::new(2, 4);
        source.fail_audio_at_page = Some(0);
        let (_source, scanner) = scanner(source, 100);

        assert!(scanner.scan_audio(|_| {}).await.is_empty());
        let media = scanner.scan_all_media(|_| {}).await.unwrap();
        assert_eq!(media.len(), 2);
    }

    #[tokio::test]
    async fn missing_cursor_stops_that_media_type() {
        let mut source = FakeSource::new(5, 1);
        source.withhold_cursor = true;
        let (source, scanner) = scanner(source, 2);

        let media = scanner.scan_all_media(|_| {}).await.unwrap();
        let ids: Vec<&str> = media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["v0", "v1", "a0"]);

        let queries = source.queries.lock();
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q.after.is_none()));
        assert_eq!(scanner.last_state(), ScanState::Completed);
    }

    #[tokio::test]
    async fn permission_requested_when_not_granted() {
        let mut source = FakeSource::new(1, 1);
        source.status = PermissionStatus::Undetermined;
        let (source, scanner) = scanner(source, 100);

        let media = scanner.scan_all_media(|_| {}).await.unwrap();
        assert_eq!(media.len(), 2);
        assert_eq!(*source.permission_requests.lock(), 1);
    }

    #[tokio::test]
    async fn permission_denied_fails_without_scanning() {
        let mut source = FakeSource::new(3, 3);
        source.status = PermissionStatus::Denied;
        source.grant_on_request = false;
        let (source, scanner) = scanner(source, 100);

        let err = scanner.scan_all_media(|_| {}).await.unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(scanner.last_state(), ScanState::Failed);
        assert!(source.queries.lock().is_empty());
    }

    #[tokio::test]
    async fn repeated_scans_are_independent() {
        let (_source, scanner) = scanner(FakeSource::new(2, 2), 1);
        let first = scanner.scan_all_media(|_| {}).await.unwrap();
        let second = scanner.scan_all_media(|_| {}).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.len(), 4);
    }

    #[tokio::test]
    async fn extras_degrade_on_error() {
        let (_source, scanner) = scanner(FakeSource::new(1, 1), 100);
        assert_eq!(scanner.asset_info("a0").await.map(|a| a.id), Some("a0".into()));
        assert_eq!(scanner.asset_info("missing").await, None);
        assert_eq!(scanner.asset_info("broken").await, None);
        assert!(scanner.albums().await.is_empty());
        assert_eq!(scanner.create_album("Trips").await.as_deref(), Some("album-Trips"));
    }
}
