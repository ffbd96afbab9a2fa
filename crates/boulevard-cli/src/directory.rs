//! Directory-backed asset source.
//!
//! Walks a local directory tree and reports every supported video and audio
//! file as a platform asset. File metadata supplies times and sizes; lofty
//! supplies durations and tags where it can read the container. The
//! first-level subdirectories of the root are the albums.
//!
//! The walk and tag probing run on tokio's blocking pool. Permission and album
//! calls read a single directory inline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use boulevard_core::scanner::format::classify_filename;
use boulevard_core::scanner::{
    Album, Asset, AssetPage, AssetQuery, AssetSortBy, AssetSource, PermissionStatus,
};
use boulevard_core::{Error, MediaMetadata, MediaType, Result};
use lofty::prelude::*;
use lofty::probe::Probe;
use parking_lot::Mutex;

const MAX_SCAN_DEPTH: usize = 32;

#[derive(Debug, Clone)]
struct IndexedAsset {
    media_type: MediaType,
    asset: Asset,
    tags: Option<MediaMetadata>,
}

pub struct DirectorySource {
    root: PathBuf,
    index: Mutex<Option<Arc<Vec<IndexedAsset>>>>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: Mutex::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drop the cached walk so the next query sees the disk again.
    pub fn refresh(&self) {
        *self.index.lock() = None;
    }

    /// Tags read for `id` by the last walk. `None` before a scan, for
    /// unknown ids, and for files lofty cannot read.
    pub fn metadata(&self, id: &str) -> Option<MediaMetadata> {
        self.index
            .lock()
            .as_ref()?
            .iter()
            .find(|entry| entry.asset.id == id)?
            .tags
            .clone()
    }

    async fn index(&self) -> Result<Arc<Vec<IndexedAsset>>> {
        let cached = self.index.lock().clone();
        if let Some(index) = cached {
            return Ok(index);
        }

        let root = self.root.clone();
        let index = tokio::task::spawn_blocking(move || build_index(&root))
            .await
            .map_err(Error::asset_source)??;

        let index = Arc::new(index);
        *self.index.lock() = Some(index.clone());
        Ok(index)
    }
}

fn build_index(root: &Path) -> Result<Vec<IndexedAsset>> {
    let root = std::fs::canonicalize(root)
        .map_err(|e| Error::asset_source(format!("{}: {}", root.display(), e)))?;
    let mut files = Vec::new();
    walk(&root, 0, &mut files);
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let index: Vec<IndexedAsset> = files
        .into_iter()
        .map(|(path, media_type)| {
            let tags = read_tags(&path);
            IndexedAsset {
                media_type,
                asset: read_asset(&root, &path, tags.as_ref()),
                tags,
            }
        })
        .collect();
    log::debug!(
        "boulevard: indexed {} files under {}",
        index.len(),
        root.display()
    );
    Ok(index)
}

#[async_trait]
impl AssetSource for DirectorySource {
    async fn permission_status(&self) -> Result<PermissionStatus> {
        match std::fs::read_dir(&self.root) {
            Ok(_) => Ok(PermissionStatus::Granted),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Ok(PermissionStatus::Denied)
            }
            Err(e) => Err(Error::asset_source(format!(
                "{}: {}",
                self.root.display(),
                e
            ))),
        }
    }

    /// Filesystem access cannot be prompted for; re-check instead.
    async fn request_permission(&self) -> Result<PermissionStatus> {
        self.permission_status().await
    }

    async fn assets(&self, query: AssetQuery) -> Result<AssetPage> {
        if query.after.is_none() {
            self.refresh();
        }
        let index = self.index().await?;

        let mut matching: Vec<&Asset> = index
            .iter()
            .filter(|entry| entry.media_type == query.media_type)
            .map(|entry| &entry.asset)
            .collect();
        let sort_key = |asset: &Asset| match query.sort_by {
            AssetSortBy::CreationTime => asset.creation_time,
            AssetSortBy::ModificationTime => asset.modification_time,
        };
        matching.sort_by(|a, b| sort_key(*b).cmp(&sort_key(*a)));

        let offset = match &query.after {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| Error::asset_source(format!("invalid cursor {:?}", cursor)))?,
            None => 0,
        };
        let page_size = query.page_size.max(1) as usize;
        let end = offset.saturating_add(page_size).min(matching.len());
        let assets: Vec<Asset> = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|asset| (*asset).clone())
            .collect();
        let has_next_page = end < matching.len();

        Ok(AssetPage {
            assets,
            total_count: matching.len() as u64,
            has_next_page,
            end_cursor: has_next_page.then(|| end.to_string()),
        })
    }

    async fn asset_info(&self, id: &str) -> Result<Option<Asset>> {
        Ok(self
            .index()
            .await?
            .iter()
            .find(|entry| entry.asset.id == id)
            .map(|entry| entry.asset.clone()))
    }

    async fn albums(&self) -> Result<Vec<Album>> {
        let index = self.index().await?;
        let entries = std::fs::read_dir(&self.root).map_err(Error::asset_source)?;

        let mut albums: Vec<Album> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .map(|name| Album {
                asset_count: index
                    .iter()
                    .filter(|entry| entry.asset.album_id.as_deref() == Some(name.as_str()))
                    .count() as u64,
                id: name.clone(),
                title: name,
            })
            .collect();
        albums.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(albums)
    }

    async fn create_album(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(Error::Storage {
                message: format!("invalid album name {:?}", name),
                code: None,
            });
        }
        std::fs::create_dir(self.root.join(name)).map_err(|e| Error::Storage {
            message: format!("create album {:?}: {}", name, e),
            code: Some(format!("{:?}", e.kind())),
        })?;
        Ok(name.to_string())
    }
}

fn walk(dir: &Path, depth: usize, out: &mut Vec<(PathBuf, MediaType)>) {
    if depth > MAX_SCAN_DEPTH {
        log::warn!("boulevard: scan depth limit reached at {}", dir.display());
        return;
    }
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("boulevard: cannot read {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with('.') {
            continue;
        }
        // Symlinked directories are skipped to avoid loops.
        let Ok(file_type) = entry.file_type() else { continue };
        let path = entry.path();
        if file_type.is_dir() {
            walk(&path, depth + 1, out);
        } else if let Some(media_type) = classify_filename(name) {
            if path.is_file() {
                out.push((path, media_type));
            }
        }
    }
}

fn read_asset(root: &Path, path: &Path, tags: Option<&MediaMetadata>) -> Asset {
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let metadata = std::fs::metadata(path).ok();
    let album_id = path
        .strip_prefix(root)
        .ok()
        .and_then(|rel| rel.parent())
        .and_then(|parent| parent.components().next())
        .and_then(|first| first.as_os_str().to_str())
        .map(str::to_string);

    Asset {
        id: stable_id(path),
        uri: format!("file://{}", path.display()),
        duration: tags.map_or(0.0, |t| t.duration),
        size: metadata.as_ref().map(|m| m.len()),
        creation_time: metadata.as_ref().and_then(|m| epoch_secs(m.created())),
        modification_time: metadata.as_ref().and_then(|m| epoch_secs(m.modified())),
        width: None,
        height: None,
        album_id,
        filename,
    }
}

/// Duration and tags via lofty, or `None` when it cannot read the container.
fn read_tags(path: &Path) -> Option<MediaMetadata> {
    let tagged = match Probe::open(path).and_then(|p| p.read()) {
        Ok(tagged) => tagged,
        Err(e) => {
            log::debug!("boulevard: no tags for {}: {}", path.display(), e);
            return None;
        }
    };
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());

    Some(MediaMetadata {
        title: tag
            .and_then(|t| t.title().map(|s| s.to_string()))
            .unwrap_or_default(),
        artist: tag.and_then(|t| t.artist().map(|s| s.to_string())),
        album: tag.and_then(|t| t.album().map(|s| s.to_string())),
        year: tag.and_then(|t| t.year()).and_then(|y| u16::try_from(y).ok()),
        genre: tag.and_then(|t| t.genre().map(|s| s.to_string())),
        duration: tagged.properties().duration().as_secs_f64(),
        thumbnail_data: None,
    })
}

fn epoch_secs(time: std::io::Result<SystemTime>) -> Option<i64> {
    let since = time.ok()?.duration_since(UNIX_EPOCH).ok()?;
    i64::try_from(since.as_secs()).ok()
}

/// FNV-1a over the full path, prefixed with a sanitized file stem. The same
/// file gets the same id on every scan.
pub fn stable_id(path: &Path) -> String {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in path.to_string_lossy().bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    let stem: String = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}_{:016x}", stem, hash)
}
