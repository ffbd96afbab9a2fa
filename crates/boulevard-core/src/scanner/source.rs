//! The platform asset store, as the scanner sees it.
//!
//! Implementations wrap whatever the host platform offers (a mobile media
//! library, a directory tree). All methods take `&self`; sources manage their
//! own concurrency.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::MediaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetSortBy {
    #[default]
    CreationTime,
    ModificationTime,
}

/// One page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    pub media_type: MediaType,
    pub page_size: u32,
    /// Cursor returned by the previous page; `None` for the first page.
    pub after: Option<String>,
    pub sort_by: AssetSortBy,
}

/// A platform-reported media file record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub filename: String,
    pub uri: String,
    /// Seconds.
    pub duration: f64,
    /// Bytes, when the platform reports it.
    pub size: Option<u64>,
    /// Epoch seconds, if the platform knows it.
    pub creation_time: Option<i64>,
    pub modification_time: Option<i64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub album_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetPage {
    pub assets: Vec<Asset>,
    /// Total assets of the queried type, stable across pages.
    pub total_count: u64,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    pub asset_count: u64,
}

#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn permission_status(&self) -> Result<PermissionStatus>;

    /// Ask the user for access. May wait indefinitely on an interactive prompt.
    async fn request_permission(&self) -> Result<PermissionStatus>;

    async fn assets(&self, query: AssetQuery) -> Result<AssetPage>;

    async fn asset_info(&self, id: &str) -> Result<Option<Asset>>;

    async fn albums(&self) -> Result<Vec<Album>>;

    /// Create an album and return its id.
    async fn create_album(&self, name: &str) -> Result<String>;
}
