//! Media repository contract and an in-memory implementation.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::models::{Media, MediaFilter, MediaType};
use crate::usecases::get_media_list::apply_filter;

#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Media>>;
    async fn get_by_type(&self, media_type: MediaType) -> Result<Vec<Media>>;
    async fn get_favorites(&self) -> Result<Vec<Media>>;
    /// Filter and sort with the repository's own query support.
    async fn filter(&self, filter: &MediaFilter) -> Result<Vec<Media>>;
}

/// Repository over a `Vec<Media>` held in memory. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    items: Mutex<Vec<Media>>,
}

impl MemoryRepository {
    pub fn new(items: Vec<Media>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    /// Replace the whole contents, e.g. with the result of a fresh scan.
    pub fn replace_all(&self, items: Vec<Media>) {
        *self.items.lock() = items;
    }

    pub fn set_favorite(&self, id: &str, favorite: bool) -> Result<()> {
        let mut items = self.items.lock();
        let media = items
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::MediaNotFound(id.to_string()))?;
        media.is_favorite = favorite;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

#[async_trait]
impl MediaRepository for MemoryRepository {
    async fn get_all(&self) -> Result<Vec<Media>> {
        Ok(self.items.lock().clone())
    }

    async fn get_by_type(&self, media_type: MediaType) -> Result<Vec<Media>> {
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|m| m.media_type() == media_type)
            .cloned()
            .collect())
    }

    async fn get_favorites(&self) -> Result<Vec<Media>> {
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|m| m.is_favorite)
            .cloned()
            .collect())
    }

    async fn filter(&self, filter: &MediaFilter) -> Result<Vec<Media>> {
        let candidates: Vec<Media> = match filter.media_type {
            Some(media_type) => self.get_by_type(media_type).await?,
            None => self.get_all().await?,
        };
        apply_filter(candidates, filter)
    }
}
