//! GetMediaList — fetch media from the repository, optionally filtered and sorted.

use std::cmp::Ordering;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use icu_collator::{Collator, CollatorOptions, Strength};

use crate::error::{panic_message, Error, Result};
use crate::models::{Media, MediaFilter, MediaType, SortOption, SortOrder};
use crate::repository::MediaRepository;

const GET_MEDIA_LIST_FAILED: &str = "Failed to get media list";
const APPLY_FILTER_FAILED: &str = "Failed to apply filter";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetMediaListParams {
    pub filter: Option<MediaFilter>,
    pub media_type: Option<MediaType>,
    pub favorites_only: bool,
}

pub struct GetMediaList {
    repository: Arc<dyn MediaRepository>,
}

impl std::fmt::Debug for GetMediaList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetMediaList").finish_non_exhaustive()
    }
}

impl GetMediaList {
    pub fn new(repository: Arc<dyn MediaRepository>) -> Self {
        Self { repository }
    }

    /// Resolve `params` against the repository. First matching rule wins:
    ///
    /// 1. `favorites_only`: favorites, narrowed by `media_type` if given.
    ///    `filter` is not applied on this path.
    /// 2. `media_type`: items of that type, then `filter` if given.
    /// 3. `filter`: delegated to the repository as is.
    /// 4. everything.
    ///
    /// Repository failures pass through unchanged. A panic inside the
    /// repository is reported as [`Error::UseCase`].
    pub async fn execute(&self, params: &GetMediaListParams) -> Result<Vec<Media>> {
        match AssertUnwindSafe(self.resolve(params)).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref())
                    .unwrap_or_else(|| GET_MEDIA_LIST_FAILED.to_string());
                log::error!("boulevard: media list query panicked: {}", message);
                Err(Error::UseCase(message))
            }
        }
    }

    async fn resolve(&self, params: &GetMediaListParams) -> Result<Vec<Media>> {
        if params.favorites_only {
            let favorites = self.repository.get_favorites().await?;
            return Ok(match params.media_type {
                Some(media_type) => favorites
                    .into_iter()
                    .filter(|m| m.media_type() == media_type)
                    .collect(),
                None => favorites,
            });
        }

        if let Some(media_type) = params.media_type {
            let media = self.repository.get_by_type(media_type).await?;
            return match &params.filter {
                Some(filter) => apply_filter(media, filter),
                None => Ok(media),
            };
        }

        if let Some(filter) = &params.filter {
            return self.repository.filter(filter).await;
        }

        self.repository.get_all().await
    }
}

/// Search and stable-sort `media` according to `filter`.
///
/// `filter.media_type` is not consulted here; callers narrow by type first.
pub fn apply_filter(media: Vec<Media>, filter: &MediaFilter) -> Result<Vec<Media>> {
    std::panic::catch_unwind(AssertUnwindSafe(|| search_and_sort(media, filter))).map_err(
        |payload| {
            Error::FilterApplication(
                panic_message(payload.as_ref()).unwrap_or_else(|| APPLY_FILTER_FAILED.to_string()),
            )
        },
    )
}

fn search_and_sort(mut media: Vec<Media>, filter: &MediaFilter) -> Vec<Media> {
    if let Some(query) = filter.search_query.as_deref().filter(|q| !q.is_empty()) {
        let query = query.to_lowercase();
        media.retain(|m| matches_query(m, &query));
    }

    merge_sort_by(media, &mut |a: &Media, b: &Media| {
        let ordering = compare_by(a, b, filter.sort_by);
        match filter.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    })
}

/// Stable top-down merge sort.
///
/// Accepts comparators that are not total orders (the artist comparator ties
/// a video with everything) and never panics on them, unlike `slice::sort_by`.
/// On a tie the left element is taken first.
fn merge_sort_by<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        merged.extend(if take_left { left.next() } else { right.next() });
    }
    merged
}

/// `query` must already be lowercased.
fn matches_query(media: &Media, query: &str) -> bool {
    let contains = |field: Option<&str>| field.is_some_and(|v| v.to_lowercase().contains(query));
    contains(Some(media.title.as_str()))
        || contains(media.artist())
        || contains(media.album())
}

/// Ascending comparison of two items on `sort_by`.
///
/// For [`SortOption::Artist`], a pair where either side has no artist field
/// (a video) compares equal, while an audio track without a value sorts as `""`.
pub fn compare_by(a: &Media, b: &Media, sort_by: SortOption) -> Ordering {
    match sort_by {
        SortOption::Title => locale_compare(&a.title, &b.title),
        SortOption::DateAdded => a.created_at.cmp(&b.created_at),
        SortOption::Duration => a.duration.total_cmp(&b.duration),
        SortOption::Size => a.size.cmp(&b.size),
        SortOption::Artist => match (a.artist(), b.artist()) {
            (Some(x), Some(y)) => locale_compare(x, y),
            _ => Ordering::Equal,
        },
        SortOption::Unrecognized => Ordering::Equal,
    }
}

thread_local! {
    static ROOT_COLLATOR: Option<Collator> = root_collator();
}

fn root_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            log::warn!("boulevard: collator unavailable, using case-folded order: {}", e);
            None
        }
    }
}

/// Root-locale collation at tertiary strength: accents fold at the primary
/// level and lowercase sorts before uppercase on a case-only difference.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    ROOT_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| b.cmp(a)),
    })
}
