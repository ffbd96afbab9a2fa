use serde::{Deserialize, Serialize};

use super::media::MediaType;

/// Sort key for media lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    Title,
    DateAdded,
    Duration,
    Size,
    Artist,
    /// Any key this build does not know. Compares every pair as equal.
    #[serde(other)]
    Unrecognized,
}

impl SortOption {
    pub fn parse(s: &str) -> Self {
        match s {
            "title" => SortOption::Title,
            "dateAdded" => SortOption::DateAdded,
            "duration" => SortOption::Duration,
            "size" => SortOption::Size,
            "artist" => SortOption::Artist,
            _ => SortOption::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFilter {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    pub sort_by: SortOption,
    pub sort_order: SortOrder,
}

impl MediaFilter {
    pub fn new(sort_by: SortOption, sort_order: SortOrder) -> Self {
        Self {
            media_type: None,
            search_query: None,
            sort_by,
            sort_order,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn with_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }
}
