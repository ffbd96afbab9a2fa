use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub media_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_uri: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
    /// Built-in lists such as "Recently Played".
    #[serde(default)]
    pub is_system: bool,
}

impl Playlist {
    pub fn new(id: impl Into<String>, name: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            media_ids: Vec::new(),
            thumbnail_uri: None,
            created_at: now_ms,
            updated_at: now_ms,
            is_system: false,
        }
    }

    /// Append a media id. Returns false if it was already present.
    pub fn add(&mut self, media_id: &str, now_ms: i64) -> bool {
        if self.media_ids.iter().any(|id| id == media_id) {
            return false;
        }
        self.media_ids.push(media_id.to_string());
        self.updated_at = now_ms;
        true
    }

    /// Remove a media id. Returns false if it was not present.
    pub fn remove(&mut self, media_id: &str, now_ms: i64) -> bool {
        let before = self.media_ids.len();
        self.media_ids.retain(|id| id != media_id);
        let removed = self.media_ids.len() != before;
        if removed {
            self.updated_at = now_ms;
        }
        removed
    }
}
