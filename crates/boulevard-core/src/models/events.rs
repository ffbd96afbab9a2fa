//! Domain events emitted when library or playback state changes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::media::Media;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEventKind {
    MediaAdded { media: Box<Media> },
    #[serde(rename_all = "camelCase")]
    PlaybackStarted { media_id: String },
    #[serde(rename_all = "camelCase")]
    PlaybackPaused { media_id: String, position: f64 },
    #[serde(rename_all = "camelCase")]
    PlaybackCompleted { media_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    pub id: String,
    /// Epoch milliseconds.
    pub occurred_at: i64,
    #[serde(flatten)]
    pub kind: DomainEventKind,
}

impl DomainEvent {
    pub fn new(id: impl Into<String>, occurred_at: i64, kind: DomainEventKind) -> Self {
        Self {
            id: id.into(),
            occurred_at,
            kind,
        }
    }

    pub fn media_id(&self) -> &str {
        match &self.kind {
            DomainEventKind::MediaAdded { media } => &media.id,
            DomainEventKind::PlaybackStarted { media_id }
            | DomainEventKind::PlaybackPaused { media_id, .. }
            | DomainEventKind::PlaybackCompleted { media_id } => media_id,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_value(v: &Value) -> Option<Self> {
        serde_json::from_value(v.clone()).ok()
    }
}
