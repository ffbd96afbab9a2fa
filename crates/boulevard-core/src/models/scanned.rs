use serde::{Deserialize, Serialize};

use super::media::MediaType;

/// One asset discovered by a scan. Rebuilt from scratch on every scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedMedia {
    /// Platform asset identifier, unique within the device media store.
    pub id: String,
    pub filename: String,
    pub uri: String,
    pub media_type: MediaType,
    /// Seconds.
    pub duration: f64,
    /// Bytes, when the source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Epoch seconds, 0 when unknown.
    pub creation_time: i64,
    /// Epoch seconds, 0 when unknown.
    pub modification_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
}

/// Per-asset progress report during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgress {
    /// Assets processed so far for the media type being scanned.
    pub current: u64,
    /// Total reported by the source for that media type.
    pub total: u64,
    pub current_file: String,
}

impl ScanProgress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.current as f64 / self.total as f64) * 100.0
    }
}
