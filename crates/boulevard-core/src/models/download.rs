use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    #[default]
    Pending,
    Downloading,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl DownloadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DownloadStatus::Completed | DownloadStatus::Failed | DownloadStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadTask {
    pub id: String,
    pub media_id: String,
    pub url: String,
    pub destination: String,
    /// 0 to 100.
    pub progress: u8,
    pub status: DownloadStatus,
    pub bytes_downloaded: u64,
    pub total_bytes: u64,
    /// Epoch milliseconds.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DownloadTask {
    /// Record transferred bytes and recompute the percentage.
    pub fn record_bytes(&mut self, bytes_downloaded: u64) {
        self.bytes_downloaded = bytes_downloaded;
        self.progress = if self.total_bytes == 0 {
            0
        } else {
            ((self.bytes_downloaded.min(self.total_bytes) * 100) / self.total_bytes) as u8
        };
        if self.status == DownloadStatus::Pending {
            self.status = DownloadStatus::Downloading;
        }
    }

    pub fn complete(&mut self, now_ms: i64) {
        self.status = DownloadStatus::Completed;
        self.progress = 100;
        self.completed_at = Some(now_ms);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = DownloadStatus::Failed;
        self.error = Some(message.into());
    }
}
