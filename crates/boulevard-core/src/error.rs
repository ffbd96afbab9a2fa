use std::any::Any;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error from a collaborator (asset source, repository backend).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// Fatal for the current scan; the user has to grant access again.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Platform asset store failed mid-enumeration.
    #[error("asset source error: {0}")]
    AssetSource(String),

    #[error("{0}")]
    FilterApplication(String),

    #[error("{0}")]
    UseCase(String),

    #[error("Media with id {0} not found")]
    MediaNotFound(String),

    #[error("Playlist with id {0} not found")]
    PlaylistNotFound(String),

    #[error("storage error: {message}")]
    Storage { message: String, code: Option<String> },

    #[error("playback error: {message}")]
    Playback { message: String, code: Option<String> },

    #[error("network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
    },

    #[error(transparent)]
    Source(#[from] BoxError),
}

impl Error {
    pub fn asset_source(err: impl std::fmt::Display) -> Self {
        Error::AssetSource(err.to_string())
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Error::PermissionDenied(_))
    }
}

/// Extract a human-readable message from a panic payload, if it carries one.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return Some((*msg).to_string());
    }
    payload.downcast_ref::<String>().cloned()
}
