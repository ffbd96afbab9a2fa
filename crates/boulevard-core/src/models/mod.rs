//! Boulevard data models.
//!
//! Plain serde structs and string enums. Wire names follow the camelCase
//! keys the presentation layer already consumes.

pub mod download;
pub mod events;
pub mod filter;
pub mod media;
pub mod playback;
pub mod playlist;
pub mod scanned;

pub use download::{DownloadStatus, DownloadTask};
pub use events::{DomainEvent, DomainEventKind};
pub use filter::{MediaFilter, SortOption, SortOrder};
pub use media::{
    AudioDetails, Media, MediaDetails, MediaMetadata, MediaType, TimeRange, VideoDetails,
};
pub use playback::{PlaybackState, RepeatMode};
pub use playlist::Playlist;
pub use scanned::{ScanProgress, ScannedMedia};
