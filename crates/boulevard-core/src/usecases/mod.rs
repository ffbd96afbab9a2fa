pub mod get_media_list;

pub use get_media_list::{apply_filter, GetMediaList, GetMediaListParams};
