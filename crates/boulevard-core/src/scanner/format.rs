//! Formatting and classification helpers. Pure functions, no I/O.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::models::MediaType;

/// Supported video extensions, dot included.
pub static VIDEO_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [".mp4", ".mkv", ".avi", ".mov", ".m4v", ".3gp", ".webm", ".flv", ".wmv"]
        .into_iter()
        .collect()
});

/// Supported audio extensions, dot included.
pub static AUDIO_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [".mp3", ".m4a", ".wav", ".flac", ".aac", ".ogg", ".wma", ".opus"]
        .into_iter()
        .collect()
});

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// `0:SS` under a minute, `M:SS` under an hour, `H:MM:SS` otherwise.
/// Fractional seconds are floored.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    if total < 60 {
        return format!("0:{:02}", total);
    }

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Base-1024 size with one decimal, e.g. `1536` → `"1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, SIZE_UNITS[unit])
}

/// Lowercased extension including the dot, or `""` when there is none.
pub fn get_file_extension(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) => filename[idx..].to_lowercase(),
        None => String::new(),
    }
}

pub fn is_supported_video(filename: &str) -> bool {
    VIDEO_EXTENSIONS.contains(get_file_extension(filename).as_str())
}

pub fn is_supported_audio(filename: &str) -> bool {
    AUDIO_EXTENSIONS.contains(get_file_extension(filename).as_str())
}

/// Media type implied by a filename's extension.
pub fn classify_filename(filename: &str) -> Option<MediaType> {
    if is_supported_video(filename) {
        Some(MediaType::Video)
    } else if is_supported_audio(filename) {
        Some(MediaType::Audio)
    } else {
        None
    }
}

/// Human label for a frame size, bucketed by height.
pub fn get_resolution_string(width: Option<u32>, height: Option<u32>) -> String {
    let (width, height) = match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return "Unknown".to_string(),
    };

    let label = match height {
        h if h >= 2160 => "4K UHD",
        h if h >= 1440 => "2K QHD",
        h if h >= 1080 => "Full HD",
        h if h >= 720 => "HD",
        h if h >= 480 => "SD",
        _ => return format!("{}x{}", width, height),
    };
    label.to_string()
}
