//! Scanner configuration and in-memory user settings.

use serde::{Deserialize, Deserializer, Serialize};

use crate::scanner::source::AssetSortBy;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Environment variable overriding [`ScanConfig::page_size`].
pub const PAGE_SIZE_ENV: &str = "BOULEVARD_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    /// Zero is rejected in favour of the default, as in `from_env`.
    #[serde(default = "default_page_size", deserialize_with = "deserialize_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub sort_by: AssetSortBy,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn deserialize_page_size<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match u32::deserialize(deserializer)? {
        0 => {
            log::warn!("boulevard: pageSize 0 is invalid, using {}", DEFAULT_PAGE_SIZE);
            Ok(DEFAULT_PAGE_SIZE)
        }
        n => Ok(n),
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: AssetSortBy::CreationTime,
        }
    }
}

impl ScanConfig {
    /// Defaults, with the page size taken from `BOULEVARD_PAGE_SIZE` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(PAGE_SIZE_ENV) {
            config.page_size = parse_page_size(&raw);
        }
        config
    }
}

fn parse_page_size(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            log::warn!(
                "boulevard: invalid {} {:?}, using {}",
                PAGE_SIZE_ENV,
                raw,
                DEFAULT_PAGE_SIZE
            );
            DEFAULT_PAGE_SIZE
        }
    }
}

/// User preferences. Held in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_play: bool,
    pub download_on_wifi: bool,
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_play: true,
            download_on_wifi: true,
            notifications: false,
        }
    }
}
