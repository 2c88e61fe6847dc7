use serde::{Deserialize, Serialize};

/// Configuration for the journaling module (`modules.journaling`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JournalingConfig {
    /// Page size used when a list request carries no `limit`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Largest accepted `limit`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
    #[serde(default = "default_max_tags_length")]
    pub max_tags_length: usize,
    /// Length of the trailing mood trend window, in days.
    #[serde(default = "default_trend_window_days")]
    pub trend_window_days: u32,
}

impl Default for JournalingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_title_length: default_max_title_length(),
            max_tags_length: default_max_tags_length(),
            trend_window_days: default_trend_window_days(),
        }
    }
}

fn default_page_size() -> u64 {
    100
}

fn default_max_page_size() -> u64 {
    1000
}

fn default_max_title_length() -> usize {
    255
}

fn default_max_tags_length() -> usize {
    500
}

fn default_trend_window_days() -> u32 {
    30
}
