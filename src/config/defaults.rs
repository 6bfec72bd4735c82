pub(crate) fn default_tick_interval_ms() -> u64 {
    1000
}

pub(crate) fn default_speed_profile() -> crate::config::SpeedProfile {
    crate::config::SpeedProfile::Standard
}

pub(crate) fn default_volume() -> u8 {
    70
}

pub(crate) fn default_skip_seconds() -> u32 {
    15
}

pub(crate) fn default_upload_delay_ms() -> u64 {
    1000
}

pub(crate) fn default_progress_interval_ms() -> u64 {
    100
}

pub(crate) fn default_completion_delay_ms() -> u64 {
    1000
}

pub(crate) fn default_processing_timeout_secs() -> u64 {
    120
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_placeholder_author() -> String {
    "Unknown author".to_string()
}

pub(crate) fn default_placeholder_category() -> String {
    "Other".to_string()
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}
