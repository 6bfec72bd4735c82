use serde::Deserialize;
use ts_rs::TS;

pub(crate) const MAX_VOLUME: u8 = 100;
pub(crate) const MIN_TICK_INTERVAL_MS: u64 = 1;
pub(crate) const MAX_TICK_INTERVAL_MS: u64 = 60_000;
pub(crate) const MAX_SKIP_SECONDS: u32 = 3600;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_speed_profile")]
    pub speed_profile: SpeedProfile,
    #[serde(default = "crate::config::defaults::default_volume")]
    pub default_volume: u8,
    #[serde(default = "crate::config::defaults::default_skip_seconds")]
    pub skip_seconds: u32,
    #[serde(default = "crate::config::defaults::default_upload_delay_ms")]
    pub upload_delay_ms: u64,
    #[serde(default = "crate::config::defaults::default_progress_interval_ms")]
    pub progress_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_completion_delay_ms")]
    pub completion_delay_ms: u64,
    #[serde(default = "crate::config::defaults::default_processing_timeout_secs")]
    pub processing_timeout_secs: u64,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_placeholder_author")]
    pub placeholder_author: String,
    #[serde(default = "crate::config::defaults::default_placeholder_category")]
    pub placeholder_category: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            tick_interval_ms: crate::config::defaults::default_tick_interval_ms(),
            speed_profile: crate::config::defaults::default_speed_profile(),
            default_volume: crate::config::defaults::default_volume(),
            skip_seconds: crate::config::defaults::default_skip_seconds(),
            upload_delay_ms: crate::config::defaults::default_upload_delay_ms(),
            progress_interval_ms: crate::config::defaults::default_progress_interval_ms(),
            completion_delay_ms: crate::config::defaults::default_completion_delay_ms(),
            processing_timeout_secs: crate::config::defaults::default_processing_timeout_secs(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            placeholder_author: crate::config::defaults::default_placeholder_author(),
            placeholder_category: crate::config::defaults::default_placeholder_category(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

impl AppConfig {
    /// Keep runtime values in bounds regardless of config source.
    pub fn sanitized(mut self) -> Self {
        self.tick_interval_ms = self
            .tick_interval_ms
            .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        self.default_volume = self.default_volume.min(MAX_VOLUME);
        self.skip_seconds = self.skip_seconds.min(MAX_SKIP_SECONDS);
        if self.cache_dir.trim().is_empty() {
            self.cache_dir = crate::config::defaults::default_cache_dir();
        }
        self
    }
}

/// Which playback speed presets the player cycles through.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SpeedProfile {
    /// 1x, 1.25x, 1.5x, 2x.
    #[default]
    Standard,
    /// Standard presets plus 0.75x.
    Extended,
}

impl std::fmt::Display for SpeedProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SpeedProfile::Standard => "standard",
            SpeedProfile::Extended => "extended",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
