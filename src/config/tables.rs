use super::defaults;
use super::models::{AppConfig, LogLevel, SpeedProfile};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, serde::Serialize, Default)]
pub(super) struct ConfigTables {
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    processing: ProcessingConfig,
    #[serde(default)]
    library: LibraryConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            tick_interval_ms: tables.playback.tick_interval_ms,
            speed_profile: tables.playback.speed_profile,
            default_volume: tables.playback.default_volume,
            skip_seconds: tables.playback.skip_seconds,
            upload_delay_ms: tables.processing.upload_delay_ms,
            progress_interval_ms: tables.processing.progress_interval_ms,
            completion_delay_ms: tables.processing.completion_delay_ms,
            processing_timeout_secs: tables.processing.timeout_secs,
            cache_dir: tables.library.cache_dir,
            placeholder_author: tables.library.placeholder_author,
            placeholder_category: tables.library.placeholder_category,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            playback: PlaybackConfig {
                tick_interval_ms: config.tick_interval_ms,
                speed_profile: config.speed_profile,
                default_volume: config.default_volume,
                skip_seconds: config.skip_seconds,
            },
            processing: ProcessingConfig {
                upload_delay_ms: config.upload_delay_ms,
                progress_interval_ms: config.progress_interval_ms,
                completion_delay_ms: config.completion_delay_ms,
                timeout_secs: config.processing_timeout_secs,
            },
            library: LibraryConfig {
                cache_dir: config.cache_dir.clone(),
                placeholder_author: config.placeholder_author.clone(),
                placeholder_category: config.placeholder_category.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PlaybackConfig {
    #[serde(default = "defaults::default_tick_interval_ms")]
    tick_interval_ms: u64,
    #[serde(default = "defaults::default_speed_profile")]
    speed_profile: SpeedProfile,
    #[serde(default = "defaults::default_volume")]
    default_volume: u8,
    #[serde(default = "defaults::default_skip_seconds")]
    skip_seconds: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            tick_interval_ms: defaults::default_tick_interval_ms(),
            speed_profile: defaults::default_speed_profile(),
            default_volume: defaults::default_volume(),
            skip_seconds: defaults::default_skip_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ProcessingConfig {
    #[serde(default = "defaults::default_upload_delay_ms")]
    upload_delay_ms: u64,
    #[serde(default = "defaults::default_progress_interval_ms")]
    progress_interval_ms: u64,
    #[serde(default = "defaults::default_completion_delay_ms")]
    completion_delay_ms: u64,
    #[serde(default = "defaults::default_processing_timeout_secs")]
    timeout_secs: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        ProcessingConfig {
            upload_delay_ms: defaults::default_upload_delay_ms(),
            progress_interval_ms: defaults::default_progress_interval_ms(),
            completion_delay_ms: defaults::default_completion_delay_ms(),
            timeout_secs: defaults::default_processing_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LibraryConfig {
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
    #[serde(default = "defaults::default_placeholder_author")]
    placeholder_author: String,
    #[serde(default = "defaults::default_placeholder_category")]
    placeholder_category: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfig {
            cache_dir: defaults::default_cache_dir(),
            placeholder_author: defaults::default_placeholder_author(),
            placeholder_category: defaults::default_placeholder_category(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
