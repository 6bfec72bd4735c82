//! Terminal front end for the audio summary player.
//!
//! Accepts one document, runs the simulated processing pipeline and then plays
//! the resulting summary, logging each transcript line as it becomes active.
//! Ctrl-C cancels processing or ends the session.

use anyhow::{Context, Result, anyhow};
use bookvoice::cancellation::CancellationToken;
use bookvoice::config::load_config;
use bookvoice::error::{PipelineError, ProcessingFailed};
use bookvoice::library::UploadStore;
use bookvoice::playback::{ENDED_ACTION, PlaybackRuntime, SHUTDOWN_ACTION};
use bookvoice::processing::{SimulatedProcessing, process_and_load};
use bookvoice::upload::{UploadRecord, accept_upload, unix_millis_now};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let path = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %path.display(),
        level = %config.log_level,
        "Starting audio summary player"
    );

    let upload = accept_upload(&[path]).context("Upload rejected")?;
    let store = UploadStore::from_config(&config);
    let record = UploadRecord::new(&upload, &config, unix_millis_now());
    let record_id = record.id;
    let stored = match store.append(record) {
        Ok(()) => true,
        Err(err) => {
            warn!(path = %store.path().display(), "Failed to record upload: {err:#}");
            false
        }
    };

    let player = PlaybackRuntime::spawn(&config).context("Failed to start playback runtime")?;
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        let player = player.clone();
        ctrlc::set_handler(move || {
            info!("Interrupt received; stopping");
            cancel.cancel();
            player.shutdown();
        })
        .context("Failed to install Ctrl-C handler")?;
    }

    // Subscribe before the book loads so early ticks and the end are not missed.
    let events = player
        .subscribe()
        .context("Playback runtime stopped before processing")?;

    let stage = SimulatedProcessing::new(&config);
    let mut last_step = None;
    let loaded = process_and_load(
        &stage,
        &upload,
        stored.then_some((&store, record_id)),
        &player,
        &mut |update| {
            if last_step != Some(update.step_idx) {
                last_step = Some(update.step_idx);
                info!(
                    step = update.step_idx + 1,
                    of = update.step_count,
                    title = %update.step_title,
                    "Processing"
                );
            }
            if update.percent % 10 == 0 {
                info!(
                    percent = update.percent,
                    minutes_left = update.estimated_minutes_remaining,
                    "Processing progress"
                );
            }
        },
        &cancel,
    );

    let event = match loaded {
        Ok(event) => event,
        Err(PipelineError::Processing(ProcessingFailed::Cancelled { stage })) => {
            info!(stage, "Processing cancelled");
            player.shutdown();
            return Ok(());
        }
        Err(err) => {
            player.shutdown();
            return Err(err).context("Could not prepare the audio summary");
        }
    };

    let snapshot = event.snapshot;
    info!(
        title = snapshot.book.as_ref().map(|book| book.title.as_str()).unwrap_or(""),
        duration = %snapshot.duration_label,
        segments = snapshot.segment_count,
        "Now playing"
    );
    if let Some(text) = &snapshot.active_segment_text {
        info!(at = %snapshot.current_time_label, "{text}");
    }

    let mut active = snapshot.active_segment_idx;
    for event in events {
        let snapshot = event.snapshot;
        if snapshot.active_segment_idx != active {
            active = snapshot.active_segment_idx;
            if let Some(text) = &snapshot.active_segment_text {
                info!(at = %snapshot.current_time_label, "{text}");
            }
        }
        if event.action == ENDED_ACTION || event.action == SHUTDOWN_ACTION {
            info!(action = event.action, "Playback finished");
            break;
        }
    }

    player.shutdown();
    Ok(())
}

fn parse_args() -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("Usage: bookvoice <path-to-document>"))?;
    Ok(PathBuf::from(path))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
