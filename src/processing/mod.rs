//! Turning an accepted upload into a playable book.
//!
//! A [`ProcessingStage`] produces exactly one [`Book`] or fails. Only a
//! successful run reaches the player; a failed run leaves it untouched.

pub mod simulated;

use crate::book::Book;
use crate::cancellation::CancellationToken;
use crate::error::{PipelineError, ProcessingFailed};
use crate::library::UploadStore;
use crate::playback::{PlaybackEvent, PlaybackHandle};
use crate::upload::{AcceptedUpload, RecordStatus};
use serde::Serialize;
use tracing::{error, info, warn};
use ts_rs::TS;

pub use simulated::SimulatedProcessing;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ProcessingProgress {
    pub percent: u8,
    pub step_idx: usize,
    pub step_count: usize,
    pub step_title: String,
    pub estimated_minutes_remaining: u32,
}

/// Coarse remaining-time estimate shown next to the progress bar.
pub fn estimated_minutes_remaining(percent: u8) -> u32 {
    let remaining = 100u32.saturating_sub(u32::from(percent));
    remaining.div_ceil(10).max(1)
}

pub trait ProcessingStage {
    fn process(
        &self,
        upload: &AcceptedUpload,
        progress: &mut dyn FnMut(&ProcessingProgress),
        cancel: &CancellationToken,
    ) -> Result<Book, ProcessingFailed>;
}

/// Run `stage` for `upload` and hand the result to the player.
///
/// The upload record identified by `record_id` follows the outcome; store
/// failures are logged and never abort playback.
pub fn process_and_load<S: ProcessingStage>(
    stage: &S,
    upload: &AcceptedUpload,
    record: Option<(&UploadStore, u64)>,
    player: &PlaybackHandle,
    progress: &mut dyn FnMut(&ProcessingProgress),
    cancel: &CancellationToken,
) -> Result<PlaybackEvent, PipelineError> {
    let mut last_percent = 0u8;
    let result = stage.process(
        upload,
        &mut |update: &ProcessingProgress| {
            last_percent = update.percent;
            progress(update);
        },
        cancel,
    );

    match result {
        Ok(book) => {
            info!(book_id = %book.id, title = %book.title, "Processing finished");
            update_record(record, RecordStatus::Completed, 100);
            Ok(player.load_book(book)?)
        }
        Err(err) => {
            error!(path = %upload.path.display(), "Processing failed: {err}");
            update_record(record, RecordStatus::Failed, last_percent);
            Err(err.into())
        }
    }
}

fn update_record(record: Option<(&UploadStore, u64)>, status: RecordStatus, progress: u8) {
    let Some((store, id)) = record else {
        return;
    };
    match store.update(id, status, progress) {
        Ok(true) => {}
        Ok(false) => warn!(id, "Upload record disappeared before update"),
        Err(err) => warn!(id, "Failed to update upload record: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Transcript;
    use crate::config::AppConfig;
    use crate::playback::{ENDED_ACTION, PlaybackRuntime, PlaybackStatus};
    use crate::upload::{FileKind, UploadRecord};
    use std::path::PathBuf;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    struct FixedStage {
        fail: bool,
    }

    impl ProcessingStage for FixedStage {
        fn process(
            &self,
            upload: &AcceptedUpload,
            progress: &mut dyn FnMut(&ProcessingProgress),
            _cancel: &CancellationToken,
        ) -> Result<Book, ProcessingFailed> {
            progress(&ProcessingProgress {
                percent: 40,
                step_idx: 1,
                step_count: 4,
                step_title: "Summary generation".to_string(),
                estimated_minutes_remaining: 6,
            });
            if self.fail {
                return Err(ProcessingFailed::Cancelled { stage: "summary" });
            }
            Ok(Book {
                id: "fixed".to_string(),
                title: upload.title.clone(),
                author: "Someone".to_string(),
                duration_seconds: 90,
                transcript: Transcript::empty(),
            })
        }
    }

    fn unique_temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("bookvoice_test_{name}_{nanos}"))
    }

    fn upload() -> AcceptedUpload {
        AcceptedUpload {
            path: PathBuf::from("/tmp/Principles.pdf"),
            kind: FileKind::Pdf,
            file_name: "Principles.pdf".to_string(),
            title: "Principles".to_string(),
        }
    }

    fn slow_player() -> PlaybackHandle {
        let config = AppConfig {
            tick_interval_ms: 60_000,
            ..AppConfig::default()
        };
        PlaybackRuntime::spawn(&config).expect("spawn runtime")
    }

    #[test]
    fn remaining_minutes_estimate_never_drops_below_one() {
        assert_eq!(estimated_minutes_remaining(0), 10);
        assert_eq!(estimated_minutes_remaining(1), 10);
        assert_eq!(estimated_minutes_remaining(89), 2);
        assert_eq!(estimated_minutes_remaining(95), 1);
        assert_eq!(estimated_minutes_remaining(100), 1);
    }

    #[test]
    fn success_loads_book_and_completes_record() {
        let dir = unique_temp_dir("pipeline_ok");
        let store = UploadStore::new(&dir);
        let record = UploadRecord::new(&upload(), &AppConfig::default(), 11);
        store.append(record).expect("append record");
        let player = slow_player();
        let mut seen = Vec::new();

        let event = process_and_load(
            &FixedStage { fail: false },
            &upload(),
            Some((&store, 11)),
            &player,
            &mut |update| seen.push(update.percent),
            &CancellationToken::new(),
        )
        .expect("pipeline should succeed");

        assert_eq!(seen, vec![40]);
        assert_eq!(event.snapshot.status, PlaybackStatus::Playing);
        assert_eq!(
            event.snapshot.book.map(|book| book.title),
            Some("Principles".to_string())
        );
        assert_eq!(store.load()[0].status, RecordStatus::Completed);
        player.shutdown();
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn failure_leaves_player_untouched_and_marks_record() {
        let dir = unique_temp_dir("pipeline_fail");
        let store = UploadStore::new(&dir);
        store
            .append(UploadRecord::new(&upload(), &AppConfig::default(), 12))
            .expect("append record");
        let player = slow_player();

        let err = process_and_load(
            &FixedStage { fail: true },
            &upload(),
            Some((&store, 12)),
            &player,
            &mut |_| {},
            &CancellationToken::new(),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::Processing(_)));
        let snapshot = player.snapshot().expect("runtime alive");
        assert_eq!(snapshot.status, PlaybackStatus::Empty);
        let records = store.load();
        assert_eq!(records[0].status, RecordStatus::Failed);
        assert_eq!(records[0].progress, 40);
        player.shutdown();
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn subscriber_registered_before_processing_sees_load_through_end() {
        let config = AppConfig {
            tick_interval_ms: 5,
            ..AppConfig::default()
        };
        let player = PlaybackRuntime::spawn(&config).expect("spawn runtime");
        let events = player.subscribe().expect("runtime alive");

        process_and_load(
            &FixedStage { fail: false },
            &upload(),
            None,
            &player,
            &mut |_| {},
            &CancellationToken::new(),
        )
        .expect("pipeline should succeed");

        let first = events
            .recv_timeout(Duration::from_secs(5))
            .expect("load event");
        assert_eq!(first.action, "player_load_book");
        let deadline = Instant::now() + Duration::from_secs(5);
        let ended = loop {
            let event = events
                .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                .expect("playback should reach the end");
            if event.action == ENDED_ACTION {
                break event;
            }
        };
        assert_eq!(ended.snapshot.status, PlaybackStatus::Ended);
        player.shutdown();
    }
}
