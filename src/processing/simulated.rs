use crate::book::Book;
use crate::cancellation::CancellationToken;
use crate::config::AppConfig;
use crate::error::ProcessingFailed;
use crate::processing::{ProcessingProgress, ProcessingStage, estimated_minutes_remaining};
use crate::sample::{SAMPLE_DURATION_SECONDS, SAMPLE_TRANSCRIPT};
use crate::upload::{AcceptedUpload, content_digest};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const WAIT_SLICE: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStep {
    pub title: &'static str,
    pub description: &'static str,
}

pub const STEPS: [ProcessingStep; 4] = [
    ProcessingStep {
        title: "Document parsing",
        description: "Extracting text and recognizing document structure",
    },
    ProcessingStep {
        title: "Summary generation",
        description: "Analyzing the content and drafting the key points",
    },
    ProcessingStep {
        title: "Speech synthesis",
        description: "Turning the summary into natural speech",
    },
    ProcessingStep {
        title: "Transcript alignment",
        description: "Building the transcript timeline and finishing up",
    },
];

/// Step shown at `percent`; stays on the last step once the bar is full.
pub fn step_for_percent(percent: u8, step_count: usize) -> usize {
    let step = usize::from(percent) * step_count / 100;
    step.min(step_count.saturating_sub(1))
}

/// Timer-driven stand-in for the real parse/summarize/synthesize pipeline.
///
/// Progress climbs one percent per interval; the produced book always carries
/// the canned sample transcript.
#[derive(Debug, Clone)]
pub struct SimulatedProcessing {
    upload_delay: Duration,
    progress_interval: Duration,
    completion_delay: Duration,
    timeout: Option<Duration>,
    author: String,
}

impl SimulatedProcessing {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            upload_delay: Duration::from_millis(config.upload_delay_ms),
            progress_interval: Duration::from_millis(config.progress_interval_ms),
            completion_delay: Duration::from_millis(config.completion_delay_ms),
            timeout: (config.processing_timeout_secs > 0)
                .then(|| Duration::from_secs(config.processing_timeout_secs)),
            author: config.placeholder_author.clone(),
        }
    }

    fn wait(
        &self,
        duration: Duration,
        stage: &'static str,
        started: Instant,
        cancel: &CancellationToken,
    ) -> Result<(), ProcessingFailed> {
        let until = Instant::now() + duration;
        loop {
            cancel.check_cancelled(stage)?;
            if let Some(timeout) = self.timeout {
                if started.elapsed() > timeout {
                    return Err(ProcessingFailed::TimedOut {
                        stage,
                        timeout_secs: timeout.as_secs(),
                    });
                }
            }
            let now = Instant::now();
            if now >= until {
                return Ok(());
            }
            std::thread::sleep((until - now).min(WAIT_SLICE));
        }
    }
}

impl ProcessingStage for SimulatedProcessing {
    fn process(
        &self,
        upload: &AcceptedUpload,
        progress: &mut dyn FnMut(&ProcessingProgress),
        cancel: &CancellationToken,
    ) -> Result<Book, ProcessingFailed> {
        let started = Instant::now();
        self.wait(self.upload_delay, "upload", started, cancel)?;

        let digest =
            content_digest(&upload.path).map_err(|source| ProcessingFailed::Unreadable {
                path: upload.path.clone(),
                source,
            })?;

        let mut current_step = usize::MAX;
        for percent in 1..=100u8 {
            let step_idx = step_for_percent(percent, STEPS.len());
            let step = STEPS[step_idx];
            self.wait(self.progress_interval, step.title, started, cancel)?;
            if step_idx != current_step {
                current_step = step_idx;
                info!(step = step.title, detail = step.description, "Processing step started");
            }
            debug!(percent, step = step.title, "Processing progress");
            progress(&ProcessingProgress {
                percent,
                step_idx,
                step_count: STEPS.len(),
                step_title: step.title.to_string(),
                estimated_minutes_remaining: estimated_minutes_remaining(percent),
            });
        }

        self.wait(self.completion_delay, "finalize", started, cancel)?;

        Ok(Book {
            id: format!("book-{}", &digest[..16]),
            title: upload.title.clone(),
            author: self.author.clone(),
            duration_seconds: SAMPLE_DURATION_SECONDS,
            transcript: SAMPLE_TRANSCRIPT.clone(),
        })
    }
}
