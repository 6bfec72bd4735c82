use std::path::PathBuf;

use thiserror::Error;

/// Why an upload action was refused before any processing started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejected {
    #[error("no file was provided")]
    NoFile,

    #[error("only one file may be uploaded at a time (got {count})")]
    TooManyFiles { count: usize },

    #[error("unsupported file type `{extension}` for {}", path.display())]
    UnsupportedType { path: PathBuf, extension: String },

    #[error("`{extension}` files are not supported yet: {}", path.display())]
    NotYetSupported { path: PathBuf, extension: String },

    #[error("file not found: {}", .0.display())]
    Missing(PathBuf),
}

#[derive(Debug, Error)]
pub enum ProcessingFailed {
    #[error("processing cancelled at stage={stage}")]
    Cancelled { stage: &'static str },

    #[error("processing exceeded budget of {timeout_secs}s at stage={stage}")]
    TimedOut {
        stage: &'static str,
        timeout_secs: u64,
    },

    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackUnavailable {
    #[error("playback runtime has stopped")]
    RuntimeStopped,

    #[error("playback runtime did not answer `{action}`")]
    NoReply { action: &'static str },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidTranscript {
    #[error("segment {index} has an invalid start time {start_time}")]
    BadStartTime { index: usize, start_time: f64 },

    #[error("segment {index} starts at {start_time}, not after the previous start {previous}")]
    NotIncreasing {
        index: usize,
        start_time: f64,
        previous: f64,
    },
}

/// Failure of the upload-to-player flow after the upload was accepted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Processing(#[from] ProcessingFailed),

    #[error(transparent)]
    Playback(#[from] PlaybackUnavailable),
}
