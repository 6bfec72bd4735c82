//! Books and their timestamped transcripts.
//!
//! A [`Transcript`] can only be built from segments whose start times are
//! finite, non-negative and strictly increasing, so lookups by time can rely on
//! the ordering.

use crate::error::InvalidTranscript;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TranscriptSegment {
    pub start_time: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<TranscriptSegment>", into = "Vec<TranscriptSegment>")]
pub struct Transcript {
    segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>) -> Result<Self, InvalidTranscript> {
        let mut previous: Option<f64> = None;
        for (index, segment) in segments.iter().enumerate() {
            let start_time = segment.start_time;
            if !start_time.is_finite() || start_time < 0.0 {
                return Err(InvalidTranscript::BadStartTime { index, start_time });
            }
            if let Some(previous) = previous {
                if start_time <= previous {
                    return Err(InvalidTranscript::NotIncreasing {
                        index,
                        start_time,
                        previous,
                    });
                }
            }
            previous = Some(start_time);
        }
        Ok(Self { segments })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&TranscriptSegment> {
        self.segments.get(idx)
    }

    /// Index of the segment being spoken at `time_seconds`.
    ///
    /// Segment `i` covers `[start_i, start_{i+1})`; the last one is open-ended.
    /// Returns `None` for an empty transcript or a time before the first start.
    pub fn active_index(&self, time_seconds: f64) -> Option<usize> {
        let after = self
            .segments
            .partition_point(|segment| segment.start_time <= time_seconds);
        after.checked_sub(1)
    }
}

impl TryFrom<Vec<TranscriptSegment>> for Transcript {
    type Error = InvalidTranscript;

    fn try_from(segments: Vec<TranscriptSegment>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<Transcript> for Vec<TranscriptSegment> {
    fn from(transcript: Transcript) -> Self {
        transcript.segments
    }
}

/// A unit of playable content. Immutable once handed to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration_seconds: u32,
    #[serde(default)]
    pub transcript: Transcript,
}

impl Book {
    pub fn duration(&self) -> f64 {
        f64::from(self.duration_seconds)
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            duration_seconds: self.duration_seconds,
        }
    }
}

/// Display-only view of a [`Book`] without its transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub duration_seconds: u32,
}
