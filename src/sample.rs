//! Canned summary used by the simulated pipeline.

use crate::book::{Transcript, TranscriptSegment};
use once_cell::sync::Lazy;

/// Forty minutes, the length every simulated summary reports.
pub const SAMPLE_DURATION_SECONDS: u32 = 2400;

pub static SAMPLE_TRANSCRIPT: Lazy<Transcript> = Lazy::new(|| {
    Transcript::new(vec![
        TranscriptSegment::new(
            0.0,
            "Welcome to the audio summary of Principles by Ray Dalio, a classic on the rules he lives and works by.",
        ),
        TranscriptSegment::new(
            15.0,
            "Dalio shares the principles that helped him build one of the largest hedge funds in the world.",
        ),
        TranscriptSegment::new(
            30.0,
            "Part one covers life principles: embracing reality and dealing with it is the key to success.",
        ),
        TranscriptSegment::new(
            45.0,
            "He stresses radical truth and radical transparency as the basis for meaningful relationships.",
        ),
        TranscriptSegment::new(
            60.0,
            "Part two covers work principles: build an idea meritocracy where the best ideas win.",
        ),
    ])
    .expect("sample transcript start times are increasing")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_transcript_fits_inside_duration() {
        let last = SAMPLE_TRANSCRIPT
            .segments()
            .last()
            .expect("sample transcript is not empty");
        assert!(last.start_time < f64::from(SAMPLE_DURATION_SECONDS));
        assert_eq!(SAMPLE_TRANSCRIPT.active_index(29.0), Some(1));
    }
}
