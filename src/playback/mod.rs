//! Playback state machine and the thread that owns it.

pub mod controller;
pub mod runtime;
pub mod speed;

pub use controller::{
    ENDED_ACTION, PlaybackCommand, PlaybackController, PlaybackEvent, PlaybackSnapshot,
    PlaybackStatus, TickOutcome,
};
pub use runtime::{PlaybackHandle, PlaybackRuntime, SHUTDOWN_ACTION};
pub use speed::SpeedSelector;
