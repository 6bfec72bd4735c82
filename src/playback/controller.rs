use crate::book::{Book, BookSummary};
use crate::config::{AppConfig, MAX_VOLUME, SpeedProfile};
use crate::playback::speed::SpeedSelector;
use crate::text_utils::format_time;
use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PlaybackStatus {
    #[default]
    Empty,
    Playing,
    Paused,
    /// Paused at zero after the clock ran into the end of the book.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Advanced,
    Ended,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub book: Option<BookSummary>,
    pub is_playing: bool,
    pub current_time_seconds: f64,
    pub duration_seconds: u32,
    pub playback_speed: f32,
    pub volume: u8,
    pub active_segment_idx: Option<usize>,
    pub active_segment_text: Option<String>,
    pub segment_count: usize,
    pub progress_pct: f64,
    pub current_time_label: String,
    pub duration_label: String,
}

#[derive(Debug, Clone)]
pub enum PlaybackCommand {
    GetSnapshot,
    LoadBook { book: Book },
    TogglePlayPause,
    Seek { time_seconds: f64 },
    Skip { delta_seconds: f64 },
    SeekToSegment { segment_idx: usize },
    CyclePlaybackSpeed,
    SetPlaybackSpeed { speed: f32 },
    SetVolume { volume: i32 },
    EndSession,
    Tick,
}

impl PlaybackCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "player_get_snapshot",
            Self::LoadBook { .. } => "player_load_book",
            Self::TogglePlayPause => "player_toggle_play_pause",
            Self::Seek { .. } => "player_seek",
            Self::Skip { .. } => "player_skip",
            Self::SeekToSegment { .. } => "player_seek_to_segment",
            Self::CyclePlaybackSpeed => "player_cycle_speed",
            Self::SetPlaybackSpeed { .. } => "player_set_speed",
            Self::SetVolume { .. } => "player_set_volume",
            Self::EndSession => "player_end_session",
            Self::Tick => "player_tick",
        }
    }
}

pub const ENDED_ACTION: &str = "player_ended";

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PlaybackEvent {
    #[ts(type = "string")]
    pub action: &'static str,
    pub snapshot: PlaybackSnapshot,
}

/// Sole owner of the session's playback state.
///
/// Every mutation goes through a command method; the active transcript
/// segment is always derived from the current time and never stored.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    book: Option<Book>,
    is_playing: bool,
    current_time: f64,
    ended: bool,
    speed: SpeedSelector,
    volume: u8,
    default_volume: u8,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(SpeedProfile::default(), AppConfig::default().default_volume)
    }
}

impl PlaybackController {
    pub fn new(speed_profile: SpeedProfile, default_volume: u8) -> Self {
        let default_volume = default_volume.min(MAX_VOLUME);
        Self {
            book: None,
            is_playing: false,
            current_time: 0.0,
            ended: false,
            speed: SpeedSelector::new(speed_profile),
            volume: default_volume,
            default_volume,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.speed_profile, config.default_volume)
    }

    pub fn current_book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.book.as_ref().map(Book::duration).unwrap_or(0.0)
    }

    pub fn playback_speed(&self) -> f32 {
        self.speed.current()
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.book.is_none() {
            PlaybackStatus::Empty
        } else if self.is_playing {
            PlaybackStatus::Playing
        } else if self.ended {
            PlaybackStatus::Ended
        } else {
            PlaybackStatus::Paused
        }
    }

    pub fn load_book(&mut self, book: Book) {
        info!(
            book_id = %book.id,
            title = %book.title,
            duration_secs = book.duration_seconds,
            segments = book.transcript.len(),
            "Loading book into player"
        );
        self.book = Some(book);
        self.current_time = 0.0;
        self.is_playing = true;
        self.ended = false;
    }

    pub fn toggle_play_pause(&mut self) {
        if self.book.is_none() {
            return;
        }
        self.is_playing = !self.is_playing;
        self.ended = false;
        debug!(playing = self.is_playing, "Toggled play/pause");
    }

    /// Move to `time_seconds`, clamped into `[0, duration]`. NaN maps to zero.
    pub fn seek(&mut self, time_seconds: f64) {
        let clamped = if time_seconds.is_nan() {
            0.0
        } else {
            time_seconds.clamp(0.0, self.duration())
        };
        self.current_time = clamped;
        if self.book.is_some() {
            self.ended = false;
        }
    }

    pub fn skip(&mut self, delta_seconds: f64) {
        self.seek(self.current_time + delta_seconds);
    }

    pub fn seek_to_segment(&mut self, segment_idx: usize) {
        let Some(start_time) = self
            .book
            .as_ref()
            .and_then(|book| book.transcript.get(segment_idx))
            .map(|segment| segment.start_time)
        else {
            return;
        };
        self.seek(start_time);
    }

    pub fn cycle_playback_speed(&mut self) -> f32 {
        self.speed.cycle()
    }

    pub fn set_playback_speed(&mut self, speed: f32) -> bool {
        self.speed.select(speed)
    }

    pub fn set_volume(&mut self, volume: i32) {
        self.volume = volume.clamp(0, i32::from(MAX_VOLUME)) as u8;
    }

    pub fn active_segment_index(&self) -> Option<usize> {
        self.book
            .as_ref()
            .and_then(|book| book.transcript.active_index(self.current_time))
    }

    /// Advance the clock by one second if playing.
    ///
    /// Reaching the duration stops playback and rewinds to zero instead of
    /// parking at the end.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_playing {
            return TickOutcome::Idle;
        }
        let Some(book) = self.book.as_ref() else {
            self.is_playing = false;
            return TickOutcome::Idle;
        };
        let next = self.current_time + 1.0;
        if next >= book.duration() {
            info!(book_id = %book.id, "Reached end of book");
            self.is_playing = false;
            self.current_time = 0.0;
            self.ended = true;
            return TickOutcome::Ended;
        }
        self.current_time = next;
        TickOutcome::Advanced
    }

    pub fn end_session(&mut self) {
        self.book = None;
        self.is_playing = false;
        self.current_time = 0.0;
        self.ended = false;
        self.speed.reset();
        self.volume = self.default_volume;
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let duration_seconds = self
            .book
            .as_ref()
            .map(|book| book.duration_seconds)
            .unwrap_or(0);
        let progress_pct = if duration_seconds > 0 {
            (self.current_time / f64::from(duration_seconds) * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let active_segment_idx = self.active_segment_index();
        let active_segment_text = self.book.as_ref().and_then(|book| {
            active_segment_idx
                .and_then(|idx| book.transcript.get(idx))
                .map(|segment| segment.text.clone())
        });
        PlaybackSnapshot {
            status: self.status(),
            book: self.book.as_ref().map(Book::summary),
            is_playing: self.is_playing,
            current_time_seconds: self.current_time,
            duration_seconds,
            playback_speed: self.speed.current(),
            volume: self.volume,
            active_segment_idx,
            active_segment_text,
            segment_count: self
                .book
                .as_ref()
                .map(|book| book.transcript.len())
                .unwrap_or(0),
            progress_pct,
            current_time_label: format_time(self.current_time),
            duration_label: format_time(f64::from(duration_seconds)),
        }
    }

    pub fn apply_command(&mut self, command: PlaybackCommand) -> PlaybackEvent {
        let mut action = command.action();
        match command {
            PlaybackCommand::GetSnapshot => {}
            PlaybackCommand::LoadBook { book } => self.load_book(book),
            PlaybackCommand::TogglePlayPause => self.toggle_play_pause(),
            PlaybackCommand::Seek { time_seconds } => self.seek(time_seconds),
            PlaybackCommand::Skip { delta_seconds } => self.skip(delta_seconds),
            PlaybackCommand::SeekToSegment { segment_idx } => self.seek_to_segment(segment_idx),
            PlaybackCommand::CyclePlaybackSpeed => {
                self.cycle_playback_speed();
            }
            PlaybackCommand::SetPlaybackSpeed { speed } => {
                self.set_playback_speed(speed);
            }
            PlaybackCommand::SetVolume { volume } => self.set_volume(volume),
            PlaybackCommand::EndSession => self.end_session(),
            PlaybackCommand::Tick => {
                if self.tick() == TickOutcome::Ended {
                    action = ENDED_ACTION;
                }
            }
        }
        PlaybackEvent {
            action,
            snapshot: self.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{Transcript, TranscriptSegment};

    fn book(id: &str, duration_seconds: u32) -> Book {
        Book {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: "Author".to_string(),
            duration_seconds,
            transcript: Transcript::new(vec![
                TranscriptSegment::new(0.0, "a"),
                TranscriptSegment::new(15.0, "b"),
                TranscriptSegment::new(30.0, "c"),
            ])
            .expect("valid transcript"),
        }
    }

    fn loaded(duration_seconds: u32) -> PlaybackController {
        let mut player = PlaybackController::default();
        player.load_book(book("b1", duration_seconds));
        player
    }

    #[test]
    fn starts_empty() {
        let player = PlaybackController::default();
        let snapshot = player.snapshot();
        assert_eq!(snapshot.status, PlaybackStatus::Empty);
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.current_time_seconds, 0.0);
        assert_eq!(snapshot.playback_speed, 1.0);
        assert_eq!(snapshot.volume, 70);
        assert_eq!(snapshot.active_segment_idx, None);
        assert!(snapshot.book.is_none());
    }

    #[test]
    fn seek_within_range_is_exact() {
        let mut player = loaded(120);
        for t in [0.0, 0.5, 1.0, 59.25, 119.0, 120.0] {
            player.seek(t);
            assert_eq!(player.current_time(), t);
        }
    }

    #[test]
    fn seek_outside_range_clamps_to_nearest_boundary() {
        let mut player = loaded(120);
        player.seek(-5.0);
        assert_eq!(player.current_time(), 0.0);
        player.seek(500.0);
        assert_eq!(player.current_time(), 120.0);
        player.seek(f64::INFINITY);
        assert_eq!(player.current_time(), 120.0);
        player.seek(f64::NEG_INFINITY);
        assert_eq!(player.current_time(), 0.0);
        player.seek(f64::NAN);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn skip_matches_seek_from_current_time() {
        for (start, delta) in [(10.0, 5.0), (10.0, -25.0), (100.0, 50.0), (0.0, -1.0)] {
            let mut skipped = loaded(120);
            skipped.seek(start);
            skipped.skip(delta);

            let mut sought = loaded(120);
            sought.seek(start);
            sought.seek(start + delta);

            assert_eq!(skipped.current_time(), sought.current_time());
        }
    }

    #[test]
    fn toggle_alternates_and_is_noop_without_book() {
        let mut empty = PlaybackController::default();
        empty.toggle_play_pause();
        assert!(!empty.is_playing());
        assert_eq!(empty.status(), PlaybackStatus::Empty);

        let mut player = loaded(60);
        assert!(player.is_playing());
        player.toggle_play_pause();
        assert_eq!(player.status(), PlaybackStatus::Paused);
        player.toggle_play_pause();
        assert_eq!(player.status(), PlaybackStatus::Playing);
        player.toggle_play_pause();
        assert!(!player.is_playing());
    }

    #[test]
    fn active_segment_tracks_time() {
        let mut player = loaded(60);
        player.seek(29.0);
        assert_eq!(player.active_segment_index(), Some(1));
        player.seek(30.0);
        assert_eq!(player.active_segment_index(), Some(2));
        assert_eq!(player.snapshot().active_segment_text.as_deref(), Some("c"));
    }

    #[test]
    fn active_segment_is_none_without_segments() {
        let mut player = PlaybackController::default();
        assert_eq!(player.active_segment_index(), None);
        player.load_book(Book {
            transcript: Transcript::empty(),
            ..book("bare", 30)
        });
        assert_eq!(player.active_segment_index(), None);
    }

    #[test]
    fn tick_at_last_second_rewinds_and_stops() {
        let mut player = loaded(60);
        player.seek(59.0);
        assert!(player.is_playing());

        assert_eq!(player.tick(), TickOutcome::Ended);

        assert!(!player.is_playing());
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.status(), PlaybackStatus::Ended);
    }

    #[test]
    fn tick_advances_one_second_only_while_playing() {
        let mut player = loaded(60);
        assert_eq!(player.tick(), TickOutcome::Advanced);
        assert_eq!(player.current_time(), 1.0);

        player.toggle_play_pause();
        assert_eq!(player.tick(), TickOutcome::Idle);
        assert_eq!(player.current_time(), 1.0);

        let mut empty = PlaybackController::default();
        assert_eq!(empty.tick(), TickOutcome::Idle);
    }

    #[test]
    fn zero_length_book_ends_on_first_tick() {
        let mut player = loaded(0);
        assert!(player.is_playing());
        assert_eq!(player.tick(), TickOutcome::Ended);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn load_book_resets_even_mid_playback() {
        let mut player = loaded(60);
        player.seek(42.0);
        player.toggle_play_pause();

        player.load_book(book("b2", 90));

        assert_eq!(player.current_time(), 0.0);
        assert!(player.is_playing());
        assert_eq!(player.current_book().map(|b| b.id.as_str()), Some("b2"));
    }

    #[test]
    fn ended_state_resumes_on_toggle_and_pauses_on_seek() {
        let mut player = loaded(2);
        player.tick();
        assert_eq!(player.tick(), TickOutcome::Ended);

        player.toggle_play_pause();
        assert_eq!(player.status(), PlaybackStatus::Playing);

        player.seek(1.0);
        assert_eq!(player.tick(), TickOutcome::Ended);
        player.seek(1.0);
        assert_eq!(player.status(), PlaybackStatus::Paused);
        assert_eq!(player.current_time(), 1.0);
    }

    #[test]
    fn seek_to_segment_jumps_to_segment_start() {
        let mut player = loaded(60);
        player.seek_to_segment(2);
        assert_eq!(player.current_time(), 30.0);
        player.seek_to_segment(9);
        assert_eq!(player.current_time(), 30.0);
    }

    #[test]
    fn volume_is_clamped() {
        let mut player = loaded(60);
        player.set_volume(140);
        assert_eq!(player.volume(), 100);
        player.set_volume(-3);
        assert_eq!(player.volume(), 0);
    }

    #[test]
    fn end_session_returns_to_empty() {
        let mut player = loaded(60);
        player.seek(10.0);
        player.cycle_playback_speed();
        player.set_volume(10);

        player.end_session();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.status, PlaybackStatus::Empty);
        assert_eq!(snapshot.current_time_seconds, 0.0);
        assert_eq!(snapshot.playback_speed, 1.0);
        assert_eq!(snapshot.volume, 70);
    }

    #[test]
    fn command_dispatch_emits_action_and_snapshot() {
        let mut player = PlaybackController::default();
        let event = player.apply_command(PlaybackCommand::LoadBook {
            book: book("b1", 2400),
        });
        assert_eq!(event.action, "player_load_book");
        assert_eq!(event.snapshot.status, PlaybackStatus::Playing);
        assert_eq!(event.snapshot.duration_label, "40:00");
        assert_eq!(event.snapshot.segment_count, 3);

        let event = player.apply_command(PlaybackCommand::Seek { time_seconds: 600.0 });
        assert_eq!(event.snapshot.current_time_label, "10:00");
        assert!((event.snapshot.progress_pct - 25.0).abs() < f64::EPSILON);

        let event = player.apply_command(PlaybackCommand::CyclePlaybackSpeed);
        assert_eq!(event.action, "player_cycle_speed");
        assert_eq!(event.snapshot.playback_speed, 1.25);
    }

    #[test]
    fn tick_command_reports_end_of_book() {
        let mut player = loaded(60);
        player.seek(59.0);
        let event = player.apply_command(PlaybackCommand::Tick);
        assert_eq!(event.action, ENDED_ACTION);
        assert_eq!(event.snapshot.status, PlaybackStatus::Ended);
    }

    #[test]
    fn events_serialize_with_action_and_snapshot() {
        let mut player = PlaybackController::default();
        let event = player.apply_command(PlaybackCommand::LoadBook { book: book("b9", 60) });

        let json = serde_json::to_value(&event).expect("event serializes");

        assert_eq!(json["action"], "player_load_book");
        assert_eq!(json["snapshot"]["status"], "playing");
        assert_eq!(json["snapshot"]["book"]["id"], "b9");
    }
}
