//! Owning thread for the playback controller.
//!
//! The controller lives on exactly one thread. UI code talks to it through a
//! cloneable [`PlaybackHandle`]; commands and clock ticks are serialized by a
//! single channel loop, so the last write always wins and readers only ever
//! see cloned snapshots.

use crate::book::Book;
use crate::config::AppConfig;
use crate::error::PlaybackUnavailable;
use crate::playback::controller::{
    PlaybackCommand, PlaybackController, PlaybackEvent, PlaybackSnapshot,
};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const SHUTDOWN_ACTION: &str = "player_shutdown";

/// Events buffered per subscriber before new ones are dropped.
pub const SUBSCRIBER_CAPACITY: usize = 64;

enum RuntimeMessage {
    Command {
        command: PlaybackCommand,
        reply: SyncSender<PlaybackEvent>,
    },
    Subscribe {
        sender: SyncSender<PlaybackEvent>,
    },
    Shutdown,
}

#[derive(Clone)]
pub struct PlaybackHandle {
    sender: Sender<RuntimeMessage>,
    skip_seconds: f64,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

pub struct PlaybackRuntime;

impl PlaybackRuntime {
    /// Start the owning thread with an empty controller.
    pub fn spawn(config: &AppConfig) -> std::io::Result<PlaybackHandle> {
        let controller = PlaybackController::from_config(config);
        let tick_interval = Duration::from_millis(config.tick_interval_ms.max(1));
        let (sender, receiver) = mpsc::channel();
        let worker = std::thread::Builder::new()
            .name("playback-runtime".to_string())
            .spawn(move || run_loop(controller, tick_interval, receiver))?;
        info!(
            tick_interval_ms = tick_interval.as_millis() as u64,
            speed_profile = %config.speed_profile,
            "Playback runtime started"
        );
        Ok(PlaybackHandle {
            sender,
            skip_seconds: f64::from(config.skip_seconds),
            worker: Arc::new(Mutex::new(Some(worker))),
        })
    }
}

impl PlaybackHandle {
    pub fn apply(&self, command: PlaybackCommand) -> Result<PlaybackEvent, PlaybackUnavailable> {
        let action = command.action();
        let (reply, response) = mpsc::sync_channel(1);
        self.sender
            .send(RuntimeMessage::Command { command, reply })
            .map_err(|_| PlaybackUnavailable::RuntimeStopped)?;
        response
            .recv()
            .map_err(|_| PlaybackUnavailable::NoReply { action })
    }

    pub fn snapshot(&self) -> Result<PlaybackSnapshot, PlaybackUnavailable> {
        self.apply(PlaybackCommand::GetSnapshot)
            .map(|event| event.snapshot)
    }

    pub fn load_book(&self, book: Book) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::LoadBook { book })
    }

    pub fn toggle_play_pause(&self) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::TogglePlayPause)
    }

    pub fn seek(&self, time_seconds: f64) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::Seek { time_seconds })
    }

    pub fn skip(&self, delta_seconds: f64) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::Skip { delta_seconds })
    }

    pub fn skip_forward(&self) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.skip(self.skip_seconds)
    }

    pub fn skip_back(&self) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.skip(-self.skip_seconds)
    }

    pub fn seek_to_segment(&self, segment_idx: usize) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::SeekToSegment { segment_idx })
    }

    pub fn cycle_playback_speed(&self) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::CyclePlaybackSpeed)
    }

    pub fn set_playback_speed(&self, speed: f32) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::SetPlaybackSpeed { speed })
    }

    pub fn set_volume(&self, volume: i32) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::SetVolume { volume })
    }

    pub fn end_session(&self) -> Result<PlaybackEvent, PlaybackUnavailable> {
        self.apply(PlaybackCommand::EndSession)
    }

    /// Receive every event the runtime publishes from now on, ticks included.
    ///
    /// The queue holds [`SUBSCRIBER_CAPACITY`] events; a receiver that stops
    /// draining misses events until it catches up.
    pub fn subscribe(&self) -> Result<Receiver<PlaybackEvent>, PlaybackUnavailable> {
        let (sender, receiver) = mpsc::sync_channel(SUBSCRIBER_CAPACITY);
        self.sender
            .send(RuntimeMessage::Subscribe { sender })
            .map_err(|_| PlaybackUnavailable::RuntimeStopped)?;
        Ok(receiver)
    }

    /// End the session and wait for the owning thread to exit.
    pub fn shutdown(&self) {
        let _ = self.sender.send(RuntimeMessage::Shutdown);
        let worker = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => return,
        };
        if let Some(worker) = worker {
            if worker.join().is_err() {
                warn!("Playback runtime thread panicked");
            }
        }
    }
}

fn run_loop(
    mut controller: PlaybackController,
    tick_interval: Duration,
    receiver: Receiver<RuntimeMessage>,
) {
    let mut subscribers: Vec<SyncSender<PlaybackEvent>> = Vec::new();
    let mut next_tick: Option<Instant> = None;

    loop {
        let message = match next_tick {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match receiver.recv_timeout(wait) {
                    Ok(message) => Some(message),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match receiver.recv() {
                Ok(message) => Some(message),
                Err(_) => break,
            },
        };

        match message {
            None => {
                let event = controller.apply_command(PlaybackCommand::Tick);
                // Re-arm from now: a late tick is not caught up.
                next_tick = controller
                    .is_playing()
                    .then(|| Instant::now() + tick_interval);
                publish(&mut subscribers, &event);
            }
            Some(RuntimeMessage::Command { command, reply }) => {
                let was_playing = controller.is_playing();
                let rearm = matches!(command, PlaybackCommand::LoadBook { .. });
                let publishes = !matches!(command, PlaybackCommand::GetSnapshot);
                debug!(action = command.action(), "Applying playback command");
                let event = controller.apply_command(command);
                if !controller.is_playing() {
                    next_tick = None;
                } else if rearm || !was_playing || next_tick.is_none() {
                    next_tick = Some(Instant::now() + tick_interval);
                }
                if publishes {
                    publish(&mut subscribers, &event);
                }
                let _ = reply.send(event);
            }
            Some(RuntimeMessage::Subscribe { sender }) => subscribers.push(sender),
            Some(RuntimeMessage::Shutdown) => {
                controller.end_session();
                publish(
                    &mut subscribers,
                    &PlaybackEvent {
                        action: SHUTDOWN_ACTION,
                        snapshot: controller.snapshot(),
                    },
                );
                break;
            }
        }
    }
    info!("Playback runtime stopped");
}

fn publish(subscribers: &mut Vec<SyncSender<PlaybackEvent>>, event: &PlaybackEvent) {
    subscribers.retain(|subscriber| match subscriber.try_send(event.clone()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            if event.action != PlaybackCommand::Tick.action() {
                warn!(action = event.action, "Subscriber queue full; event dropped");
            }
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    });
}
