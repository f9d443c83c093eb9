//! Match countdown clock.
//!
//! The timer is advisory: it emits cues for the scorekeeper but never touches
//! match state. [`MatchTimer`] is the pure clock; [`Countdown`] drives one on a
//! tokio interval and streams [`TimerEvent`]s.

use crate::error::TournamentError;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default match length: 2 minutes.
pub const DEFAULT_DURATION_SECS: u32 = 120;

/// Remaining seconds at which a warning cue fires.
pub const WARNING_THRESHOLDS: [u32; 3] = [30, 10, 5];

/// Longest custom duration: 59:59.
const MAX_DURATION_SECS: u32 = 59 * 60 + 59;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TimerPreset {
    pub label: &'static str,
    pub seconds: u32,
}

pub const TIMER_PRESETS: [TimerPreset; 6] = [
    TimerPreset { label: "30 seconds", seconds: 30 },
    TimerPreset { label: "1 minute", seconds: 60 },
    TimerPreset { label: "2 minutes", seconds: 120 },
    TimerPreset { label: "3 minutes", seconds: 180 },
    TimerPreset { label: "5 minutes", seconds: 300 },
    TimerPreset { label: "10 minutes", seconds: 600 },
];

/// Advisory signal for the scorekeeper (a beep in the UI).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerCue {
    Start,
    /// Remaining seconds just reached one of [`WARNING_THRESHOLDS`].
    Warning(u32),
    TimeUp,
}

/// `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchTimer {
    selected: u32,
    remaining: u32,
    running: bool,
}

impl Default for MatchTimer {
    fn default() -> Self {
        Self {
            selected: DEFAULT_DURATION_SECS,
            remaining: DEFAULT_DURATION_SECS,
            running: false,
        }
    }
}

fn validate_duration(seconds: u32) -> Result<u32, TournamentError> {
    if seconds == 0 || seconds > MAX_DURATION_SECS {
        return Err(TournamentError::InvalidTimerDuration);
    }
    Ok(seconds)
}

impl MatchTimer {
    pub fn new(seconds: u32) -> Result<Self, TournamentError> {
        let seconds = validate_duration(seconds)?;
        Ok(Self {
            selected: seconds,
            remaining: seconds,
            running: false,
        })
    }

    pub fn selected(&self) -> u32 {
        self.selected
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Load a new duration; stops the clock.
    pub fn select_duration(&mut self, seconds: u32) -> Result<(), TournamentError> {
        let seconds = validate_duration(seconds)?;
        self.selected = seconds;
        self.remaining = seconds;
        self.running = false;
        Ok(())
    }

    /// Custom time from minutes and seconds (each 0..=59).
    pub fn set_custom(&mut self, minutes: u32, seconds: u32) -> Result<(), TournamentError> {
        if minutes > 59 || seconds > 59 {
            return Err(TournamentError::InvalidTimerDuration);
        }
        self.select_duration(minutes * 60 + seconds)
    }

    /// Start or resume. Nothing happens once time is up.
    pub fn start(&mut self) -> Option<TimerCue> {
        if self.running || self.remaining == 0 {
            return None;
        }
        self.running = true;
        Some(TimerCue::Start)
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stop and rewind to the selected duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining = self.selected;
    }

    /// One second elapsed. Returns `None` while stopped.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let cue = if self.remaining == 0 {
            self.running = false;
            Some(TimerCue::TimeUp)
        } else if WARNING_THRESHOLDS.contains(&self.remaining) {
            Some(TimerCue::Warning(self.remaining))
        } else {
            None
        };
        Some(TimerEvent {
            remaining: self.remaining,
            cue,
        })
    }

    fn apply(&mut self, command: TimerCommand) -> Option<TimerEvent> {
        let cue = match command {
            TimerCommand::Start => self.start(),
            TimerCommand::Pause => {
                self.pause();
                None
            }
            TimerCommand::Reset => {
                self.reset();
                None
            }
            TimerCommand::Select(seconds) => {
                if let Err(e) = self.select_duration(seconds) {
                    log::warn!("Ignoring timer selection of {}s: {}", seconds, e);
                }
                None
            }
        };
        Some(TimerEvent {
            remaining: self.remaining,
            cue,
        })
    }
}

/// State change of a running [`Countdown`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TimerEvent {
    pub remaining: u32,
    pub cue: Option<TimerCue>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerCommand {
    Start,
    Pause,
    Reset,
    Select(u32),
}

/// A [`MatchTimer`] ticking on its own task.
pub struct Countdown {
    commands: mpsc::UnboundedSender<TimerCommand>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    task: JoinHandle<MatchTimer>,
}

impl Countdown {
    /// Spawn the clock; `period` is how long one timer second lasts.
    pub fn spawn(timer: MatchTimer, period: Duration) -> Self {
        let (commands, mut command_rx) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut timer = timer;
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let event = tokio::select! {
                    command = command_rx.recv() => match command {
                        Some(command) => timer.apply(command),
                        None => break,
                    },
                    _ = ticker.tick() => timer.tick(),
                };
                if let Some(event) = event {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
            timer
        });

        Self {
            commands,
            events,
            task,
        }
    }

    /// Returns false once the clock task has stopped.
    pub fn send(&self, command: TimerCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub async fn next_event(&mut self) -> Option<TimerEvent> {
        self.events.recv().await
    }

    /// Stop the clock task and hand back the final timer state.
    pub async fn stop(self) -> Option<MatchTimer> {
        let Countdown { commands, task, .. } = self;
        drop(commands);
        task.await.ok()
    }
}
