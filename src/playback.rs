use std::time::{Duration, Instant};

use crate::config::ReviewConfig;
use crate::review::ReviewState;

// ---------------------------------------------------------------------------
// Playback controller
// ---------------------------------------------------------------------------

/// What a tick did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No tick was due or none is scheduled.
    Idle,
    /// The cursor advanced; redraw.
    Advanced,
    /// Playback ended (stopped or past the end): cursor reset, final redraw.
    Halted,
}

/// Timer chain that scrolls the playback cursor through a row.
///
/// While a chain is scheduled every tick either advances
/// `current_time` by one interval or, once playback was stopped or the
/// cursor passed the row duration, resets it and ends the chain. Ticks are
/// fed either from the wall clock through [`poll`](Self::poll) or directly
/// through [`tick`](Self::tick).
#[derive(Debug, Clone)]
pub struct PlaybackController {
    interval: Duration,
    duration_secs: f64,
    scheduled: bool,
    next_due: Option<Instant>,
}

impl PlaybackController {
    pub fn new(interval: Duration, duration_secs: f64) -> Self {
        Self {
            interval,
            duration_secs,
            scheduled: false,
            next_due: None,
        }
    }

    pub fn from_config(config: &ReviewConfig) -> Self {
        Self::new(config.tick_interval(), config.duration_secs)
    }

    /// Whether a tick is still pending (possibly only to halt the chain).
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Begin playback of the current row. The caller redraws immediately.
    /// A chain that is still winding down is reused, not doubled.
    pub fn start(&mut self, state: &mut ReviewState) {
        state.playing = true;
        if !self.scheduled {
            self.scheduled = true;
            self.next_due = None;
        }
        log::debug!("Playback started at {:.1}s", state.current_time);
    }

    /// Request a stop. The pending tick observes it and halts the chain;
    /// `current_time` is untouched until then.
    pub fn stop(&mut self, state: &mut ReviewState) {
        state.playing = false;
        log::debug!("Playback stop requested at {:.1}s", state.current_time);
    }

    /// Play/Pause. Returns whether playback is now running.
    pub fn toggle(&mut self, state: &mut ReviewState) -> bool {
        if state.playing {
            self.stop(state);
        } else {
            self.start(state);
        }
        state.playing
    }

    /// Run one scheduled tick.
    pub fn tick(&mut self, state: &mut ReviewState) -> TickOutcome {
        if !self.scheduled {
            return TickOutcome::Idle;
        }
        if state.playing && state.current_time <= self.duration_secs {
            state.current_time += self.interval.as_secs_f64();
            TickOutcome::Advanced
        } else {
            state.current_time = 0.0;
            state.playing = false;
            self.scheduled = false;
            self.next_due = None;
            log::debug!("Playback halted");
            TickOutcome::Halted
        }
    }

    /// Run the tick if it is due at `now`. The next tick is scheduled one
    /// interval after this one ran.
    pub fn poll(&mut self, state: &mut ReviewState, now: Instant) -> TickOutcome {
        if !self.scheduled {
            return TickOutcome::Idle;
        }
        match self.next_due {
            None => {
                self.next_due = Some(now + self.interval);
                TickOutcome::Idle
            }
            Some(due) if now >= due => {
                let outcome = self.tick(state);
                if self.scheduled {
                    self.next_due = Some(now + self.interval);
                }
                outcome
            }
            Some(_) => TickOutcome::Idle,
        }
    }

    /// Time left until the pending tick, for scheduling a repaint.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        if !self.is_scheduled() {
            return None;
        }
        Some(
            self.next_due
                .map_or(Duration::ZERO, |due| due.saturating_duration_since(now)),
        )
    }
}
