//! Event dispatch and the expiry tick
//!
//! Shells feed player input through [`Session::handle`] and poll [`tick`] at
//! 1 Hz or faster while a sprint is running.

use super::state::{Session, SessionStatus, TapOutcome};
use super::timer;
use crate::consts::GAME_SECONDS;

/// Input events coming from a UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Start,
    Tap(usize),
    Reset,
    /// Nothing but the clock moved
    Tick,
}

/// What an event did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Started,
    Tapped(TapOutcome),
    Reset,
    /// The sprint ran out of time while handling this event
    Expired,
    /// Invalid in the current state; nothing changed
    Ignored,
}

/// Expire the sprint once its duration has elapsed.
///
/// Returns true only on the Running -> Ended transition; Ended is terminal
/// under repeated ticks.
pub fn tick(session: &mut Session, now: f64) -> bool {
    if session.status != SessionStatus::Running {
        return false;
    }
    if timer::is_expired(session.start_instant, GAME_SECONDS, now) {
        session.status = SessionStatus::Ended;
        log::info!(
            "Sprint over: {} hits in {} rounds",
            session.score,
            session.round_count
        );
        return true;
    }
    false
}

impl Session {
    /// Advance the clock
    pub fn tick(&mut self, now: f64) -> bool {
        tick(self, now)
    }

    /// Apply one event at `now`.
    ///
    /// The clock is ticked first so a tap that arrives after expiry is
    /// rejected instead of scored.
    pub fn handle(&mut self, event: GameEvent, now: f64) -> EventOutcome {
        let expired = self.tick(now);

        match event {
            GameEvent::Start => {
                if self.start(now) {
                    EventOutcome::Started
                } else {
                    EventOutcome::Ignored
                }
            }
            GameEvent::Tap(cell) => match self.tap(cell, now) {
                TapOutcome::Rejected if expired => EventOutcome::Expired,
                TapOutcome::Rejected => EventOutcome::Ignored,
                outcome => EventOutcome::Tapped(outcome),
            },
            GameEvent::Reset => {
                self.reset();
                EventOutcome::Reset
            }
            GameEvent::Tick if expired => EventOutcome::Expired,
            GameEvent::Tick => EventOutcome::Ignored,
        }
    }
}
