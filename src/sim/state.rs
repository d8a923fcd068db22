//! Session state and player-driven transitions
//!
//! Everything a single sprint needs lives in [`Session`]; there is no global
//! state. The autonomous expiry transition lives in `tick.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{GridCell, generate, pick_target_index};
use super::timer;
use crate::consts::*;
use crate::truncate_name;

/// Lifecycle of a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Waiting for Start; grid is inert
    #[default]
    Idle,
    /// Timer running, taps are scored
    Running,
    /// Time is up, score is frozen
    Ended,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Ended => "ended",
        }
    }
}

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Hit,
    Miss,
    /// Not running, or the index is off the grid. Nothing changed.
    Rejected,
}

/// Owned (name, score) snapshot handed to the card composer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRequest {
    pub name: String,
    pub score: u32,
}

impl CardRequest {
    pub fn new(name: &str, score: u32) -> Self {
        Self {
            name: truncate_name(name),
            score,
        }
    }
}

/// Complete session state (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub status: SessionStatus,
    /// Wall-clock seconds when Start was pressed
    pub start_instant: Option<f64>,
    /// Target hits, always <= round_count
    pub score: u32,
    /// Accepted taps, hit or miss
    pub round_count: u32,
    /// Cell currently holding the target
    pub target_index: usize,
    /// Row-major grid, GRID_SIZE² cells
    pub grid: Vec<GridCell>,
    /// Nickname for the share card (<= MAX_NAME_CHARS)
    pub player_name: String,
    /// When the last accepted tap happened
    pub last_tap_at: Option<f64>,
    rng: Pcg32,
}

impl Session {
    /// Create an idle session with the given RNG seed
    pub fn new(seed: u64) -> Self {
        let mut session = Self {
            status: SessionStatus::Idle,
            start_instant: None,
            score: 0,
            round_count: 0,
            target_index: 0,
            grid: Vec::new(),
            player_name: String::new(),
            last_tap_at: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        session.next_round();
        session
    }

    /// Move the target and regenerate every decoy
    fn next_round(&mut self) {
        self.target_index = pick_target_index(&mut self.rng, GRID_SIZE);
        self.grid = generate(
            &mut self.rng,
            GRID_SIZE,
            self.target_index,
            TARGET,
            &DECOYS,
        );
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Begin a sprint. Ignored while one is already running.
    pub fn start(&mut self, now: f64) -> bool {
        if self.is_running() {
            log::debug!("start ignored: already running");
            return false;
        }
        self.score = 0;
        self.round_count = 0;
        self.last_tap_at = None;
        self.start_instant = Some(now);
        self.next_round();
        self.status = SessionStatus::Running;
        log::info!("Sprint started at {:.3}", now);
        true
    }

    /// Register a tap on `cell`.
    ///
    /// Scoring is by cell identity: only `target_index` scores, whatever the
    /// other cells display.
    pub fn tap(&mut self, cell: usize, now: f64) -> TapOutcome {
        if !self.is_running() {
            log::debug!("tap {} rejected: session {}", cell, self.status.as_str());
            return TapOutcome::Rejected;
        }
        if cell >= GRID_SIZE * GRID_SIZE {
            log::debug!("tap {} rejected: off grid", cell);
            return TapOutcome::Rejected;
        }

        let outcome = if cell == self.target_index {
            self.score += 1;
            TapOutcome::Hit
        } else {
            TapOutcome::Miss
        };
        self.round_count += 1;
        self.last_tap_at = Some(now);
        self.next_round();
        outcome
    }

    /// Back to Idle defaults. The nickname is kept.
    pub fn reset(&mut self) {
        self.status = SessionStatus::Idle;
        self.start_instant = None;
        self.score = 0;
        self.round_count = 0;
        self.last_tap_at = None;
        self.next_round();
        log::debug!("session reset");
    }

    /// Whole seconds left (full duration unless running)
    pub fn remaining_seconds(&self, now: f64) -> u32 {
        if self.is_running() {
            timer::remaining_seconds(self.start_instant, GAME_SECONDS, now)
        } else {
            GAME_SECONDS
        }
    }

    /// Set the nickname, truncating to `MAX_NAME_CHARS`
    pub fn set_player_name(&mut self, raw: &str) {
        self.player_name = truncate_name(raw);
    }

    /// Detached snapshot for the card composer
    pub fn card_request(&self) -> CardRequest {
        CardRequest::new(&self.player_name, self.score)
    }

    /// Symbol shown at `cell`, if on the grid
    pub fn symbol_at(&self, cell: usize) -> Option<char> {
        self.grid.get(cell).map(|c| c.symbol)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(rand::random())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn miss_index(session: &Session) -> usize {
        (session.target_index + 1) % (GRID_SIZE * GRID_SIZE)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new(42);
        assert_eq!(session.status, SessionStatus::Idle);
        assert_eq!(session.score, 0);
        assert_eq!(session.round_count, 0);
        assert!(session.start_instant.is_none());
        assert!(session.target_index < GRID_SIZE * GRID_SIZE);
        assert_eq!(session.grid.len(), GRID_SIZE * GRID_SIZE);
        assert_eq!(session.symbol_at(session.target_index), Some(TARGET));
    }

    #[test]
    fn test_start_only_from_idle_or_ended() {
        let mut session = Session::new(42);
        assert!(session.start(10.0));
        assert_eq!(session.status, SessionStatus::Running);
        assert_eq!(session.start_instant, Some(10.0));

        // Second start while running is ignored and keeps the original instant
        session.tap(session.target_index, 11.0);
        assert!(!session.start(12.0));
        assert_eq!(session.start_instant, Some(10.0));
        assert_eq!(session.score, 1);

        session.status = SessionStatus::Ended;
        assert!(session.start(40.0));
        assert_eq!(session.score, 0);
        assert_eq!(session.round_count, 0);
        assert_eq!(session.start_instant, Some(40.0));
    }

    #[test]
    fn test_tap_rejected_unless_running() {
        let mut session = Session::new(3);
        let before = session.clone();
        assert_eq!(session.tap(session.target_index, 1.0), TapOutcome::Rejected);
        assert_eq!(session.round_count, 0);
        assert_eq!(session.target_index, before.target_index);
        assert_eq!(session.grid, before.grid);
    }

    #[test]
    fn test_tap_off_grid_is_rejected() {
        let mut session = Session::new(3);
        session.start(0.0);
        let target = session.target_index;
        assert_eq!(session.tap(16, 1.0), TapOutcome::Rejected);
        assert_eq!(session.tap(usize::MAX, 1.0), TapOutcome::Rejected);
        assert_eq!(session.round_count, 0);
        assert_eq!(session.target_index, target);
    }

    #[test]
    fn test_hit_and_miss() {
        let mut session = Session::new(8);
        session.start(0.0);

        assert_eq!(session.tap(session.target_index, 1.0), TapOutcome::Hit);
        assert_eq!((session.score, session.round_count), (1, 1));
        assert_eq!(session.last_tap_at, Some(1.0));

        let miss = miss_index(&session);
        assert_eq!(session.tap(miss, 2.0), TapOutcome::Miss);
        assert_eq!((session.score, session.round_count), (1, 2));
        assert_eq!(session.symbol_at(session.target_index), Some(TARGET));
    }

    #[test]
    fn test_decoy_with_target_glyph_never_scores() {
        let mut session = Session::new(8);
        session.start(0.0);
        let miss = miss_index(&session);
        // Force the decoy to look like the target
        session.grid[miss].symbol = TARGET;
        assert_eq!(session.tap(miss, 1.0), TapOutcome::Miss);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_reset_mid_run() {
        let mut session = Session::new(5);
        session.set_player_name("Kit");
        session.start(0.0);
        session.tap(session.target_index, 1.0);
        session.reset();

        assert_eq!(session.status, SessionStatus::Idle);
        assert_eq!(session.score, 0);
        assert_eq!(session.round_count, 0);
        assert!(session.start_instant.is_none());
        assert!(session.last_tap_at.is_none());
        assert_eq!(session.player_name, "Kit");
    }

    #[test]
    fn test_remaining_seconds_only_counts_while_running() {
        let mut session = Session::new(5);
        assert_eq!(session.remaining_seconds(100.0), GAME_SECONDS);
        session.start(100.0);
        assert_eq!(session.remaining_seconds(104.2), 11);
        session.status = SessionStatus::Ended;
        assert_eq!(session.remaining_seconds(104.2), GAME_SECONDS);
    }

    #[test]
    fn test_card_request_is_detached() {
        let mut session = Session::new(5);
        session.set_player_name(&"x".repeat(40));
        session.start(0.0);
        session.tap(session.target_index, 1.0);

        let request = session.card_request();
        session.tap(session.target_index, 2.0);

        assert_eq!(request.score, 1);
        assert_eq!(request.name.chars().count(), MAX_NAME_CHARS);
        assert_eq!(session.score, 2);
    }

    #[test]
    fn test_same_seed_same_rounds() {
        let mut a = Session::new(1234);
        let mut b = Session::new(1234);
        a.start(0.0);
        b.start(0.0);
        for i in 0..10 {
            assert_eq!(a.target_index, b.target_index);
            a.tap(i % 16, i as f64);
            b.tap(i % 16, i as f64);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.grid, b.grid);
    }
}
