//! Session simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time is passed in as seconds, never read from the clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod grid;
pub mod state;
pub mod tick;
pub mod timer;

pub use grid::{GridCell, generate, pick_target_index};
pub use state::{CardRequest, Session, SessionStatus, TapOutcome};
pub use tick::{EventOutcome, GameEvent, tick};
pub use timer::{elapsed_seconds, is_expired, remaining_seconds};
