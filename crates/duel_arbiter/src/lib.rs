//! Turn arbitration and session hosting for the tower-defense duel.
//!
//! The engine crate is a pure state machine; this crate gives it a life on a
//! tokio runtime. A [`GameHandle`] owns the game behind one async mutex, a
//! [`TurnArbiter`] alternates the two roles' decision providers and repairs
//! their output into legal moves, and [`run_session_loop`] drives ticks at a
//! fixed (but adjustable) rate.

pub mod driver;
pub mod events;
pub mod session;
pub mod turn;

pub use driver::{run_session_loop, spawn_session_loop};
pub use events::{EventCursor, EventLog, SequencedEvent};
pub use session::{GameHandle, SessionConfig, SessionStatus};
pub use turn::{ArbiterConfig, TurnArbiter};
