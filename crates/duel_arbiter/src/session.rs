use crate::events::{EventCursor, EventLog, SequencedEvent};
use crate::turn::{ArbiterConfig, CompletedCall, TurnArbiter};
use duel_core::{DecisionProvider, GameSnapshot, PerRole, Position, Role};
use duel_engine::{Game, GameConfig, GameEvent, Winner};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Everything needed to start a session.
pub struct SessionConfig {
    pub game: GameConfig,
    pub arbiter: ArbiterConfig,
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            arbiter: ArbiterConfig::default(),
            event_capacity: 1024,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Paused,
    Finished(Winner),
}

struct SessionInner {
    game: Game,
    arbiter: TurnArbiter,
    events: EventLog<GameEvent>,
    rx: mpsc::UnboundedReceiver<CompletedCall>,
}

/// Thread-safe handle to one running session.
///
/// All game and arbiter state lives behind a single async mutex; provider
/// calls run on detached tasks and funnel back through the inner channel, so
/// the lock is only ever held for short synchronous sections. Pause and
/// speed are atomics read by the tick driver without locking.
#[derive(Clone)]
pub struct GameHandle {
    inner: Arc<Mutex<SessionInner>>,
    shutdown: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    tick_period_micros: Arc<AtomicU64>,
    base_period_micros: u64,
}

impl GameHandle {
    pub fn new(
        config: SessionConfig,
        defender: Arc<dyn DecisionProvider>,
        attacker: Arc<dyn DecisionProvider>,
    ) -> GameHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let base_period_micros = 1_000_000 / u64::from(config.game.tick_hz.max(1));
        let game = Game::new(config.game);
        let arbiter = TurnArbiter::new(config.arbiter, PerRole::new(defender, attacker), tx);
        GameHandle {
            inner: Arc::new(Mutex::new(SessionInner {
                game,
                arbiter,
                events: EventLog::new(config.event_capacity),
                rx,
            })),
            shutdown: Arc::new(AtomicBool::new(false)),
            paused: Arc::new(AtomicBool::new(false)),
            tick_period_micros: Arc::new(AtomicU64::new(base_period_micros)),
            base_period_micros,
        }
    }

    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Pauses or resumes the simulation. Resuming resets the turn-timeout
    /// clock so the paused span doesn't count as inactivity.
    pub async fn set_paused(&self, paused: bool) {
        let was = self.paused.swap(paused, Ordering::Relaxed);
        if was && !paused {
            self.inner.lock().await.arbiter.touch();
        }
    }

    /// Current tick period as read by the driver.
    pub fn tick_period(&self) -> Duration {
        Duration::from_micros(self.tick_period_micros.load(Ordering::Relaxed))
    }

    /// Runs the simulation at `multiplier` times the configured rate,
    /// clamped to 1..=8. The driver picks the new period up on its next
    /// iteration.
    pub fn set_speed(&self, multiplier: u32) {
        let multiplier = u64::from(multiplier.clamp(1, 8));
        self.tick_period_micros
            .store((self.base_period_micros / multiplier).max(1), Ordering::Relaxed);
    }

    pub fn speed(&self) -> u32 {
        (self.base_period_micros / self.tick_period_micros.load(Ordering::Relaxed).max(1)) as u32
    }

    pub async fn set_ai_enabled(&self, role: Role, enabled: bool) {
        self.inner.lock().await.arbiter.set_ai_enabled(role, enabled);
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.inner.lock().await.game.snapshot()
    }

    /// Session tunables, including the grid dimensions.
    pub async fn config(&self) -> GameConfig {
        self.inner.lock().await.game.config().clone()
    }

    pub async fn status(&self) -> SessionStatus {
        let inner = self.inner.lock().await;
        if let Some(winner) = inner.game.outcome() {
            SessionStatus::Finished(winner)
        } else if self.is_paused() {
            SessionStatus::Paused
        } else {
            SessionStatus::Running
        }
    }

    pub async fn outcome(&self) -> Option<Winner> {
        self.inner.lock().await.game.outcome()
    }

    pub async fn current_turn(&self) -> Role {
        self.inner.lock().await.game.current_turn()
    }

    /// True while a decision call for the turn on play is in flight.
    pub async fn thinking(&self) -> bool {
        self.inner.lock().await.arbiter.thinking()
    }

    pub async fn path(&self) -> Vec<Position> {
        self.inner.lock().await.game.path().to_vec()
    }

    pub async fn last_decision(&self, role: Role) -> String {
        self.inner.lock().await.game.last_decision(role).to_string()
    }

    pub async fn decision_log(&self) -> Vec<String> {
        self.inner
            .lock()
            .await
            .game
            .decision_log()
            .map(str::to_string)
            .collect()
    }

    /// Events since the cursor, plus the cursor to poll from next.
    pub async fn poll_events(
        &self,
        cursor: EventCursor,
    ) -> (Vec<SequencedEvent<GameEvent>>, EventCursor) {
        self.inner.lock().await.events.since(cursor)
    }

    /// One driver iteration: apply finished decisions, advance the
    /// simulation, let the arbiter request the next decision or fire its
    /// timeout. Returns true once the session is finished.
    pub async fn step_one_tick(&self) -> bool {
        let mut inner = self.inner.lock().await;
        let SessionInner {
            game,
            arbiter,
            events,
            rx,
        } = &mut *inner;

        if self.paused.load(Ordering::Relaxed) {
            // Frozen time must not trip the turn timeout.
            arbiter.touch();
            return game.is_over();
        }

        let mut out_events = Vec::new();
        while let Ok(call) = rx.try_recv() {
            arbiter.apply(call, game, &mut out_events);
        }
        game.advance_tick(&mut out_events);
        arbiter.progress(game, &mut out_events);

        for event in out_events {
            events.push(event);
        }
        game.is_over()
    }
}
