use duel_arbiter::{
    spawn_session_loop, ArbiterConfig, EventCursor, GameHandle, SessionConfig, SessionStatus,
};
use duel_core::{
    Decision, DecisionFuture, DecisionProvider, EnemyKind, GameSnapshot, Position, ProviderError,
    Role, TowerKind,
};
use duel_engine::{GameConfig, GameEvent, Winner};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// Replays a fixed list of decisions, then fails every further call. A
/// failed call passes the turn without touching the game, so assertions stay
/// independent of how many extra turns happen to resolve.
struct Scripted {
    script: Mutex<VecDeque<Decision>>,
}

impl Scripted {
    fn new(decisions: impl IntoIterator<Item = Decision>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(decisions.into_iter().collect()),
        })
    }
}

impl DecisionProvider for Scripted {
    fn decide(&self, _snapshot: GameSnapshot) -> DecisionFuture {
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::Malformed("script exhausted".into()));
        Box::pin(async move { next })
    }
}

/// Never completes; models a hung upstream model.
struct Stalled;

impl DecisionProvider for Stalled {
    fn decide(&self, _snapshot: GameSnapshot) -> DecisionFuture {
        Box::pin(std::future::pending())
    }
}

/// Always fails the call itself.
struct Failing;

impl DecisionProvider for Failing {
    fn decide(&self, _snapshot: GameSnapshot) -> DecisionFuture {
        Box::pin(async { Err(ProviderError::Network("connection refused".into())) })
    }
}

fn test_config() -> SessionConfig {
    SessionConfig {
        game: GameConfig::default(),
        // No cosmetic pacing in tests; the timeout stays generous.
        arbiter: ArbiterConfig {
            turn_timeout: Duration::from_secs(45),
            turn_pause: Duration::ZERO,
        },
        event_capacity: 256,
    }
}

/// Steps until the in-flight provider call has been dispatched and applied.
async fn resolve_one_turn(handle: &GameHandle) {
    handle.step_one_tick().await;
    sleep(Duration::from_millis(20)).await;
    handle.step_one_tick().await;
}

#[tokio::test]
async fn roles_alternate_and_moves_apply() {
    let handle = GameHandle::new(
        test_config(),
        Scripted::new([Decision::Place {
            kind: TowerKind::Basic,
            position: Some(Position::new(2, 2)),
        }]),
        Scripted::new([Decision::Spawn {
            kind: EnemyKind::Fast,
        }]),
    );

    assert_eq!(handle.current_turn().await, Role::Defender);
    resolve_one_turn(&handle).await;
    assert_eq!(handle.current_turn().await, Role::Attacker);

    resolve_one_turn(&handle).await;

    let snap = handle.snapshot().await;
    assert_eq!(snap.towers.len(), 1);
    assert_eq!(snap.towers[0].position, Position::new(2, 2));
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].kind, EnemyKind::Fast);

    let log = handle.decision_log().await;
    assert!(log.len() >= 2);
    assert!(log[0].starts_with("defender:"));
    assert!(log[1].starts_with("attacker:"));
}

#[tokio::test]
async fn only_one_call_is_in_flight() {
    let handle = GameHandle::new(test_config(), Arc::new(Stalled), Arc::new(Stalled));

    handle.step_one_tick().await;
    assert!(handle.thinking().await);

    // More ticks while the call hangs must not stack further requests or
    // move the turn.
    for _ in 0..5 {
        handle.step_one_tick().await;
    }
    assert!(handle.thinking().await);
    assert_eq!(handle.current_turn().await, Role::Defender);
}

#[tokio::test]
async fn stalled_provider_times_out_into_a_draw() {
    let mut config = test_config();
    config.arbiter.turn_timeout = Duration::from_millis(50);
    let handle = GameHandle::new(config, Arc::new(Stalled), Arc::new(Stalled));

    handle.step_one_tick().await;
    sleep(Duration::from_millis(120)).await;
    handle.step_one_tick().await;

    assert_eq!(handle.status().await, SessionStatus::Finished(Winner::Draw));
}

#[tokio::test]
async fn provider_failure_passes_the_turn() {
    let handle = GameHandle::new(test_config(), Arc::new(Failing), Arc::new(Stalled));

    resolve_one_turn(&handle).await;

    assert_eq!(handle.current_turn().await, Role::Attacker);
    assert!(handle.last_decision(Role::Defender).await.starts_with("error:"));
    let snap = handle.snapshot().await;
    assert!(snap.towers.is_empty());
}

#[tokio::test]
async fn wave_launch_queues_gradual_spawns() {
    let handle = GameHandle::new(
        test_config(),
        Scripted::new([]),
        Scripted::new([Decision::Wave]),
    );

    // The defender's empty script fails its call (a pass), then the
    // attacker launches wave 1 (6 enemies at cost 45). The queue drains
    // into the field over the following ticks.
    resolve_one_turn(&handle).await;
    resolve_one_turn(&handle).await;

    let snap = handle.snapshot().await;
    assert_eq!(snap.wave, 2);
    assert_eq!(snap.enemies.len() + snap.wave_queue_len, 6);
}

#[tokio::test]
async fn pause_freezes_decisions_and_simulation() {
    let handle = GameHandle::new(
        test_config(),
        Scripted::new([Decision::Place {
            kind: TowerKind::Basic,
            position: Some(Position::new(2, 2)),
        }]),
        Arc::new(Stalled),
    );

    handle.set_paused(true).await;
    for _ in 0..5 {
        handle.step_one_tick().await;
        sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(handle.status().await, SessionStatus::Paused);
    assert!(handle.snapshot().await.towers.is_empty());

    handle.set_paused(false).await;
    resolve_one_turn(&handle).await;
    assert_eq!(handle.snapshot().await.towers.len(), 1);
}

#[tokio::test]
async fn disabled_role_stops_requesting() {
    let handle = GameHandle::new(
        test_config(),
        Scripted::new([Decision::Place {
            kind: TowerKind::Basic,
            position: Some(Position::new(2, 2)),
        }]),
        Arc::new(Stalled),
    );

    handle.set_ai_enabled(Role::Defender, false).await;
    for _ in 0..3 {
        handle.step_one_tick().await;
        sleep(Duration::from_millis(5)).await;
    }
    assert!(handle.snapshot().await.towers.is_empty());
    assert_eq!(handle.current_turn().await, Role::Defender);

    handle.set_ai_enabled(Role::Defender, true).await;
    resolve_one_turn(&handle).await;
    assert_eq!(handle.snapshot().await.towers.len(), 1);
}

#[tokio::test]
async fn events_are_polled_with_a_cursor() {
    let handle = GameHandle::new(
        test_config(),
        Scripted::new([Decision::Place {
            kind: TowerKind::Basic,
            position: Some(Position::new(2, 2)),
        }]),
        Scripted::new([Decision::Spawn {
            kind: EnemyKind::Basic,
        }]),
    );

    resolve_one_turn(&handle).await;
    resolve_one_turn(&handle).await;

    let (events, cursor) = handle.poll_events(EventCursor(0)).await;
    assert!(events
        .iter()
        .any(|e| matches!(e.event, GameEvent::TowerPlaced { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e.event, GameEvent::DecisionResolved { role: Role::Attacker, .. })));

    let (rest, _) = handle.poll_events(cursor).await;
    assert!(rest.is_empty());
}

#[tokio::test]
async fn speed_multiplier_is_clamped() {
    let handle = GameHandle::new(test_config(), Arc::new(Stalled), Arc::new(Stalled));
    let base = handle.tick_period();

    handle.set_speed(4);
    assert_eq!(handle.tick_period(), base / 4);
    assert_eq!(handle.speed(), 4);

    handle.set_speed(100);
    assert_eq!(handle.tick_period(), base / 8);

    handle.set_speed(0);
    assert_eq!(handle.tick_period(), base);
}

#[tokio::test]
async fn session_loop_stops_on_shutdown() {
    let mut config = test_config();
    config.game.tick_hz = 200;
    let handle = GameHandle::new(config, Arc::new(Stalled), Arc::new(Stalled));

    let driver = spawn_session_loop(handle.clone());
    sleep(Duration::from_millis(50)).await;
    handle.request_shutdown();

    driver.await.expect("driver task panicked");
}
