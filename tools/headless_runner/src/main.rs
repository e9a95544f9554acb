mod providers;

use clap::Parser;
use duel_arbiter::{
    spawn_session_loop, ArbiterConfig, EventCursor, GameHandle, SessionConfig, SessionStatus,
};
use duel_core::Role;
use duel_engine::{GameConfig, GameEvent};
use providers::{RuleBasedAttacker, RuleBasedDefender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

/// Runs one defender-vs-attacker session with rule-based providers and
/// prints the event stream.
#[derive(Parser, Debug)]
#[command(name = "headless_runner")]
struct Args {
    /// Waves before the score comparison ends the game.
    #[arg(long, default_value_t = 30)]
    max_waves: u32,

    /// Simulation rate.
    #[arg(long, default_value_t = 10)]
    tick_hz: u32,

    /// Speed multiplier (1..=8).
    #[arg(long, default_value_t = 1)]
    speed: u32,

    /// Seconds a single turn may stall before the session draws.
    #[arg(long, default_value_t = 45)]
    turn_timeout_secs: u64,

    /// Cosmetic pause between resolved turns, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    turn_pause_ms: u64,

    /// Simulated provider latency, in milliseconds.
    #[arg(long, default_value_t = 200)]
    latency_ms: u64,

    /// Wall-clock cap; the session is shut down when it elapses.
    #[arg(long, default_value_t = 600)]
    max_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SessionConfig {
        game: GameConfig {
            max_waves: args.max_waves,
            tick_hz: args.tick_hz,
            ..GameConfig::default()
        },
        arbiter: ArbiterConfig {
            turn_timeout: Duration::from_secs(args.turn_timeout_secs),
            turn_pause: Duration::from_millis(args.turn_pause_ms),
        },
        event_capacity: 1024,
    };

    let latency = Duration::from_millis(args.latency_ms);
    let handle = GameHandle::new(
        config,
        Arc::new(RuleBasedDefender::new(latency)),
        Arc::new(RuleBasedAttacker::new(latency)),
    );
    handle.set_speed(args.speed);

    let driver = spawn_session_loop(handle.clone());
    let started = Instant::now();
    let mut cursor = EventCursor(0);
    let mut last_status = Instant::now();

    loop {
        sleep(Duration::from_millis(100)).await;

        let (events, next) = handle.poll_events(cursor).await;
        cursor = next;
        for event in &events {
            print_event(&event.event);
        }

        if last_status.elapsed() >= Duration::from_secs(1) {
            print_status(&handle).await;
            last_status = Instant::now();
        }

        match handle.status().await {
            SessionStatus::Finished(_) => break,
            _ if started.elapsed() >= Duration::from_secs(args.max_secs) => {
                println!("wall-clock cap reached, shutting down");
                handle.request_shutdown();
                break;
            }
            _ => {}
        }
    }

    let _ = driver.await;
    print_summary(&handle).await;
}

fn print_event(event: &GameEvent) {
    match event {
        GameEvent::TowerPlaced { kind, position } => {
            println!("tower {kind} placed at ({},{})", position.row, position.col)
        }
        GameEvent::EnemySpawned { kind } => println!("enemy {kind} spawned"),
        GameEvent::WaveLaunched { wave, size, cost } => {
            println!("=== wave {wave} launched: {size} enemies for {cost} ===")
        }
        GameEvent::WaveBonus { amount } => println!("wave bonus: +{amount} to both roles"),
        GameEvent::EnemyKilled { kind, reward } => println!("enemy {kind} killed (+{reward})"),
        GameEvent::EnemyLeaked { kind, lives_left } => {
            println!("enemy {kind} LEAKED, {lives_left} lives left")
        }
        GameEvent::DecisionResolved { role, summary } => println!("[{role}] {summary}"),
        GameEvent::GameEnded { winner } => println!("=== game over, winner: {winner} ==="),
    }
}

async fn print_status(handle: &GameHandle) {
    let snap = handle.snapshot().await;
    println!(
        "  wave {}, lives {}, towers {}, enemies {} (+{} queued), resources d:{} a:{}, score d:{} a:{}",
        snap.wave,
        snap.lives,
        snap.towers.len(),
        snap.enemies.len(),
        snap.wave_queue_len,
        snap.resources.defender,
        snap.resources.attacker,
        snap.score.defender,
        snap.score.attacker,
    );
}

async fn print_summary(handle: &GameHandle) {
    let snap = handle.snapshot().await;
    println!("\n=== session summary ===");
    match handle.outcome().await {
        Some(winner) => println!("winner: {winner}"),
        None => println!("winner: undecided (shut down early)"),
    }
    println!("waves: {}", snap.wave);
    println!("lives: {}", snap.lives);
    println!("towers: {}", snap.towers.len());
    println!(
        "score: defender {} / attacker {}",
        snap.score.defender, snap.score.attacker
    );
    println!(
        "last moves: defender \"{}\", attacker \"{}\"",
        handle.last_decision(Role::Defender).await,
        handle.last_decision(Role::Attacker).await,
    );
}
