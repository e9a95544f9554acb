//! Rule-based decision providers for running sessions without a model
//! backend. The heuristics are deliberately simple; they exist to exercise
//! the arbitration loop, not to play well.

use duel_core::{Decision, DecisionFuture, DecisionProvider, EnemyKind, GameSnapshot, TowerKind};
use std::time::Duration;
use tokio::time::sleep;

/// Builds the priciest tower it can afford, letting the arbiter pick the
/// cell, and saves once a baseline of towers stands.
pub struct RuleBasedDefender {
    latency: Duration,
}

impl RuleBasedDefender {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl DecisionProvider for RuleBasedDefender {
    fn decide(&self, snapshot: GameSnapshot) -> DecisionFuture {
        let resources = snapshot.resources.defender;
        let towers = snapshot.towers.len();
        let tanks = snapshot.count_enemies(EnemyKind::Tank);
        let fasts = snapshot.count_enemies(EnemyKind::Fast);

        let decision = if towers >= 8 && resources < 250 {
            Decision::Save
        } else if resources >= 250 && (tanks >= 2 || snapshot.wave > 10) {
            Decision::Place {
                kind: TowerKind::Sniper,
                position: None,
            }
        } else if resources >= 200 && fasts >= 3 {
            Decision::Place {
                kind: TowerKind::Splash,
                position: None,
            }
        } else if resources >= 100 {
            Decision::Place {
                kind: TowerKind::Basic,
                position: None,
            }
        } else {
            Decision::Save
        };

        let latency = self.latency;
        Box::pin(async move {
            sleep(latency).await;
            Ok(decision)
        })
    }
}

/// Launches a wave whenever it can afford one, otherwise spends down on
/// single spawns scaled to the wave number.
pub struct RuleBasedAttacker {
    latency: Duration,
}

impl RuleBasedAttacker {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl DecisionProvider for RuleBasedAttacker {
    fn decide(&self, snapshot: GameSnapshot) -> DecisionFuture {
        let resources = snapshot.resources.attacker;
        let wave_cost = (40 + 5 * snapshot.wave).min(200);

        let decision = if snapshot.wave_queue_len == 0 && resources >= wave_cost.max(200) {
            Decision::Wave
        } else if resources >= 50 {
            Decision::Spawn {
                kind: EnemyKind::Tank,
            }
        } else if resources >= 30 {
            Decision::Spawn {
                kind: EnemyKind::Fast,
            }
        } else if resources >= 20 {
            Decision::Spawn {
                kind: EnemyKind::Basic,
            }
        } else {
            Decision::Save
        };

        let latency = self.latency;
        Box::pin(async move {
            sleep(latency).await;
            Ok(decision)
        })
    }
}
