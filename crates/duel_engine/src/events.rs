use crate::game::Winner;
use duel_core::{EnemyKind, Position, Role, TowerKind};

/// Observable state changes emitted by the tick driver and the arbitrated
/// decisions. Renderers poll these through the session's event log.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    TowerPlaced {
        kind: TowerKind,
        position: Position,
    },
    EnemySpawned {
        kind: EnemyKind,
    },
    WaveLaunched {
        wave: u32,
        size: usize,
        cost: u32,
    },
    /// Per-wave resource grant applied to both roles.
    WaveBonus {
        amount: u32,
    },
    EnemyKilled {
        kind: EnemyKind,
        reward: u32,
    },
    EnemyLeaked {
        kind: EnemyKind,
        lives_left: i32,
    },
    /// A turn finished resolving, successfully or not.
    DecisionResolved {
        role: Role,
        summary: String,
    },
    GameEnded {
        winner: Winner,
    },
}
