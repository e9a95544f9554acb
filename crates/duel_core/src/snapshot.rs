use crate::kinds::{EnemyKind, TowerKind};
use crate::types::{PerRole, Position, Role};
use serde::{Deserialize, Serialize};

/// Read-only projection of the live game state, handed to decision providers
/// and renderers. Never a reference into the mutable aggregate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub towers: Vec<TowerView>,
    pub enemies: Vec<EnemyView>,
    pub resources: PerRole<u32>,
    pub score: PerRole<u32>,
    pub lives: i32,
    pub wave: u32,
    pub current_turn: Role,
    pub path_len: usize,
    pub wave_queue_len: usize,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TowerView {
    pub kind: TowerKind,
    pub position: Position,
    pub damage: i32,
    pub range: i32,
    pub cooldown: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EnemyView {
    pub kind: EnemyKind,
    pub position: Position,
    pub health: i32,
    pub speed: f64,
    /// Fraction of the path already covered, 0.0 at the entry.
    pub progress: f64,
}

impl GameSnapshot {
    pub fn count_enemies(&self, kind: EnemyKind) -> usize {
        self.enemies.iter().filter(|e| e.kind == kind).count()
    }

    pub fn count_towers(&self, kind: TowerKind) -> usize {
        self.towers.iter().filter(|t| t.kind == kind).count()
    }
}
