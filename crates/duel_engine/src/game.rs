use crate::config::GameConfig;
use crate::entity::{Enemy, Tower};
use crate::path::generate_path;
use duel_core::{EnemyKind, EnemyView, GameSnapshot, PerRole, Position, Role, TowerView};
use std::collections::VecDeque;

/// Kept short so long sessions don't grow without bound.
const DECISION_LOG_CAP: usize = 200;

/// Terminal result of a session. `Draw` covers both the inactivity timeout
/// and a tied score at the wave limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    Defender,
    Attacker,
    Draw,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Defender => f.write_str("defender"),
            Winner::Attacker => f.write_str("attacker"),
            Winner::Draw => f.write_str("none"),
        }
    }
}

/// The aggregate root. Mutated only by the tick driver and the arbitrator's
/// decision application, which the session serializes behind one lock.
pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) path: Vec<Position>,
    pub(crate) towers: Vec<Tower>,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) wave_queue: VecDeque<EnemyKind>,
    pub(crate) resources: PerRole<u32>,
    pub(crate) score: PerRole<u32>,
    pub(crate) lives: i32,
    pub(crate) wave: u32,
    pub(crate) current_turn: Role,
    pub(crate) outcome: Option<Winner>,
    pub(crate) last_decisions: PerRole<String>,
    pub(crate) decision_log: VecDeque<String>,
}

impl Game {
    pub fn new(config: GameConfig) -> Game {
        let path = generate_path(&config);
        Game {
            towers: Vec::new(),
            enemies: Vec::new(),
            wave_queue: VecDeque::new(),
            resources: PerRole::splat(config.start_resources),
            score: PerRole::splat(0),
            lives: config.start_lives,
            wave: 1,
            current_turn: Role::Defender,
            outcome: None,
            last_decisions: PerRole::splat(String::from("none")),
            decision_log: VecDeque::new(),
            path,
            config,
        }
    }

    // Read-only view surface.

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn wave_queue_len(&self) -> usize {
        self.wave_queue.len()
    }

    pub fn resources(&self, role: Role) -> u32 {
        self.resources[role]
    }

    pub fn score(&self, role: Role) -> u32 {
        self.score[role]
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn current_turn(&self) -> Role {
        self.current_turn
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Winner> {
        self.outcome
    }

    pub fn last_decision(&self, role: Role) -> &str {
        &self.last_decisions[role]
    }

    pub fn decision_log(&self) -> impl Iterator<Item = &str> {
        self.decision_log.iter().map(String::as_str)
    }

    /// Read-only projection handed to providers and renderers.
    pub fn snapshot(&self) -> GameSnapshot {
        let path_len = self.path.len();
        GameSnapshot {
            towers: self
                .towers
                .iter()
                .map(|t| TowerView {
                    kind: t.kind,
                    position: t.entity.pos,
                    damage: t.entity.damage,
                    range: t.range,
                    cooldown: t.entity.cooldown,
                })
                .collect(),
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    kind: e.kind,
                    position: e.entity.pos,
                    health: e.entity.health,
                    speed: e.speed,
                    progress: if path_len == 0 {
                        0.0
                    } else {
                        e.path_index as f64 / path_len as f64
                    },
                })
                .collect(),
            resources: self.resources,
            score: self.score,
            lives: self.lives,
            wave: self.wave,
            current_turn: self.current_turn,
            path_len,
            wave_queue_len: self.wave_queue.len(),
        }
    }

    // Mutation entry points shared with the arbitrator.

    pub fn switch_turn(&mut self) {
        self.current_turn = self.current_turn.opponent();
    }

    /// Forces a terminal state, used by the inactivity timeout.
    pub fn force_end(&mut self, winner: Winner) {
        if self.outcome.is_none() {
            self.outcome = Some(winner);
        }
    }

    /// Records a resolved turn in the bounded log.
    pub fn log_decision(&mut self, role: Role, summary: impl Into<String>) {
        let summary = summary.into();
        self.last_decisions[role] = summary.clone();
        self.decision_log.push_back(format!("{role}: {summary}"));
        while self.decision_log.len() > DECISION_LOG_CAP {
            self.decision_log.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::TowerKind;

    #[test]
    fn fresh_game_matches_config() {
        let game = Game::new(GameConfig::default());
        assert_eq!(game.resources(Role::Defender), 300);
        assert_eq!(game.resources(Role::Attacker), 300);
        assert_eq!(game.lives(), 20);
        assert_eq!(game.wave(), 1);
        assert_eq!(game.current_turn(), Role::Defender);
        assert!(!game.is_over());
        assert!(!game.path().is_empty());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut game = Game::new(GameConfig::default());
        let mut events = Vec::new();
        assert!(game.place_tower(Position::new(2, 2), TowerKind::Basic, &mut events));
        assert!(game.spawn_enemy(EnemyKind::Fast, &mut events));

        let snap = game.snapshot();
        assert_eq!(snap.towers.len(), 1);
        assert_eq!(snap.towers[0].kind, TowerKind::Basic);
        assert_eq!(snap.towers[0].position, Position::new(2, 2));
        assert_eq!(snap.enemies.len(), 1);
        assert!((snap.enemies[0].progress - 0.0).abs() < f64::EPSILON);
        assert_eq!(snap.resources.defender, 200);
        assert_eq!(snap.resources.attacker, 270);
        assert_eq!(snap.path_len, game.path().len());
    }

    #[test]
    fn decision_log_is_bounded() {
        let mut game = Game::new(GameConfig::default());
        for i in 0..500 {
            game.log_decision(Role::Defender, format!("entry {i}"));
        }
        assert_eq!(game.decision_log().count(), DECISION_LOG_CAP);
        assert_eq!(game.last_decision(Role::Defender), "entry 499");
    }

    #[test]
    fn force_end_keeps_first_outcome() {
        let mut game = Game::new(GameConfig::default());
        game.force_end(Winner::Draw);
        game.force_end(Winner::Attacker);
        assert_eq!(game.outcome(), Some(Winner::Draw));
    }
}
