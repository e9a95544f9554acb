use crate::entity::{Enemy, EnemySpec, StatOverrides, Tower, TowerSpec};
use crate::events::GameEvent;
use crate::game::Game;
use duel_core::{EnemyKind, Position, Role, TowerKind};
use tracing::debug;

/// Placement rejects cells within this Chebyshev distance of a path cell or
/// an existing tower.
pub(crate) const PLACEMENT_BUFFER: i32 = 1;

/// Wave cost parameters: `min(WAVE_COST_BASE + WAVE_COST_STEP * wave, WAVE_COST_CAP)`.
const WAVE_COST_BASE: u32 = 40;
const WAVE_COST_STEP: u32 = 5;
const WAVE_COST_CAP: u32 = 200;

/// Wave size parameters: `min(WAVE_SIZE_BASE + wave, WAVE_SIZE_CAP)`.
const WAVE_SIZE_BASE: u32 = 5;
const WAVE_SIZE_CAP: u32 = 30;

impl Game {
    /// True when the cell is inside the grid and clear of the path and all
    /// towers, including the 1-cell buffer around each. Ignores cost.
    pub fn can_place_at(&self, pos: Position) -> bool {
        if pos.row < 0 || pos.row >= self.config.height || pos.col < 0 || pos.col >= self.config.width
        {
            return false;
        }
        if self.path.iter().any(|p| p.chebyshev(pos) <= PLACEMENT_BUFFER) {
            return false;
        }
        if self
            .towers
            .iter()
            .any(|t| t.entity.pos.chebyshev(pos) <= PLACEMENT_BUFFER)
        {
            return false;
        }
        true
    }

    pub fn place_tower(
        &mut self,
        pos: Position,
        kind: TowerKind,
        out_events: &mut Vec<GameEvent>,
    ) -> bool {
        self.place_tower_with(pos, kind, None, out_events)
    }

    /// Validates affordability and the cell, then builds the tower and
    /// deducts its cost. Any rejection leaves the game untouched.
    pub fn place_tower_with(
        &mut self,
        pos: Position,
        kind: TowerKind,
        overrides: Option<&StatOverrides>,
        out_events: &mut Vec<GameEvent>,
    ) -> bool {
        let mut spec = TowerSpec::of(kind);
        if kind == TowerKind::Custom {
            if let Some(ov) = overrides {
                spec = spec.with_overrides(ov);
            }
        }
        if self.resources[Role::Defender] < spec.cost {
            debug!(%kind, cost = spec.cost, have = self.resources[Role::Defender], "tower unaffordable");
            return false;
        }
        if !self.can_place_at(pos) {
            debug!(%kind, ?pos, "placement cell rejected");
            return false;
        }

        self.resources[Role::Defender] -= spec.cost;
        self.towers.push(Tower::new(pos, kind, overrides));
        out_events.push(GameEvent::TowerPlaced { kind, position: pos });
        true
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<GameEvent>) -> bool {
        self.spawn_enemy_with(kind, None, out_events)
    }

    /// Creates one enemy at the path entry and deducts its cost.
    pub fn spawn_enemy_with(
        &mut self,
        kind: EnemyKind,
        overrides: Option<&StatOverrides>,
        out_events: &mut Vec<GameEvent>,
    ) -> bool {
        let mut spec = EnemySpec::of(kind);
        if kind == EnemyKind::Custom {
            if let Some(ov) = overrides {
                spec = spec.with_overrides(ov);
            }
        }
        if self.resources[Role::Attacker] < spec.cost {
            debug!(%kind, cost = spec.cost, have = self.resources[Role::Attacker], "enemy unaffordable");
            return false;
        }
        let Some(&entry) = self.path.first() else {
            return false;
        };

        self.resources[Role::Attacker] -= spec.cost;
        self.enemies.push(Enemy::new(entry, kind, overrides));
        out_events.push(GameEvent::EnemySpawned { kind });
        true
    }

    /// Cost of launching the given wave number.
    pub fn wave_cost(wave: u32) -> u32 {
        (WAVE_COST_BASE + WAVE_COST_STEP * wave).min(WAVE_COST_CAP)
    }

    /// Kind mix for the given wave: weak pairs early, balanced cycles in the
    /// mid game, tank-led cycles late.
    pub fn wave_composition(wave: u32) -> Vec<EnemyKind> {
        let count = (WAVE_SIZE_BASE + wave).min(WAVE_SIZE_CAP) as usize;
        let pattern: &[EnemyKind] = if wave > 15 {
            &[EnemyKind::Tank, EnemyKind::Fast, EnemyKind::Basic]
        } else if wave > 5 {
            &[EnemyKind::Fast, EnemyKind::Basic, EnemyKind::Tank]
        } else {
            &[EnemyKind::Basic, EnemyKind::Fast]
        };
        (0..count).map(|i| pattern[i % pattern.len()]).collect()
    }

    /// Deducts the wave cost, queues the wave's composition for gradual
    /// spawning, advances the wave counter and grants the per-wave bonus to
    /// both roles. Nothing spawns immediately.
    pub fn spawn_wave(&mut self, out_events: &mut Vec<GameEvent>) -> bool {
        let wave = self.wave;
        let cost = Self::wave_cost(wave);
        if self.resources[Role::Attacker] < cost {
            debug!(wave, cost, have = self.resources[Role::Attacker], "wave unaffordable");
            return false;
        }

        self.resources[Role::Attacker] -= cost;
        let composition = Self::wave_composition(wave);
        let size = composition.len();
        self.wave_queue.extend(composition);
        out_events.push(GameEvent::WaveLaunched { wave, size, cost });

        self.wave += 1;
        let bonus = Self::wave_bonus(wave);
        self.resources[Role::Defender] = self.resources[Role::Defender].saturating_add(bonus);
        self.resources[Role::Attacker] = self.resources[Role::Attacker].saturating_add(bonus);
        out_events.push(GameEvent::WaveBonus { amount: bonus });
        true
    }

    /// Escalation stipend paid to both roles when wave `wave` launches.
    fn wave_bonus(wave: u32) -> u32 {
        let mut bonus = (30 + (wave / 5) * 10).min(80);
        if wave % 5 == 0 {
            bonus += (50 + (wave / 10) * 20).min(150);
        }
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn game() -> Game {
        Game::new(GameConfig::default())
    }

    #[test]
    fn place_tower_deducts_cost_and_appends() {
        let mut g = game();
        let mut events = Vec::new();

        assert!(g.place_tower(Position::new(2, 2), TowerKind::Basic, &mut events));

        assert_eq!(g.resources(Role::Defender), 200);
        assert_eq!(g.towers().len(), 1);
        assert_eq!(g.towers()[0].kind, TowerKind::Basic);
        assert_eq!(g.towers()[0].entity.pos, Position::new(2, 2));
        assert!(matches!(events[0], GameEvent::TowerPlaced { .. }));
    }

    #[test]
    fn place_tower_rejects_path_cells() {
        let mut g = game();
        let mut events = Vec::new();
        let on_path = g.path()[10];

        assert!(!g.place_tower(on_path, TowerKind::Basic, &mut events));

        assert_eq!(g.resources(Role::Defender), 300);
        assert!(g.towers().is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn place_tower_rejects_path_adjacent_cells() {
        let mut g = game();
        let mut events = Vec::new();
        let near_path = Position::new(g.path()[10].row + 1, g.path()[10].col);

        assert!(!g.place_tower(near_path, TowerKind::Basic, &mut events));
        assert_eq!(g.resources(Role::Defender), 300);
    }

    #[test]
    fn place_tower_rejects_tower_adjacent_cells() {
        let mut g = game();
        let mut events = Vec::new();

        assert!(g.place_tower(Position::new(2, 2), TowerKind::Basic, &mut events));
        assert!(!g.place_tower(Position::new(2, 3), TowerKind::Basic, &mut events));
        assert!(g.place_tower(Position::new(2, 4), TowerKind::Basic, &mut events));
    }

    #[test]
    fn place_tower_rejects_out_of_bounds() {
        let mut g = game();
        let mut events = Vec::new();

        assert!(!g.place_tower(Position::new(-1, 5), TowerKind::Basic, &mut events));
        assert!(!g.place_tower(Position::new(5, 400), TowerKind::Basic, &mut events));
        assert_eq!(g.resources(Role::Defender), 300);
    }

    #[test]
    fn insufficient_resources_never_mutate() {
        let mut g = game();
        let mut events = Vec::new();
        g.resources[Role::Defender] = 99;

        assert!(!g.place_tower(Position::new(2, 2), TowerKind::Basic, &mut events));

        assert_eq!(g.resources(Role::Defender), 99);
        assert!(g.towers().is_empty());
    }

    #[test]
    fn spawn_enemy_deducts_and_spawns_at_entry() {
        let mut g = game();
        let mut events = Vec::new();

        assert!(g.spawn_enemy(EnemyKind::Basic, &mut events));

        assert_eq!(g.resources(Role::Attacker), 280);
        assert_eq!(g.enemies().len(), 1);
        assert_eq!(g.enemies()[0].entity.pos, g.path()[0]);
        assert_eq!(g.enemies()[0].path_index, 0);
    }

    #[test]
    fn spawn_enemy_rejects_unaffordable_kind() {
        let mut g = game();
        let mut events = Vec::new();
        g.resources[Role::Attacker] = 25;

        assert!(!g.spawn_enemy(EnemyKind::Tank, &mut events));

        assert_eq!(g.resources(Role::Attacker), 25);
        assert!(g.enemies().is_empty());
    }

    #[test]
    fn wave_cost_grows_and_caps() {
        assert_eq!(Game::wave_cost(1), 45);
        assert_eq!(Game::wave_cost(10), 90);
        assert_eq!(Game::wave_cost(100), 200);
    }

    #[test]
    fn wave_composition_tiers() {
        let early = Game::wave_composition(1);
        assert_eq!(early.len(), 6);
        assert!(early
            .iter()
            .all(|k| matches!(k, EnemyKind::Basic | EnemyKind::Fast)));

        let mid = Game::wave_composition(10);
        assert_eq!(mid.len(), 15);
        assert_eq!(mid[0], EnemyKind::Fast);
        assert!(mid.contains(&EnemyKind::Tank));

        let late = Game::wave_composition(20);
        assert_eq!(late.len(), 25);
        assert_eq!(late[0], EnemyKind::Tank);

        let huge = Game::wave_composition(100);
        assert_eq!(huge.len(), 30);
    }

    #[test]
    fn spawn_wave_queues_and_advances_counter() {
        let mut g = game();
        let mut events = Vec::new();

        assert!(g.spawn_wave(&mut events));

        // Wave 1 costs 45 and pays a 30 bonus to both roles.
        assert_eq!(g.resources(Role::Attacker), 300 - 45 + 30);
        assert_eq!(g.resources(Role::Defender), 330);
        assert_eq!(g.wave(), 2);
        assert_eq!(g.wave_queue_len(), 6);
        assert!(g.enemies().is_empty(), "waves never spawn immediately");
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::WaveLaunched { wave: 1, size: 6, cost: 45 })));
    }

    #[test]
    fn spawn_wave_rejects_when_broke() {
        let mut g = game();
        let mut events = Vec::new();
        g.resources[Role::Attacker] = 10;

        assert!(!g.spawn_wave(&mut events));

        assert_eq!(g.resources(Role::Attacker), 10);
        assert_eq!(g.wave(), 1);
        assert_eq!(g.wave_queue_len(), 0);
    }
}
