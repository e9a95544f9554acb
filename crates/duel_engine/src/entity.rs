use duel_core::{EnemyKind, Position, TowerKind};

/// Stats shared by towers and enemies, held by composition.
#[derive(Clone, Copy, Debug)]
pub struct Entity {
    pub pos: Position,
    pub glyph: char,
    pub health: i32,
    pub damage: i32,
    pub cooldown: u32,
    pub max_cooldown: u32,
}

/// How a tower ranks in-range enemies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetStrategy {
    #[default]
    Nearest,
    Strongest,
    Fastest,
}

/// Optional overrides merged onto a `custom` kind's defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatOverrides {
    pub damage: Option<i32>,
    pub range: Option<i32>,
    pub cooldown: Option<u32>,
    pub cost: Option<u32>,
    pub health: Option<i32>,
    pub speed: Option<f64>,
    pub reward: Option<u32>,
}

/// Base stats per tower kind. Static lookup, not polymorphism.
#[derive(Clone, Copy, Debug)]
pub struct TowerSpec {
    pub glyph: char,
    pub damage: i32,
    pub range: i32,
    pub cooldown: u32,
    pub cost: u32,
}

impl TowerSpec {
    pub fn of(kind: TowerKind) -> TowerSpec {
        match kind {
            TowerKind::Basic => TowerSpec {
                glyph: '^',
                damage: 15,
                range: 5,
                cooldown: 5,
                cost: 100,
            },
            TowerKind::Sniper => TowerSpec {
                glyph: '⌖',
                damage: 50,
                range: 12,
                cooldown: 15,
                cost: 250,
            },
            TowerKind::Splash => TowerSpec {
                glyph: '⊕',
                damage: 10,
                range: 3,
                cooldown: 3,
                cost: 200,
            },
            TowerKind::Custom => TowerSpec {
                glyph: '?',
                damage: 20,
                range: 7,
                cooldown: 8,
                cost: 150,
            },
        }
    }

    pub fn with_overrides(mut self, overrides: &StatOverrides) -> TowerSpec {
        if let Some(damage) = overrides.damage {
            self.damage = damage;
        }
        if let Some(range) = overrides.range {
            self.range = range;
        }
        if let Some(cooldown) = overrides.cooldown {
            self.cooldown = cooldown;
        }
        if let Some(cost) = overrides.cost {
            self.cost = cost;
        }
        self
    }
}

/// Base stats per enemy kind.
#[derive(Clone, Copy, Debug)]
pub struct EnemySpec {
    pub glyph: char,
    pub health: i32,
    pub speed: f64,
    pub reward: u32,
    pub cost: u32,
}

impl EnemySpec {
    pub fn of(kind: EnemyKind) -> EnemySpec {
        match kind {
            EnemyKind::Basic => EnemySpec {
                glyph: 'o',
                health: 100,
                speed: 1.0,
                reward: 20,
                cost: 20,
            },
            EnemyKind::Fast => EnemySpec {
                glyph: '>',
                health: 50,
                speed: 2.0,
                reward: 15,
                cost: 30,
            },
            EnemyKind::Tank => EnemySpec {
                glyph: '□',
                health: 300,
                speed: 0.5,
                reward: 50,
                cost: 50,
            },
            EnemyKind::Custom => EnemySpec {
                glyph: '?',
                health: 150,
                speed: 1.2,
                reward: 25,
                cost: 40,
            },
        }
    }

    pub fn with_overrides(mut self, overrides: &StatOverrides) -> EnemySpec {
        if let Some(health) = overrides.health {
            self.health = health;
        }
        if let Some(speed) = overrides.speed {
            self.speed = speed;
        }
        if let Some(reward) = overrides.reward {
            self.reward = reward;
        }
        if let Some(cost) = overrides.cost {
            self.cost = cost;
        }
        self
    }
}

#[derive(Clone, Debug)]
pub struct Tower {
    pub entity: Entity,
    pub kind: TowerKind,
    pub range: i32,
    pub cost: u32,
    pub strategy: TargetStrategy,
}

impl Tower {
    pub fn new(pos: Position, kind: TowerKind, overrides: Option<&StatOverrides>) -> Tower {
        let mut spec = TowerSpec::of(kind);
        if kind == TowerKind::Custom {
            if let Some(ov) = overrides {
                spec = spec.with_overrides(ov);
            }
        }
        Tower {
            entity: Entity {
                pos,
                glyph: spec.glyph,
                health: 100,
                damage: spec.damage,
                cooldown: 0,
                max_cooldown: spec.cooldown,
            },
            kind,
            range: spec.range,
            cost: spec.cost,
            strategy: TargetStrategy::Nearest,
        }
    }

    pub fn can_attack(&self) -> bool {
        self.entity.cooldown == 0
    }

    /// Damages the best-ranked enemies in range and returns their indices.
    /// All strategies share one ascending sort over a signed key; the sort is
    /// stable, so ties keep enumeration order. Splash towers hit up to three
    /// targets, everything else exactly one. An empty result leaves the
    /// cooldown untouched; any hit resets it to the maximum.
    pub fn attack(&mut self, enemies: &mut [Enemy]) -> Vec<usize> {
        let mut targets: Vec<(f64, usize)> = Vec::new();
        for (idx, enemy) in enemies.iter().enumerate() {
            if enemy.entity.health <= 0 {
                continue;
            }
            let distance = self.entity.pos.distance_to(enemy.entity.pos);
            if distance > self.range as f64 {
                continue;
            }
            let key = match self.strategy {
                TargetStrategy::Nearest => distance,
                TargetStrategy::Strongest => -(enemy.entity.health as f64),
                TargetStrategy::Fastest => -enemy.speed,
            };
            targets.push((key, idx));
        }

        if targets.is_empty() {
            return Vec::new();
        }

        targets.sort_by(|a, b| a.0.total_cmp(&b.0));

        let limit = if self.kind == TowerKind::Splash { 3 } else { 1 };
        let mut hit = Vec::new();
        for &(_, idx) in targets.iter().take(limit) {
            enemies[idx].entity.health -= self.entity.damage;
            hit.push(idx);
        }

        self.entity.cooldown = self.entity.max_cooldown;
        hit
    }
}

/// Movement modes. The base rules only ever use `Direct`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnemyBehavior {
    #[default]
    Direct,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub entity: Entity,
    pub kind: EnemyKind,
    pub speed: f64,
    pub reward: u32,
    pub distance_moved: f64,
    pub path_index: usize,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    pub fn new(pos: Position, kind: EnemyKind, overrides: Option<&StatOverrides>) -> Enemy {
        let mut spec = EnemySpec::of(kind);
        if kind == EnemyKind::Custom {
            if let Some(ov) = overrides {
                spec = spec.with_overrides(ov);
            }
        }
        Enemy {
            entity: Entity {
                pos,
                glyph: spec.glyph,
                health: spec.health,
                damage: 0,
                cooldown: 0,
                max_cooldown: 0,
            },
            kind,
            speed: spec.speed,
            reward: spec.reward,
            distance_moved: 0.0,
            path_index: 0,
            behavior: EnemyBehavior::Direct,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.entity.health > 0
    }
}
