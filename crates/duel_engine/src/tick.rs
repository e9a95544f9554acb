use crate::entity::Enemy;
use crate::events::GameEvent;
use crate::game::{Game, Winner};
use duel_core::Role;
use tracing::debug;

impl Game {
    /// Advances the simulation one step. Invoked at a fixed rate by the host
    /// driver; runs to completion synchronously, so no partial mutation is
    /// ever observable across ticks. Order matters: towers resolve before
    /// movement, so a kill this tick prevents a leak this tick.
    pub fn advance_tick(&mut self, out_events: &mut Vec<GameEvent>) {
        if self.is_over() {
            return;
        }

        // 1. Clamp resource pools.
        let cap = self.config.max_resources;
        self.resources.defender = self.resources.defender.min(cap);
        self.resources.attacker = self.resources.attacker.min(cap);

        // 2. Drain a bounded batch from the wave queue.
        self.drain_wave_queue(out_events);

        // 3. Towers cool down and fire; kills pay the defender.
        self.resolve_tower_attacks(out_events);

        // 4. Survivors advance; leaks cost a life and pay the attacker.
        self.move_enemies(out_events);

        // 5. Terminal conditions.
        self.check_terminal(out_events);
    }

    fn drain_wave_queue(&mut self, out_events: &mut Vec<GameEvent>) {
        let mut spawned = 0;
        while spawned < self.config.queue_drain_per_tick
            && self.enemies.len() < self.config.max_live_enemies
        {
            let Some(kind) = self.wave_queue.pop_front() else {
                break;
            };
            let Some(&entry) = self.path.first() else {
                break;
            };
            self.enemies.push(Enemy::new(entry, kind, None));
            out_events.push(GameEvent::EnemySpawned { kind });
            spawned += 1;
        }
    }

    fn resolve_tower_attacks(&mut self, out_events: &mut Vec<GameEvent>) {
        for tower in &mut self.towers {
            if tower.entity.cooldown > 0 {
                tower.entity.cooldown -= 1;
            }
            if !tower.can_attack() {
                continue;
            }
            for idx in tower.attack(&mut self.enemies) {
                let enemy = &self.enemies[idx];
                if enemy.entity.health <= 0 {
                    // Crossed zero under this hit; pay out exactly once.
                    let reward = enemy.reward;
                    let kind = enemy.kind;
                    self.resources[Role::Defender] =
                        self.resources[Role::Defender].saturating_add(reward);
                    self.score[Role::Defender] += reward;
                    out_events.push(GameEvent::EnemyKilled { kind, reward });
                }
            }
        }
    }

    fn move_enemies(&mut self, out_events: &mut Vec<GameEvent>) {
        let last_index = self.path.len().saturating_sub(1);
        let mut survivors = Vec::with_capacity(self.enemies.len());

        for mut enemy in self.enemies.drain(..) {
            // Killed during the attack phase; reward already paid.
            if !enemy.is_alive() {
                continue;
            }

            // Accumulate speed and consume whole path steps, so speeds above
            // one cell per tick advance several cells without skipping.
            enemy.distance_moved += enemy.speed;
            while enemy.distance_moved >= 1.0 && enemy.path_index < last_index {
                enemy.path_index += 1;
                enemy.distance_moved -= 1.0;
                enemy.entity.pos = self.path[enemy.path_index];
            }

            if enemy.path_index >= last_index {
                // Leak: half the reward as attacker resources, full reward
                // as attacker score, one defender life.
                self.lives -= 1;
                self.resources[Role::Attacker] =
                    self.resources[Role::Attacker].saturating_add(enemy.reward / 2);
                self.score[Role::Attacker] += enemy.reward;
                debug!(kind = %enemy.kind, lives = self.lives, "enemy leaked");
                out_events.push(GameEvent::EnemyLeaked {
                    kind: enemy.kind,
                    lives_left: self.lives,
                });
                continue;
            }

            survivors.push(enemy);
        }

        self.enemies = survivors;
    }

    fn check_terminal(&mut self, out_events: &mut Vec<GameEvent>) {
        if self.lives <= 0 {
            self.lives = 0;
            self.outcome = Some(Winner::Attacker);
            out_events.push(GameEvent::GameEnded {
                winner: Winner::Attacker,
            });
            return;
        }

        // Wave limit: field and queue clear with no waves left to launch.
        if self.wave >= self.config.max_waves
            && self.enemies.is_empty()
            && self.wave_queue.is_empty()
        {
            let winner = match self.score.defender.cmp(&self.score.attacker) {
                std::cmp::Ordering::Greater => Winner::Defender,
                std::cmp::Ordering::Less => Winner::Attacker,
                std::cmp::Ordering::Equal => Winner::Draw,
            };
            self.outcome = Some(winner);
            out_events.push(GameEvent::GameEnded { winner });
        }
    }
}
