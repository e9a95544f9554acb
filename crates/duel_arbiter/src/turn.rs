use duel_core::{
    Decision, DecisionProvider, EnemyKind, PerRole, Position, ProviderError, Role, TowerKind,
};
use duel_engine::{EnemySpec, Game, GameEvent, TowerSpec, Winner};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A defender may only hold resources once this many towers stand; earlier
/// saves are converted into a forced placement.
const MIN_TOWERS_FOR_SAVE: usize = 5;

/// An attacker holding at least this much is forced to spend instead of save.
const ATTACKER_SAVE_LIMIT: u32 = 30;

/// Downgrade order for unaffordable tower kinds, richest first.
const TOWER_DOWNGRADE: [TowerKind; 3] = [TowerKind::Sniper, TowerKind::Splash, TowerKind::Basic];

/// Downgrade order for unaffordable enemy kinds, richest first.
const ENEMY_DOWNGRADE: [EnemyKind; 3] = [EnemyKind::Tank, EnemyKind::Fast, EnemyKind::Basic];

#[derive(Clone, Copy, Debug)]
pub struct ArbiterConfig {
    /// A turn not resolving within this window ends the session in a draw.
    pub turn_timeout: Duration,
    /// Minimum delay between a resolved turn and the next provider call.
    pub turn_pause: Duration,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_secs(45),
            turn_pause: Duration::from_secs(1),
        }
    }
}

/// Outcome of one provider call, sent back to the session over the channel.
/// `seq` ties it to the request that spawned it so late completions from a
/// superseded turn are dropped instead of applied.
pub(crate) struct CompletedCall {
    pub role: Role,
    pub seq: u64,
    pub result: Result<Decision, ProviderError>,
}

/// Alternates the two roles' decision providers against the game.
///
/// Calls run on their own tokio tasks and report back through an unbounded
/// channel; the session drains that channel under its lock, so the arbiter
/// itself is never touched concurrently. Raw provider output is repaired
/// here into a legal move: unaffordable kinds downgrade, bad positions fall
/// back to the strategic rotation, and disallowed saves convert to the
/// cheapest spend.
pub struct TurnArbiter {
    config: ArbiterConfig,
    providers: PerRole<Arc<dyn DecisionProvider>>,
    ai_enabled: PerRole<bool>,
    thinking: bool,
    seq: u64,
    next_request_at: Instant,
    last_progress: Instant,
    tx: mpsc::UnboundedSender<CompletedCall>,
}

impl TurnArbiter {
    pub(crate) fn new(
        config: ArbiterConfig,
        providers: PerRole<Arc<dyn DecisionProvider>>,
        tx: mpsc::UnboundedSender<CompletedCall>,
    ) -> Self {
        let now = Instant::now();
        Self {
            config,
            providers,
            ai_enabled: PerRole::splat(true),
            thinking: false,
            seq: 0,
            next_request_at: now,
            last_progress: now,
            tx,
        }
    }

    /// True while a provider call for the current turn is in flight.
    pub fn thinking(&self) -> bool {
        self.thinking
    }

    pub fn ai_enabled(&self, role: Role) -> bool {
        self.ai_enabled[role]
    }

    pub fn set_ai_enabled(&mut self, role: Role, enabled: bool) {
        if enabled && !self.ai_enabled[role] {
            // Time spent disabled must not count against the timeout.
            self.touch();
        }
        self.ai_enabled[role] = enabled;
    }

    /// Resets the inactivity clock. Called when the session unpauses or a
    /// role is re-enabled, so idle spans the operator caused don't end the
    /// game.
    pub fn touch(&mut self) {
        self.last_progress = Instant::now();
    }

    /// Per-tick duty: fire the timeout if the current turn has stalled,
    /// otherwise request a decision for the role on turn if none is pending.
    pub fn progress(&mut self, game: &mut Game, out_events: &mut Vec<GameEvent>) {
        if game.is_over() {
            return;
        }

        let role = game.current_turn();

        // A disabled role with no call in flight freezes the turn clock
        // entirely; only a hung outstanding call can still time out.
        if !self.thinking && !self.ai_enabled[role] {
            return;
        }

        if self.last_progress.elapsed() >= self.config.turn_timeout {
            warn!(turn = %role, "turn timed out, ending in a draw");
            game.force_end(Winner::Draw);
            out_events.push(GameEvent::GameEnded {
                winner: Winner::Draw,
            });
            return;
        }

        if self.thinking {
            return;
        }
        if Instant::now() < self.next_request_at {
            return;
        }

        // Below the cheapest possible action there is nothing to ask; the
        // turn resolves to a save without a provider call.
        let cheapest = match role {
            Role::Defender => TowerSpec::of(TowerKind::Basic).cost,
            Role::Attacker => EnemySpec::of(EnemyKind::Basic).cost,
        };
        if game.resources(role) < cheapest {
            self.finish_turn(role, "save (insufficient resources)".to_string(), game, out_events);
            return;
        }

        self.thinking = true;
        let provider = Arc::clone(&self.providers[role]);
        let tx = self.tx.clone();
        let seq = self.seq;
        let snapshot = game.snapshot();
        debug!(%role, seq, "requesting decision");
        tokio::spawn(async move {
            let result = provider.decide(snapshot).await;
            // The session may have shut down; a closed channel is fine.
            let _ = tx.send(CompletedCall { role, seq, result });
        });
    }

    /// Applies one completed provider call: repair the decision into a legal
    /// move, record it, hand the turn to the opponent.
    pub(crate) fn apply(
        &mut self,
        call: CompletedCall,
        game: &mut Game,
        out_events: &mut Vec<GameEvent>,
    ) {
        if call.seq != self.seq || call.role != game.current_turn() {
            debug!(role = %call.role, seq = call.seq, "dropping stale decision");
            return;
        }
        if game.is_over() {
            return;
        }

        self.thinking = false;

        let summary = match call.result {
            Ok(decision) => self.resolve(call.role, decision, game, out_events),
            Err(err) => {
                warn!(role = %call.role, error = %err, "decision call failed, turn passed");
                format!("error: {err}")
            }
        };
        self.finish_turn(call.role, summary, game, out_events);
    }

    /// Common tail of every resolved turn: record it, hand play to the
    /// opponent, restart the pacing and timeout clocks.
    fn finish_turn(
        &mut self,
        role: Role,
        summary: String,
        game: &mut Game,
        out_events: &mut Vec<GameEvent>,
    ) {
        self.seq += 1;
        let now = Instant::now();
        self.last_progress = now;
        self.next_request_at = now + self.config.turn_pause;

        info!(%role, %summary, "turn resolved");
        game.log_decision(role, summary.clone());
        out_events.push(GameEvent::DecisionResolved { role, summary });
        game.switch_turn();
    }

    fn resolve(
        &self,
        role: Role,
        decision: Decision,
        game: &mut Game,
        out_events: &mut Vec<GameEvent>,
    ) -> String {
        match (role, decision) {
            (Role::Defender, Decision::Place { kind, position }) => {
                resolve_place(kind, position, game, out_events)
            }
            (Role::Defender, Decision::Save) => {
                if game.towers().len() >= MIN_TOWERS_FOR_SAVE {
                    "save".to_string()
                } else {
                    // Too early to turtle; build the best tower on hand.
                    let kind = richest_tower(game.resources(Role::Defender))
                        .unwrap_or(TowerKind::Basic);
                    resolve_place(kind, None, game, out_events)
                }
            }
            (Role::Attacker, Decision::Spawn { kind }) => resolve_spawn(kind, game, out_events),
            (Role::Attacker, Decision::Wave) => resolve_wave(game, out_events),
            (Role::Attacker, Decision::Save) => {
                let have = game.resources(Role::Attacker);
                if have < ATTACKER_SAVE_LIMIT {
                    "save".to_string()
                } else {
                    // Forced to spend; send the heaviest unit on hand.
                    let kind = if have >= EnemySpec::of(EnemyKind::Tank).cost {
                        EnemyKind::Tank
                    } else {
                        EnemyKind::Fast
                    };
                    resolve_spawn(kind, game, out_events)
                }
            }
            // Wrong-role and unrecognized output repair to the cheapest
            // action so a broken provider can't stall the match.
            (Role::Defender, decision) => {
                debug!(?decision, "invalid defender decision, repairing to basic placement");
                resolve_place(TowerKind::Basic, None, game, out_events)
            }
            (Role::Attacker, decision) => {
                debug!(?decision, "invalid attacker decision, repairing to basic spawn");
                resolve_spawn(EnemyKind::Basic, game, out_events)
            }
        }
    }
}

/// Richest tower kind affordable at `have`, if any.
fn richest_tower(have: u32) -> Option<TowerKind> {
    TOWER_DOWNGRADE
        .into_iter()
        .find(|k| TowerSpec::of(*k).cost <= have)
}

fn resolve_place(
    mut kind: TowerKind,
    position: Option<Position>,
    game: &mut Game,
    out_events: &mut Vec<GameEvent>,
) -> String {
    let have = game.resources(Role::Defender);
    let mut downgraded = false;
    if have < TowerSpec::of(kind).cost {
        // Walk down to the richest affordable kind. Anything affordable is
        // necessarily cheaper than the request, so this never upgrades.
        match richest_tower(have) {
            Some(cheaper) => {
                kind = cheaper;
                downgraded = true;
            }
            None => return "save (tower unaffordable)".to_string(),
        }
    }

    let pos = position
        .filter(|p| game.can_place_at(*p))
        .or_else(|| strategic_position(game));
    let Some(pos) = pos else {
        return "save (no open cell)".to_string();
    };

    if !game.place_tower(pos, kind, out_events) {
        return "save (placement rejected)".to_string();
    }
    if downgraded {
        format!("place {kind} at ({},{}) [downgraded]", pos.row, pos.col)
    } else {
        format!("place {kind} at ({},{})", pos.row, pos.col)
    }
}

fn resolve_spawn(
    mut kind: EnemyKind,
    game: &mut Game,
    out_events: &mut Vec<GameEvent>,
) -> String {
    let have = game.resources(Role::Attacker);
    let mut downgraded = false;
    if have < EnemySpec::of(kind).cost {
        match ENEMY_DOWNGRADE
            .into_iter()
            .find(|k| EnemySpec::of(*k).cost <= have)
        {
            Some(cheaper) => {
                kind = cheaper;
                downgraded = true;
            }
            None => return "save (enemy unaffordable)".to_string(),
        }
    }

    if !game.spawn_enemy(kind, out_events) {
        return "save (spawn rejected)".to_string();
    }
    if downgraded {
        format!("spawn {kind} [downgraded]")
    } else {
        format!("spawn {kind}")
    }
}

fn resolve_wave(game: &mut Game, out_events: &mut Vec<GameEvent>) -> String {
    let wave = game.wave();
    if game.resources(Role::Attacker) >= Game::wave_cost(wave) && game.spawn_wave(out_events) {
        format!("wave {wave}")
    } else {
        // Can't afford the full wave; send what fits.
        resolve_spawn(EnemyKind::Basic, game, out_events)
    }
}

/// Picks a placement cell from a fixed rotation over corner and mid-field
/// spots, stepping through it by tower count so consecutive fallbacks spread
/// out. Falls back to the first open cell when the whole rotation is taken.
fn strategic_position(game: &Game) -> Option<Position> {
    let config = game.config();
    let (w, h) = (config.width, config.height);
    let candidates = [
        Position::new(2, 2),
        Position::new(2, w - 3),
        Position::new(h - 3, 2),
        Position::new(h - 3, w - 3),
        Position::new(3, w / 4),
        Position::new(3, 3 * w / 4),
        Position::new(h - 4, w / 4),
        Position::new(h - 4, 3 * w / 4),
    ];

    let start = game.towers().len() % candidates.len();
    for i in 0..candidates.len() {
        let pos = candidates[(start + i) % candidates.len()];
        if game.can_place_at(pos) {
            return Some(pos);
        }
    }

    for row in 0..h {
        for col in 0..w {
            let pos = Position::new(row, col);
            if game.can_place_at(pos) {
                return Some(pos);
            }
        }
    }
    None
}
