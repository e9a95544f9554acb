use crate::kinds::{EnemyKind, TowerKind};
use crate::snapshot::GameSnapshot;
use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// A player's move, decoded once at the provider boundary. Anything the
/// provider produced that does not fit these shapes becomes `Invalid` there;
/// the arbitrator repairs every variant into a concrete effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Decision {
    /// Defender move. A missing position is filled in by the arbitrator's
    /// strategic rotation.
    Place {
        kind: TowerKind,
        position: Option<Position>,
    },
    /// Attacker move: one enemy at the path entry.
    Spawn { kind: EnemyKind },
    /// Attacker move: queue a full wave.
    Wave,
    /// Hold resources this turn.
    Save,
    /// Unrecognized output; repaired to the cheapest action.
    Invalid,
}

/// Failure of the decision call itself, as opposed to a semantic "save".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport-level failure reaching the model.
    Network(String),
    /// The response could not be decoded into a `Decision`.
    Malformed(String),
    /// The per-call deadline elapsed.
    Timeout,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Malformed(msg) => write!(f, "malformed response: {msg}"),
            ProviderError::Timeout => write!(f, "decision call timed out"),
        }
    }
}

impl std::error::Error for ProviderError {}

pub type DecisionFuture = Pin<Box<dyn Future<Output = Result<Decision, ProviderError>> + Send>>;

/// Opaque capability that turns a game-state snapshot into a proposed move.
/// Implementations own their network plumbing, prompts and parsing; the core
/// only sees the structured result. Calls run on independent tasks, so the
/// returned future must be `Send`.
pub trait DecisionProvider: Send + Sync + 'static {
    fn decide(&self, snapshot: GameSnapshot) -> DecisionFuture;
}
