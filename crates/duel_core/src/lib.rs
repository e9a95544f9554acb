pub mod decision;
pub mod kinds;
pub mod snapshot;
pub mod types;

pub use decision::{Decision, DecisionFuture, DecisionProvider, ProviderError};
pub use kinds::{EnemyKind, TowerKind};
pub use snapshot::{EnemyView, GameSnapshot, TowerView};
pub use types::{PerRole, Position, Role};
