pub mod config;
pub mod economy;
pub mod entity;
pub mod events;
pub mod game;
pub mod path;
pub mod tick;

pub use config::GameConfig;
pub use entity::{Enemy, EnemySpec, Entity, StatOverrides, TargetStrategy, Tower, TowerSpec};
pub use events::GameEvent;
pub use game::{Game, Winner};
pub use path::generate_path;
