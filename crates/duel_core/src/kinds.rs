use serde::{Deserialize, Serialize};

/// Tower variants. Stats are a static lookup in the engine, not polymorphism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    Basic,
    Sniper,
    Splash,
    Custom,
}

impl TowerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TowerKind::Basic => "basic",
            TowerKind::Sniper => "sniper",
            TowerKind::Splash => "splash",
            TowerKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for TowerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enemy variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Custom,
}

impl EnemyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Fast => "fast",
            EnemyKind::Tank => "tank",
            EnemyKind::Custom => "custom",
        }
    }
}

impl std::fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
