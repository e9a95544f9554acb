use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// The two automated players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Places towers and defends the lives pool.
    Defender,
    /// Spawns enemies and waves to drain lives.
    Attacker,
}

impl Role {
    pub fn opponent(self) -> Role {
        match self {
            Role::Defender => Role::Attacker,
            Role::Attacker => Role::Defender,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Defender => "defender",
            Role::Attacker => "attacker",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pair of values keyed by role. Replaces the stringly-keyed maps the
/// game state would otherwise carry for resources, scores and flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerRole<T> {
    pub defender: T,
    pub attacker: T,
}

impl<T> PerRole<T> {
    pub fn new(defender: T, attacker: T) -> Self {
        Self { defender, attacker }
    }

    /// Both slots initialized to the same value.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            defender: value.clone(),
            attacker: value,
        }
    }
}

impl<T> Index<Role> for PerRole<T> {
    type Output = T;

    fn index(&self, role: Role) -> &T {
        match role {
            Role::Defender => &self.defender,
            Role::Attacker => &self.attacker,
        }
    }
}

impl<T> IndexMut<Role> for PerRole<T> {
    fn index_mut(&mut self, role: Role) -> &mut T {
        match role {
            Role::Defender => &mut self.defender,
            Role::Attacker => &mut self.attacker,
        }
    }
}

/// Integer grid coordinate. Signed so that out-of-range provider output can
/// be represented and rejected instead of panicking at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn distance_to(self, other: Position) -> f64 {
        let dr = (self.row - other.row) as f64;
        let dc = (self.col - other.col) as f64;
        (dr * dr + dc * dc).sqrt()
    }

    /// Chebyshev (king-move) distance, used by placement adjacency checks.
    pub fn chebyshev(self, other: Position) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_flips() {
        assert_eq!(Role::Defender.opponent(), Role::Attacker);
        assert_eq!(Role::Attacker.opponent(), Role::Defender);
    }

    #[test]
    fn per_role_indexing() {
        let mut pair = PerRole::new(1u32, 2u32);
        assert_eq!(pair[Role::Defender], 1);
        pair[Role::Attacker] += 10;
        assert_eq!(pair.attacker, 12);
    }

    #[test]
    fn distances() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert!((a.distance_to(b) - 5.0).abs() < f64::EPSILON);
        assert_eq!(a.chebyshev(b), 4);
    }
}
