use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(GameId);

/// Account address as handed out by the wallet connector (`0x`-prefixed felt).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: u32,
    pub y: u32,
}

impl Vec2 {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Hex directions in on-chain enum order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    pub fn index(self) -> u8 {
        match self {
            Direction::East => 0,
            Direction::NorthEast => 1,
            Direction::NorthWest => 2,
            Direction::West => 3,
            Direction::SouthWest => 4,
            Direction::SouthEast => 5,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "east" | "e" => Some(Direction::East),
            "northeast" | "ne" => Some(Direction::NorthEast),
            "northwest" | "nw" => Some(Direction::NorthWest),
            "west" | "w" => Some(Direction::West),
            "southwest" | "sw" => Some(Direction::SouthWest),
            "southeast" | "se" => Some(Direction::SouthEast),
            _ => None,
        }
    }
}

/// Which soundtrack the client should be playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Intro,
    Gameplay,
    Death,
}

impl GamePhase {
    pub const GAME_ROUTE: &'static str = "/game";

    /// The game route plays gameplay (or death) music, every other route is the intro.
    pub fn from_route(route: &str, is_dead: bool) -> Self {
        if route == Self::GAME_ROUTE {
            if is_dead {
                GamePhase::Death
            } else {
                GamePhase::Gameplay
            }
        } else {
            GamePhase::Intro
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    #[default]
    Unknown,
    Moved,
    CombatWon,
    CombatLost,
}

impl MoveOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, MoveOutcome::Moved | MoveOutcome::CombatWon)
    }

    /// Notice text shown for a resolved outcome.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            MoveOutcome::Unknown => None,
            MoveOutcome::Moved => Some("Moved!"),
            MoveOutcome::CombatWon => Some("Won combat! Swapped positions."),
            MoveOutcome::CombatLost => Some("Lost combat! Move failed."),
        }
    }
}
