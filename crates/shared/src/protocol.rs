use serde::{Deserialize, Serialize};

use crate::domain::{AccountAddress, Direction, GameId, Vec2};

/// Contract tag of the game's actions system in the deployment manifest.
pub const ACTIONS_CONTRACT_TAG: &str = "untitled-actions";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub contract_tag: String,
    pub entrypoint: String,
    #[serde(default)]
    pub calldata: Vec<String>,
}

impl Call {
    pub fn spawn() -> Self {
        Self {
            contract_tag: ACTIONS_CONTRACT_TAG.to_string(),
            entrypoint: "spawn".to_string(),
            calldata: Vec::new(),
        }
    }

    pub fn move_player(game_id: GameId, direction: Direction) -> Self {
        Self {
            contract_tag: ACTIONS_CONTRACT_TAG.to_string(),
            entrypoint: "move".to_string(),
            calldata: vec![game_id.0.to_string(), direction.index().to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Spawned {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game_id: Option<GameId>,
        position: Vec2,
    },
    Moved {
        position: Vec2,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        moves: Option<u32>,
    },
    CombatResult {
        won: bool,
    },
    Died,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub account: AccountAddress,
    pub calls: Vec<Call>,
}

/// What the chain said about a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransactionReceipt {
    Confirmed {
        #[serde(default)]
        events: Vec<GameEvent>,
    },
    Reverted {
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    #[serde(default)]
    pub moves: u32,
    #[serde(default)]
    pub can_move: bool,
    #[serde(default)]
    pub is_dead: bool,
}
