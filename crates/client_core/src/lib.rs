use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{AccountAddress, GameId, MoveOutcome, Vec2},
    protocol::{Call, PlayerSnapshot, TransactionReceipt},
};

mod actions;
mod director;
pub mod error;
pub mod network;
pub mod store;
pub mod transport;

pub use actions::{GameActions, MoveIntent, MoveReport, RECONCILE_DELAY};
pub use director::GameDirector;
pub use error::ActionError;
pub use store::{GameState, GameStore, UiState, UiStore};

/// Submits calls as one transaction and waits for the chain's verdict.
///
/// `Ok(Reverted)` is a rejection the player can retry; `Err` is anything
/// that kept the transaction from being judged at all.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    async fn execute(&self, account: &AccountAddress, calls: Vec<Call>)
        -> Result<TransactionReceipt>;
}

pub struct MissingTransactionExecutor;

#[async_trait]
impl TransactionExecutor for MissingTransactionExecutor {
    async fn execute(
        &self,
        _account: &AccountAddress,
        _calls: Vec<Call>,
    ) -> Result<TransactionReceipt> {
        Err(anyhow!("transaction relay is unavailable"))
    }
}

/// Authoritative read side (the indexer).
#[async_trait]
pub trait StateSource: Send + Sync {
    async fn fetch_player(
        &self,
        account: &AccountAddress,
        game_id: Option<GameId>,
    ) -> Result<Option<PlayerSnapshot>>;
}

pub struct MissingStateSource;

#[async_trait]
impl StateSource for MissingStateSource {
    async fn fetch_player(
        &self,
        _account: &AccountAddress,
        _game_id: Option<GameId>,
    ) -> Result<Option<PlayerSnapshot>> {
        Err(anyhow!("game state indexer is unavailable"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient user-facing message (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Notice(Notice),
    Spawned {
        game_id: Option<GameId>,
    },
    MoveReconciled {
        outcome: MoveOutcome,
        position: Option<Vec2>,
    },
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
