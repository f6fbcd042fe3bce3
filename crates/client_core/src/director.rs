use std::sync::Arc;

use anyhow::{Context, Result};
use shared::protocol::GameEvent;
use tracing::{debug, info};

use crate::{store::GameStore, StateSource};

/// Applies chain events and indexer snapshots to the [`GameStore`].
pub struct GameDirector {
    store: GameStore,
    source: Arc<dyn StateSource>,
}

impl GameDirector {
    pub fn new(store: GameStore, source: Arc<dyn StateSource>) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn process_event(&self, event: &GameEvent) {
        debug!(?event, "director: processing event");
        match event {
            GameEvent::Spawned { game_id, position } => {
                self.store.set_is_spawned(true);
                if let Some(game_id) = game_id {
                    self.store.set_game_id(Some(*game_id));
                }
                self.store.set_position(Some(*position));
            }
            GameEvent::Moved { position, .. } => {
                self.store.set_position(Some(*position));
            }
            GameEvent::Died => {
                self.store.set_is_dead(true);
            }
            GameEvent::CombatResult { .. } | GameEvent::Unrecognized => {}
        }
    }

    /// Re-reads the player from the indexer and replaces the authoritative fields.
    pub async fn refresh_game_state(&self) -> Result<()> {
        let state = self.store.snapshot();
        let Some(account) = state.account else {
            debug!("director: no account, skipping refresh");
            return Ok(());
        };

        let snapshot = self
            .source
            .fetch_player(&account, state.game_id)
            .await
            .with_context(|| format!("failed to refresh game state for {account}"))?;
        info!(
            account = %account,
            position = ?snapshot.map(|p| p.position),
            "director: refreshed game state"
        );
        self.store.apply_player_snapshot(snapshot);
        Ok(())
    }
}
