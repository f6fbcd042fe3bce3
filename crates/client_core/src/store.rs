//! Observable client state shared between the flows and the UI.

use std::sync::Arc;

use shared::{
    domain::{AccountAddress, GameId, Vec2},
    grid::GridBounds,
    protocol::PlayerSnapshot,
};
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub account: Option<AccountAddress>,
    pub game_id: Option<GameId>,
    /// Last authoritative position.
    pub position: Option<Vec2>,
    /// Predicted position of an in-flight move.
    pub optimistic_position: Option<Vec2>,
    pub moves: u32,
    pub is_spawned: bool,
    pub is_dead: bool,
    pub can_move: bool,
    pub bounds: GridBounds,
}

impl GameState {
    /// Position the player is shown at.
    pub fn current_position(&self) -> Option<Vec2> {
        self.optimistic_position.or(self.position)
    }
}

#[derive(Clone)]
pub struct GameStore {
    tx: Arc<watch::Sender<GameState>>,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(GameState::default())
    }
}

impl GameStore {
    pub fn new(initial: GameState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> GameState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.tx.subscribe()
    }

    fn update(&self, apply: impl FnOnce(&mut GameState)) {
        self.tx.send_if_modified(|state| {
            let before = state.clone();
            apply(state);
            *state != before
        });
    }

    pub fn set_account(&self, account: Option<AccountAddress>) {
        self.update(|s| s.account = account);
    }

    pub fn set_game_id(&self, game_id: Option<GameId>) {
        self.update(|s| s.game_id = game_id);
    }

    pub fn set_is_spawned(&self, is_spawned: bool) {
        self.update(|s| s.is_spawned = is_spawned);
    }

    pub fn set_position(&self, position: Option<Vec2>) {
        self.update(|s| s.position = position);
    }

    pub fn set_optimistic_position(&self, position: Vec2) {
        self.update(|s| s.optimistic_position = Some(position));
    }

    pub fn rollback_optimistic_position(&self) {
        self.update(|s| s.optimistic_position = None);
    }

    pub fn set_current_moves(&self, moves: u32) {
        self.update(|s| s.moves = moves);
    }

    pub fn set_is_dead(&self, is_dead: bool) {
        self.update(|s| s.is_dead = is_dead);
    }

    pub fn set_can_move(&self, can_move: bool) {
        self.update(|s| s.can_move = can_move);
    }

    pub fn current_position(&self) -> Option<Vec2> {
        self.tx.borrow().current_position()
    }

    /// Replaces the authoritative player fields with what the indexer reports.
    pub fn apply_player_snapshot(&self, snapshot: Option<PlayerSnapshot>) {
        self.update(|s| match snapshot {
            Some(player) => {
                s.position = Some(player.position);
                s.moves = player.moves;
                s.can_move = player.can_move;
                s.is_dead = player.is_dead;
                s.is_spawned = true;
            }
            None => {
                s.position = None;
                s.can_move = false;
                s.is_spawned = false;
            }
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub is_transaction_pending: bool,
    pub last_error: Option<String>,
    pub music_enabled: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            is_transaction_pending: false,
            last_error: None,
            music_enabled: true,
        }
    }
}

#[derive(Clone)]
pub struct UiStore {
    tx: Arc<watch::Sender<UiState>>,
}

impl Default for UiStore {
    fn default() -> Self {
        let (tx, _) = watch::channel(UiState::default());
        Self { tx: Arc::new(tx) }
    }
}

impl UiStore {
    pub fn snapshot(&self) -> UiState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.tx.subscribe()
    }

    pub fn set_transaction_pending(&self, pending: bool) {
        self.tx.send_if_modified(|s| {
            let changed = s.is_transaction_pending != pending;
            s.is_transaction_pending = pending;
            changed
        });
    }

    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|s| s.last_error = Some(message));
    }

    pub fn clear_error(&self) {
        self.tx.send_if_modified(|s| s.last_error.take().is_some());
    }

    pub fn set_music_enabled(&self, enabled: bool) {
        self.tx.send_if_modified(|s| {
            let changed = s.music_enabled != enabled;
            s.music_enabled = enabled;
            changed
        });
    }
}
