//! Spawn and move flows: submit, interpret events, reconcile with the indexer.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use anyhow::Result;
use shared::{
    domain::{AccountAddress, Direction, GameId, MoveOutcome, Vec2},
    grid::{predict_move, GridBounds},
    protocol::{Call, GameEvent, TransactionReceipt},
};
use storage::GameIdStore;
use tokio::{
    sync::broadcast,
    task::{AbortHandle, JoinHandle},
};
use tracing::{debug, info, warn};

use crate::{
    director::GameDirector,
    error::ActionError,
    store::{GameStore, UiStore},
    ClientEvent, Notice, NoticeLevel, TransactionExecutor,
};

/// Time given to the indexer to catch up before the authoritative refresh.
pub const RECONCILE_DELAY: Duration = Duration::from_millis(2000);

const SPAWNED_NOTICE: &str = "Player spawned!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub direction: Direction,
    pub pre_move: Vec2,
}

/// Result of a move that reached the chain.
#[derive(Debug)]
pub struct MoveReport {
    pub intent: MoveIntent,
    pub predicted: Option<Vec2>,
    /// Outcome derived from the transaction's events alone.
    pub outcome: MoveOutcome,
    /// Resolves to the final outcome once the delayed refresh has run.
    pub reconciliation: JoinHandle<MoveOutcome>,
}

/// Outcome inferred from where the indexer puts the player after the move.
///
/// Only an approximation: other players moving in between can fool it.
fn infer_outcome(refreshed: Vec2, pre_move: Vec2, predicted: Vec2) -> MoveOutcome {
    if refreshed == pre_move {
        MoveOutcome::CombatLost
    } else if refreshed == predicted {
        MoveOutcome::Moved
    } else {
        MoveOutcome::CombatWon
    }
}

fn notify(
    events: &broadcast::Sender<ClientEvent>,
    level: NoticeLevel,
    message: impl Into<String>,
) {
    let message = message.into();
    match level {
        NoticeLevel::Success => info!(message = %message, "notice"),
        NoticeLevel::Error => warn!(message = %message, "notice"),
    }
    let _ = events.send(ClientEvent::Notice(Notice { level, message }));
}

/// Bumps the reconciliation generation and, under the same lock, installs the
/// new prediction. Returns the ticket of the move that now owns the
/// optimistic position.
fn claim_optimistic(
    generation: &Mutex<u64>,
    store: &GameStore,
    predicted: Option<Vec2>,
) -> u64 {
    let mut latest = generation.lock().unwrap_or_else(PoisonError::into_inner);
    *latest += 1;
    if let Some(predicted) = predicted {
        store.set_optimistic_position(predicted);
    }
    *latest
}

fn notify_outcome(events: &broadcast::Sender<ClientEvent>, outcome: MoveOutcome) {
    if let Some(message) = outcome.notice() {
        let level = if outcome.is_success() {
            NoticeLevel::Success
        } else {
            NoticeLevel::Error
        };
        notify(events, level, message);
    }
}

pub struct GameActions {
    store: GameStore,
    ui: UiStore,
    director: Arc<GameDirector>,
    executor: Arc<dyn TransactionExecutor>,
    game_ids: Arc<dyn GameIdStore>,
    events: broadcast::Sender<ClientEvent>,
    reconcile_delay: Duration,
    pending_reconciliation: Mutex<Option<AbortHandle>>,
    reconcile_generation: Arc<Mutex<u64>>,
    spawning: AtomicBool,
    moving: AtomicBool,
}

impl GameActions {
    pub fn new(
        ui: UiStore,
        director: Arc<GameDirector>,
        executor: Arc<dyn TransactionExecutor>,
        game_ids: Arc<dyn GameIdStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            store: director.store().clone(),
            ui,
            director,
            executor,
            game_ids,
            events,
            reconcile_delay: RECONCILE_DELAY,
            pending_reconciliation: Mutex::new(None),
            reconcile_generation: Arc::new(Mutex::new(0)),
            spawning: AtomicBool::new(false),
            moving: AtomicBool::new(false),
        }
    }

    pub fn with_reconcile_delay(mut self, delay: Duration) -> Self {
        self.reconcile_delay = delay;
        self
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning.load(Ordering::SeqCst)
    }

    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.is_spawning() || self.is_moving()
    }

    fn reject(&self, err: ActionError) -> ActionError {
        notify(&self.events, NoticeLevel::Error, err.to_string());
        err
    }

    fn fail_unexpected(&self, err: anyhow::Error) -> ActionError {
        let err = ActionError::Unexpected(err);
        let message = err.to_string();
        warn!(error = %message, "action failed unexpectedly");
        self.ui.set_error(message.clone());
        self.ui.set_transaction_pending(false);
        notify(&self.events, NoticeLevel::Error, message);
        err
    }

    /// Loads the persisted game id of the current account into the store.
    pub async fn restore_game_id(&self) -> Result<Option<GameId>> {
        let Some(account) = self.store.snapshot().account else {
            return Ok(None);
        };
        let game_id = self.game_ids.load_game_id(&account).await?;
        if game_id.is_some() {
            debug!(account = %account, ?game_id, "restored game id");
            self.store.set_game_id(game_id);
        }
        Ok(game_id)
    }

    pub async fn handle_spawn(&self) -> Result<Option<GameId>, ActionError> {
        let Some(account) = self.store.snapshot().account else {
            return Err(self.reject(ActionError::NoAccount));
        };

        self.spawning.store(true, Ordering::SeqCst);
        let result = self.spawn_inner(&account).await;
        self.spawning.store(false, Ordering::SeqCst);
        result
    }

    async fn spawn_inner(&self, account: &AccountAddress) -> Result<Option<GameId>, ActionError> {
        self.ui.set_transaction_pending(true);
        info!(account = %account, "spawning player");

        let receipt = match self.executor.execute(account, vec![Call::spawn()]).await {
            Ok(receipt) => receipt,
            Err(err) => return Err(self.fail_unexpected(err)),
        };
        let events = match receipt {
            TransactionReceipt::Confirmed { events } => events,
            TransactionReceipt::Reverted { reason } => {
                debug!(reason = %reason, "spawn reverted");
                self.ui.set_transaction_pending(false);
                return Err(self.reject(ActionError::TransactionFailed {
                    action: "Spawn",
                    reason,
                }));
            }
        };
        self.ui.set_transaction_pending(false);

        let mut spawned_game_id = None;
        for event in &events {
            self.director.process_event(event);
            if let GameEvent::Spawned { game_id, position } = event {
                info!(?game_id, %position, "player spawned");
                if let Some(game_id) = game_id {
                    spawned_game_id = Some(*game_id);
                    if let Err(err) = self.game_ids.save_game_id(account, *game_id).await {
                        warn!(error = %err, "failed to persist game id");
                    }
                }
                let _ = self.events.send(ClientEvent::Spawned { game_id: *game_id });
                notify(&self.events, NoticeLevel::Success, SPAWNED_NOTICE);
            }
        }

        if let Err(err) = self.director.refresh_game_state().await {
            return Err(self.fail_unexpected(err));
        }
        Ok(spawned_game_id)
    }

    pub async fn handle_move(&self, direction: Direction) -> Result<MoveReport, ActionError> {
        let state = self.store.snapshot();
        let Some(account) = state.account.clone() else {
            return Err(self.reject(ActionError::NoAccount));
        };
        let Some(game_id) = state.game_id else {
            return Err(self.reject(ActionError::NoActiveGame));
        };
        if !state.can_move {
            return Err(self.reject(ActionError::CannotMoveYet));
        }
        let Some(pre_move) = state.current_position() else {
            return Err(self.reject(ActionError::PositionUnknown));
        };
        let intent = MoveIntent {
            direction,
            pre_move,
        };

        self.moving.store(true, Ordering::SeqCst);
        let result = self.move_inner(&account, game_id, intent, state.bounds).await;
        self.moving.store(false, Ordering::SeqCst);
        result
    }

    async fn move_inner(
        &self,
        account: &AccountAddress,
        game_id: GameId,
        intent: MoveIntent,
        bounds: GridBounds,
    ) -> Result<MoveReport, ActionError> {
        // A newer move owns the optimistic position from here on.
        self.abort_pending_reconciliation();
        self.ui.set_transaction_pending(true);

        let predicted = predict_move(intent.pre_move, intent.direction, bounds);
        let ticket = claim_optimistic(&self.reconcile_generation, &self.store, predicted);
        info!(
            game_id = game_id.0,
            direction = ?intent.direction,
            from = %intent.pre_move,
            ?predicted,
            "submitting move"
        );

        let calls = vec![Call::move_player(game_id, intent.direction)];
        let receipt = match self.executor.execute(account, calls).await {
            Ok(receipt) => receipt,
            Err(err) => {
                self.store.rollback_optimistic_position();
                return Err(self.fail_unexpected(err));
            }
        };
        let events = match receipt {
            TransactionReceipt::Confirmed { events } => events,
            TransactionReceipt::Reverted { reason } => {
                debug!(reason = %reason, "move reverted");
                self.store.rollback_optimistic_position();
                self.ui.set_transaction_pending(false);
                return Err(self.reject(ActionError::TransactionFailed {
                    action: "Move",
                    reason,
                }));
            }
        };
        self.ui.set_transaction_pending(false);

        let mut outcome = MoveOutcome::Unknown;
        for event in &events {
            self.director.process_event(event);
            match event {
                GameEvent::Moved { moves, .. } => {
                    outcome = MoveOutcome::Moved;
                    if let Some(moves) = (*moves).filter(|m| *m > 0) {
                        self.store.set_current_moves(moves);
                    }
                }
                GameEvent::CombatResult { won } => {
                    outcome = if *won {
                        MoveOutcome::CombatWon
                    } else {
                        MoveOutcome::CombatLost
                    };
                }
                _ => {}
            }
        }
        debug!(?outcome, events = events.len(), "move confirmed");

        notify_outcome(&self.events, outcome);
        if outcome == MoveOutcome::CombatLost {
            // The prediction assumed an uncontested cell.
            self.store.rollback_optimistic_position();
        }

        let reconciliation = self.schedule_reconciliation(Reconciler {
            director: Arc::clone(&self.director),
            events: self.events.clone(),
            generation: Arc::clone(&self.reconcile_generation),
            ticket,
            intent,
            predicted,
            outcome,
        });
        Ok(MoveReport {
            intent,
            predicted,
            outcome,
            reconciliation,
        })
    }

    fn schedule_reconciliation(&self, reconciler: Reconciler) -> JoinHandle<MoveOutcome> {
        let task = tokio::spawn(reconciler.run(self.reconcile_delay));

        if let Ok(mut pending) = self.pending_reconciliation.lock() {
            *pending = Some(task.abort_handle());
        }
        task
    }

    fn abort_pending_reconciliation(&self) -> bool {
        let handle = match self.pending_reconciliation.lock() {
            Ok(mut pending) => pending.take(),
            Err(_) => None,
        };
        match handle {
            Some(handle) => {
                debug!("aborting pending move reconciliation");
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Drops a scheduled reconciliation and the optimistic position it guards.
    pub fn cancel_pending_reconciliation(&self) {
        if self.abort_pending_reconciliation() {
            let mut latest = self
                .reconcile_generation
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *latest += 1;
            self.store.rollback_optimistic_position();
        }
    }

    pub fn shutdown(&self) {
        self.cancel_pending_reconciliation();
    }
}

/// Delayed authoritative refresh for one move.
struct Reconciler {
    director: Arc<GameDirector>,
    events: broadcast::Sender<ClientEvent>,
    generation: Arc<Mutex<u64>>,
    ticket: u64,
    intent: MoveIntent,
    predicted: Option<Vec2>,
    outcome: MoveOutcome,
}

impl Reconciler {
    async fn run(self, delay: Duration) -> MoveOutcome {
        tokio::time::sleep(delay).await;
        let refreshed = match self.director.refresh_game_state().await {
            Ok(()) => true,
            Err(err) => {
                let message = format!("{err:#}");
                warn!(error = %message, "move reconciliation refresh failed");
                false
            }
        };
        self.settle(refreshed)
    }

    /// Resolves the outcome and clears the optimistic position, unless a newer
    /// move has claimed it since this one was scheduled.
    fn settle(&self, refreshed: bool) -> MoveOutcome {
        let latest = self
            .generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *latest != self.ticket {
            debug!(ticket = self.ticket, latest = *latest, "reconciliation superseded");
            return self.outcome;
        }

        let store = self.director.store();
        let position = store.snapshot().position;
        let mut resolved = self.outcome;
        if self.outcome == MoveOutcome::Unknown && refreshed {
            if let (Some(predicted), Some(position)) = (self.predicted, position) {
                resolved = infer_outcome(position, self.intent.pre_move, predicted);
                debug!(?resolved, %position, "inferred move outcome from position");
                notify_outcome(&self.events, resolved);
            }
        }

        store.rollback_optimistic_position();
        let _ = self.events.send(ClientEvent::MoveReconciled {
            outcome: resolved,
            position,
        });
        resolved
    }
}

impl Drop for GameActions {
    fn drop(&mut self) {
        self.abort_pending_reconciliation();
    }
}
