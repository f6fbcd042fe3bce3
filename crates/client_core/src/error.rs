use thiserror::Error;

/// Why a spawn or move attempt ended without reaching the chain's answer.
///
/// The `Display` text is what the player is shown.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("No wallet connected")]
    NoAccount,
    #[error("No active game")]
    NoActiveGame,
    #[error("Cannot move yet")]
    CannotMoveYet,
    #[error("Position not found")]
    PositionUnknown,
    #[error("{action} action failed")]
    TransactionFailed { action: &'static str, reason: String },
    #[error("{0:#}")]
    Unexpected(anyhow::Error),
}

impl ActionError {
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ActionError::NoAccount
                | ActionError::NoActiveGame
                | ActionError::CannotMoveYet
                | ActionError::PositionUnknown
        )
    }
}
