use thiserror::Error;

use hpl_engine::EngineError;
use hpl_gate::GateError;
use hpl_ledger::LedgerError;
use hpl_store::StoreError;
use hpl_types::{ActorId, BatchId, ErrorKind, TypeError, ValidationError};

#[derive(Debug, Error)]
pub enum SdkError {
    /// A fenced append failed twice; another client is mutating the batch.
    #[error("concurrent update conflict on batch {0}; re-read and try again")]
    Conflict(BatchId),

    /// The actor has no role on the ledger; transfers need one.
    #[error("actor {0} has no registered role")]
    UnknownRole(ActorId),

    /// Admin grants need an existing admin (outside bootstrap).
    #[error("granting the admin role requires an existing admin")]
    AdminRequired,

    /// Non-self role grants and all revocations are admin operations.
    #[error("actor {actor} may not administer roles for {subject}")]
    RoleAdministration { actor: ActorId, subject: ActorId },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("encoding error: {0}")]
    Encoding(#[from] TypeError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SdkError {
    /// Stable classification tag for presentation code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Conflict(_) => ErrorKind::State,
            Self::UnknownRole(_) | Self::AdminRequired | Self::RoleAdministration { .. } => {
                ErrorKind::Authorization
            }
            Self::Validation(_) | Self::Encoding(_) => ErrorKind::Validation,
            Self::Gate(e) => e.kind(),
            Self::Engine(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
            Self::Store(e) => e.kind(),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use hpl_types::BatchState;

    #[test]
    fn kinds_delegate_to_sources() {
        assert_eq!(SdkError::Conflict(BatchId::new()).kind(), ErrorKind::State);
        assert_eq!(
            SdkError::UnknownRole(ActorId::random()).kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            SdkError::from(ValidationError::EmptyCropType).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            SdkError::from(GateError::TerminalState(BatchId::new())).kind(),
            ErrorKind::State
        );
        assert_eq!(
            SdkError::from(LedgerError::Unavailable { attempts: 3 }).kind(),
            ErrorKind::Network
        );
        assert_eq!(
            SdkError::from(GateError::RequestedStateMismatch {
                requested: BatchState::Delivered,
                implied: BatchState::InTransit,
            })
            .kind(),
            ErrorKind::Authorization
        );
    }
}
