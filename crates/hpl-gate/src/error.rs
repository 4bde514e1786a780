use hpl_types::{ActorId, BatchId, BatchState, ErrorKind, Role, ValidationError};

/// Typed rejections from the authorization gate.
///
/// All of these are deterministic: the same record and request always
/// produce the same decision, and none are ever retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// Initialization attempted by someone other than the batch's minter.
    #[error("caller {caller} is not the batch minter {minter}")]
    Unauthorized { caller: ActorId, minter: ActorId },

    /// The acting party is neither the current owner nor an override role.
    #[error("actor {caller} is not the current owner {owner}")]
    NotOwner { caller: ActorId, owner: ActorId },

    /// No route allows this role to move a batch out of this state to
    /// this recipient.
    #[error("{sender_role} may not move a batch from {current_state} to a {recipient_role}")]
    IneligibleTransfer {
        sender_role: Role,
        current_state: BatchState,
        recipient_role: Role,
    },

    /// The requested next state disagrees with the state implied by the
    /// recipient's role.
    #[error("requested state {requested} does not match implied state {implied}")]
    RequestedStateMismatch {
        requested: BatchState,
        implied: BatchState,
    },

    /// A provenance record already exists for this batch.
    #[error("batch {0} is already initialized")]
    AlreadyInitialized(BatchId),

    /// No initialization step has been appended yet.
    #[error("batch {0} is not initialized")]
    NotInitialized(BatchId),

    /// The batch is consumed; nothing may leave the terminal state.
    #[error("batch {0} is consumed and can no longer be transferred")]
    TerminalState(BatchId),

    /// Consumption requires the delivered state.
    #[error("batch {batch_id} must be delivered before consumption (currently {current_state})")]
    NotYetDelivered {
        batch_id: BatchId,
        current_state: BatchState,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl GateError {
    /// Stable classification tag.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. }
            | Self::NotOwner { .. }
            | Self::IneligibleTransfer { .. }
            | Self::RequestedStateMismatch { .. } => ErrorKind::Authorization,
            Self::AlreadyInitialized(_)
            | Self::NotInitialized(_)
            | Self::TerminalState(_)
            | Self::NotYetDelivered { .. } => ErrorKind::State,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let a = ActorId::random();
        let b = ActorId::random();
        assert_eq!(
            GateError::NotOwner {
                caller: a.clone(),
                owner: b.clone()
            }
            .kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            GateError::TerminalState(BatchId::new()).kind(),
            ErrorKind::State
        );
        assert_eq!(
            GateError::Validation(ValidationError::EmptyCropType).kind(),
            ErrorKind::Validation
        );
    }
}
