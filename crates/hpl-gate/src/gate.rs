use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use hpl_types::{ActorId, Batch, BatchId, BatchState, ProvenanceRecord, Role, StepDraft};

use crate::error::GateError;
use crate::policy;

/// A proposed ownership transfer, as submitted by the acting party.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub batch_id: BatchId,
    /// Current owner the batch is moving away from.
    pub from: ActorId,
    /// Receiving party.
    pub to: ActorId,
    /// The state the caller expects the transfer to enter. Must match the
    /// state implied by the recipient's role.
    pub requested_state: BatchState,
    pub location: String,
    pub notes: String,
    /// Advisory wall-clock time supplied by the actor.
    pub timestamp: DateTime<Utc>,
}

/// Validate first-time provenance initialization and construct the first
/// step.
///
/// Legal only when no record exists yet and the caller is the batch's
/// minter. The step enters `Produced` with the caller as owner.
pub fn initialize(
    batch: &Batch,
    minter: &ActorId,
    caller: &ActorId,
    existing: Option<&ProvenanceRecord>,
    location: impl Into<String>,
    notes: impl Into<String>,
    timestamp: DateTime<Utc>,
) -> Result<StepDraft, GateError> {
    if existing.is_some() {
        return Err(GateError::AlreadyInitialized(batch.id));
    }
    if caller != minter {
        return Err(GateError::Unauthorized {
            caller: caller.clone(),
            minter: minter.clone(),
        });
    }

    debug!(batch_id = %batch.id, producer = %caller, "initializing provenance");
    Ok(StepDraft {
        batch_id: batch.id,
        actor: caller.clone(),
        state: BatchState::Produced,
        timestamp,
        location: location.into(),
        notes: notes.into(),
    })
}

/// Decide whether a proposed transfer is legal and construct its step.
///
/// `caller` is the acting party; it must be the sender itself or hold an
/// override role entitled to act on the owner's behalf. `sender_role` is
/// the role of the current owner, which keys the routing table.
pub fn authorize_transfer(
    record: &ProvenanceRecord,
    request: &TransferRequest,
    caller: &ActorId,
    caller_role: Role,
    sender_role: Role,
    recipient_role: Role,
) -> Result<StepDraft, GateError> {
    debug_assert_eq!(record.batch_id, request.batch_id);

    if record.is_terminal() {
        return Err(GateError::TerminalState(record.batch_id));
    }

    if request.from != record.current_owner {
        return Err(GateError::NotOwner {
            caller: request.from.clone(),
            owner: record.current_owner.clone(),
        });
    }
    if caller != &request.from && !caller_role.is_override() {
        return Err(GateError::NotOwner {
            caller: caller.clone(),
            owner: record.current_owner.clone(),
        });
    }

    let implied = policy::next_state(sender_role, record.current_state, recipient_role)
        .ok_or(GateError::IneligibleTransfer {
            sender_role,
            current_state: record.current_state,
            recipient_role,
        })?;

    if request.requested_state != implied {
        return Err(GateError::RequestedStateMismatch {
            requested: request.requested_state,
            implied,
        });
    }

    debug!(
        batch_id = %record.batch_id,
        from = %request.from,
        to = %request.to,
        next_state = %implied,
        "transfer authorized"
    );
    Ok(StepDraft {
        batch_id: record.batch_id,
        actor: request.to.clone(),
        state: implied,
        timestamp: request.timestamp,
        location: request.location.clone(),
        notes: request.notes.clone(),
    })
}

/// Validate terminal consumption and construct the final step.
///
/// Legal only for the current owner of a delivered batch.
pub fn mark_consumed(
    record: &ProvenanceRecord,
    actor: &ActorId,
    location: impl Into<String>,
    notes: impl Into<String>,
    timestamp: DateTime<Utc>,
) -> Result<StepDraft, GateError> {
    if record.is_terminal() {
        return Err(GateError::TerminalState(record.batch_id));
    }
    if actor != &record.current_owner {
        return Err(GateError::NotOwner {
            caller: actor.clone(),
            owner: record.current_owner.clone(),
        });
    }
    if record.current_state != BatchState::Delivered {
        return Err(GateError::NotYetDelivered {
            batch_id: record.batch_id,
            current_state: record.current_state,
        });
    }

    debug!(batch_id = %record.batch_id, owner = %actor, "marking batch consumed");
    Ok(StepDraft {
        batch_id: record.batch_id,
        actor: actor.clone(),
        state: BatchState::Consumed,
        timestamp,
        location: location.into(),
        notes: notes.into(),
    })
}
