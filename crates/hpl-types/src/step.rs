use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::BatchId;
use crate::identity::{ActorId, EventRef};
use crate::state::BatchState;

/// A provenance step as constructed by the authorization gate, before the
/// ledger has assigned its transaction reference.
///
/// The timestamp is advisory — supplied by the actor, never used for
/// ordering. Ordering comes exclusively from the ledger sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDraft {
    pub batch_id: BatchId,
    /// Who performed the step.
    pub actor: ActorId,
    /// The state entered by this step.
    pub state: BatchState,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub notes: String,
}

/// A single immutable event in a batch's provenance history.
///
/// Append-only; never mutated or deleted once observed on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceStep {
    pub actor: ActorId,
    pub state: BatchState,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub notes: String,
    /// Ledger transaction reference of the append that recorded this step.
    pub event_ref: EventRef,
}

impl ProvenanceStep {
    /// Attach the ledger-assigned reference to a gate-constructed draft.
    pub fn from_draft(draft: StepDraft, event_ref: EventRef) -> Self {
        Self {
            actor: draft.actor,
            state: draft.state,
            timestamp: draft.timestamp,
            location: draft.location,
            notes: draft.notes,
            event_ref,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_draft_carries_fields() {
        let draft = StepDraft {
            batch_id: BatchId::new(),
            actor: ActorId::random(),
            state: BatchState::Produced,
            timestamp: Utc::now(),
            location: "warehouse 4".into(),
            notes: String::new(),
        };
        let event_ref = EventRef::from_digest([7; 32]);
        let step = ProvenanceStep::from_draft(draft.clone(), event_ref.clone());
        assert_eq!(step.actor, draft.actor);
        assert_eq!(step.state, draft.state);
        assert_eq!(step.location, draft.location);
        assert_eq!(step.event_ref, event_ref);
    }

    #[test]
    fn serde_roundtrip() {
        let step = ProvenanceStep {
            actor: ActorId::random(),
            state: BatchState::InTransit,
            timestamp: Utc::now(),
            location: "highway 9".into(),
            notes: "refrigerated".into(),
            event_ref: EventRef::from_digest([1; 32]),
        };
        let json = serde_json::to_string(&step).unwrap();
        let parsed: ProvenanceStep = serde_json::from_str(&json).unwrap();
        assert_eq!(step, parsed);
    }
}
