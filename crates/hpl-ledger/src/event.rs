use serde::{Deserialize, Serialize};

use hpl_types::{ActorId, Batch, BatchId, EventRef, Role, StepDraft};

/// Payload of an event appended to the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// A new batch entered the system. Core fields are fixed from here on.
    BatchMinted { batch: Batch, minter: ActorId },
    /// A provenance step moved a batch's ownership/state.
    StepRecorded { draft: StepDraft },
    /// An actor was granted a supply-chain role.
    RoleGranted {
        actor: ActorId,
        role: Role,
        granted_by: ActorId,
    },
    /// A previously granted role was revoked.
    RoleRevoked {
        actor: ActorId,
        role: Role,
        revoked_by: ActorId,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::BatchMinted { .. } => EventKind::BatchMinted,
            Self::StepRecorded { .. } => EventKind::StepRecorded,
            Self::RoleGranted { .. } => EventKind::RoleGranted,
            Self::RoleRevoked { .. } => EventKind::RoleRevoked,
        }
    }

    /// The batch this payload concerns, if any.
    pub fn batch_id(&self) -> Option<BatchId> {
        match self {
            Self::BatchMinted { batch, .. } => Some(batch.id),
            Self::StepRecorded { draft } => Some(draft.batch_id),
            Self::RoleGranted { .. } | Self::RoleRevoked { .. } => None,
        }
    }

    /// The acting party of this payload.
    pub fn actor(&self) -> &ActorId {
        match self {
            Self::BatchMinted { minter, .. } => minter,
            Self::StepRecorded { draft } => &draft.actor,
            Self::RoleGranted { actor, .. } | Self::RoleRevoked { actor, .. } => actor,
        }
    }
}

/// Discriminant of an [`EventPayload`], used in filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    BatchMinted,
    StepRecorded,
    RoleGranted,
    RoleRevoked,
}

/// An event as observed on the ledger.
///
/// `seq` is the ledger-append position (1-based) and is the ONLY ordering
/// authority; any timestamps inside the payload are advisory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub seq: u64,
    pub event_ref: EventRef,
    pub payload: EventPayload,
}

/// Filter applied client-side over a full event scan.
///
/// All populated fields must match. The default (empty) filter matches
/// every event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub batch_id: Option<BatchId>,
    pub actor: Option<ActorId>,
    pub kind: Option<EventKind>,
}

impl EventFilter {
    /// Match every event on the ledger.
    pub fn all() -> Self {
        Self::default()
    }

    /// Events concerning one batch.
    pub fn for_batch(batch_id: BatchId) -> Self {
        Self {
            batch_id: Some(batch_id),
            ..Self::default()
        }
    }

    /// Events performed by one actor.
    pub fn by_actor(actor: ActorId) -> Self {
        Self {
            actor: Some(actor),
            ..Self::default()
        }
    }

    /// Events of one kind.
    pub fn of_kind(kind: EventKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Narrow this filter to one kind.
    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, event: &LedgerEvent) -> bool {
        if let Some(batch_id) = self.batch_id {
            if event.payload.batch_id() != Some(batch_id) {
                return false;
            }
        }
        if let Some(actor) = &self.actor {
            if event.payload.actor() != actor {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if event.payload.kind() != kind {
                return false;
            }
        }
        true
    }
}

/// Optimistic-concurrency fence for a step append.
///
/// Carries the step count the writer reconstructed its decision against.
/// The ledger collaborator rejects the append with
/// [`LedgerError::StaleHead`](crate::LedgerError::StaleHead) if another
/// client's step landed in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendFence {
    pub batch_id: BatchId,
    pub expected_total_steps: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hpl_types::{BatchDraft, BatchState, ContentRef};

    fn batch() -> Batch {
        BatchDraft {
            crop_type: "barley".into(),
            quantity: 10,
            origin_farm: "North Field".into(),
            harvest_date: Utc::now(),
            notes: String::new(),
        }
        .into_batch(BatchId::new(), ContentRef::from_content(b"meta"))
    }

    fn mint_event(batch: &Batch, minter: &ActorId, seq: u64) -> LedgerEvent {
        LedgerEvent {
            seq,
            event_ref: EventRef::from_digest([seq as u8; 32]),
            payload: EventPayload::BatchMinted {
                batch: batch.clone(),
                minter: minter.clone(),
            },
        }
    }

    fn step_event(batch_id: BatchId, actor: &ActorId, seq: u64) -> LedgerEvent {
        LedgerEvent {
            seq,
            event_ref: EventRef::from_digest([seq as u8; 32]),
            payload: EventPayload::StepRecorded {
                draft: StepDraft {
                    batch_id,
                    actor: actor.clone(),
                    state: BatchState::Produced,
                    timestamp: Utc::now(),
                    location: "origin".into(),
                    notes: String::new(),
                },
            },
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let minter = ActorId::random();
        let b = batch();
        let filter = EventFilter::all();
        assert!(filter.matches(&mint_event(&b, &minter, 1)));
        assert!(filter.matches(&step_event(b.id, &minter, 2)));
    }

    #[test]
    fn batch_filter_excludes_other_batches() {
        let minter = ActorId::random();
        let b = batch();
        let other = batch();
        let filter = EventFilter::for_batch(b.id);
        assert!(filter.matches(&mint_event(&b, &minter, 1)));
        assert!(!filter.matches(&mint_event(&other, &minter, 2)));
    }

    #[test]
    fn batch_filter_excludes_role_events() {
        let admin = ActorId::random();
        let event = LedgerEvent {
            seq: 1,
            event_ref: EventRef::from_digest([1; 32]),
            payload: EventPayload::RoleGranted {
                actor: ActorId::random(),
                role: Role::Carrier,
                granted_by: admin,
            },
        };
        assert!(!EventFilter::for_batch(BatchId::new()).matches(&event));
    }

    #[test]
    fn actor_filter_matches_primary_actor() {
        let minter = ActorId::random();
        let stranger = ActorId::random();
        let b = batch();
        let filter = EventFilter::by_actor(minter.clone());
        assert!(filter.matches(&mint_event(&b, &minter, 1)));
        assert!(!filter.matches(&mint_event(&b, &stranger, 2)));
    }

    #[test]
    fn combined_filter_requires_all_fields() {
        let minter = ActorId::random();
        let b = batch();
        let filter = EventFilter::for_batch(b.id).with_kind(EventKind::StepRecorded);
        assert!(!filter.matches(&mint_event(&b, &minter, 1)));
        assert!(filter.matches(&step_event(b.id, &minter, 2)));
    }

    #[test]
    fn payload_serde_roundtrip() {
        let payload = EventPayload::StepRecorded {
            draft: StepDraft {
                batch_id: BatchId::new(),
                actor: ActorId::random(),
                state: BatchState::Delivered,
                timestamp: Utc::now(),
                location: "port".into(),
                notes: "customs cleared".into(),
            },
        };
        let json = serde_json::to_string(&payload).unwrap();
        let parsed: EventPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload, parsed);
    }
}
