use std::sync::RwLock;

use async_trait::async_trait;
use hpl_types::{BatchId, EventRef};

use crate::error::LedgerError;
use crate::event::{AppendFence, EventFilter, EventKind, EventPayload, LedgerEvent};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger for tests, local demos, and embedding.
///
/// Assigns 1-based sequence numbers in append order and derives each
/// event's transaction reference from a BLAKE3 digest of the sequenced
/// payload. Fenced appends are rejected when the batch's step count moved,
/// mirroring the conflict detection expected of the production collaborator.
pub struct InMemoryLedger {
    events: RwLock<Vec<LedgerEvent>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// Number of events appended so far.
    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn step_count(events: &[LedgerEvent], batch_id: BatchId) -> u64 {
        events
            .iter()
            .filter(|e| {
                e.payload.kind() == EventKind::StepRecorded
                    && e.payload.batch_id() == Some(batch_id)
            })
            .count() as u64
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("event_count", &self.len())
            .finish()
    }
}

#[async_trait]
impl LedgerReader for InMemoryLedger {
    async fn scan(&self, filter: &EventFilter) -> Result<Vec<LedgerEvent>, LedgerError> {
        let events = self
            .events
            .read()
            .map_err(|_| LedgerError::Internal("ledger read lock poisoned".into()))?;

        Ok(events.iter().filter(|e| filter.matches(e)).cloned().collect())
    }
}

#[async_trait]
impl LedgerWriter for InMemoryLedger {
    async fn append(
        &self,
        payload: EventPayload,
        fence: Option<AppendFence>,
    ) -> Result<EventRef, LedgerError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| LedgerError::Internal("ledger write lock poisoned".into()))?;

        if let Some(fence) = fence {
            let actual = Self::step_count(&events, fence.batch_id);
            if actual != fence.expected_total_steps {
                return Err(LedgerError::StaleHead {
                    expected: fence.expected_total_steps,
                    actual,
                });
            }
        }

        let seq = (events.len() + 1) as u64;
        let event_ref = derive_event_ref(seq, &payload)?;
        events.push(LedgerEvent {
            seq,
            event_ref: event_ref.clone(),
            payload,
        });

        Ok(event_ref)
    }
}

fn derive_event_ref(seq: u64, payload: &EventPayload) -> Result<EventRef, LedgerError> {
    let encoded =
        serde_json::to_vec(payload).map_err(|e| LedgerError::Serialization(e.to_string()))?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(b"hpl-event-v1:");
    hasher.update(&seq.to_le_bytes());
    hasher.update(&encoded);
    Ok(EventRef::from_digest(*hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hpl_types::{ActorId, Batch, BatchDraft, BatchState, ContentRef, Role, StepDraft};

    fn batch() -> Batch {
        BatchDraft {
            crop_type: "hops".into(),
            quantity: 40,
            origin_farm: "East Ridge".into(),
            harvest_date: Utc::now(),
            notes: String::new(),
        }
        .into_batch(BatchId::new(), ContentRef::from_content(b"meta"))
    }

    fn mint(batch: &Batch, minter: &ActorId) -> EventPayload {
        EventPayload::BatchMinted {
            batch: batch.clone(),
            minter: minter.clone(),
        }
    }

    fn step(batch_id: BatchId, actor: &ActorId, state: BatchState) -> EventPayload {
        EventPayload::StepRecorded {
            draft: StepDraft {
                batch_id,
                actor: actor.clone(),
                state,
                timestamp: Utc::now(),
                location: "yard".into(),
                notes: String::new(),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Append semantics
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn append_assigns_sequence_and_refs() {
        let ledger = InMemoryLedger::new();
        let minter = ActorId::random();
        let b = batch();

        let r1 = ledger.append(mint(&b, &minter), None).await.unwrap();
        let r2 = ledger
            .append(step(b.id, &minter, BatchState::Produced), None)
            .await
            .unwrap();
        assert_ne!(r1, r2);

        let events = ledger.scan(&EventFilter::all()).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].seq, 1);
        assert_eq!(events[1].seq, 2);
        assert_eq!(events[0].event_ref, r1);
    }

    #[tokio::test]
    async fn fence_accepts_matching_step_count() {
        let ledger = InMemoryLedger::new();
        let minter = ActorId::random();
        let b = batch();
        ledger.append(mint(&b, &minter), None).await.unwrap();

        let fence = AppendFence {
            batch_id: b.id,
            expected_total_steps: 0,
        };
        ledger
            .append(step(b.id, &minter, BatchState::Produced), Some(fence))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fence_rejects_moved_head() {
        let ledger = InMemoryLedger::new();
        let minter = ActorId::random();
        let b = batch();
        ledger.append(mint(&b, &minter), None).await.unwrap();
        ledger
            .append(step(b.id, &minter, BatchState::Produced), None)
            .await
            .unwrap();

        // Decision was made against an empty history; a step landed since.
        let fence = AppendFence {
            batch_id: b.id,
            expected_total_steps: 0,
        };
        let err = ledger
            .append(step(b.id, &minter, BatchState::InTransit), Some(fence))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::StaleHead {
                expected: 0,
                actual: 1
            }
        );
        // The rejected event was not appended.
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test]
    async fn fence_counts_only_this_batch() {
        let ledger = InMemoryLedger::new();
        let minter = ActorId::random();
        let a = batch();
        let b = batch();
        ledger.append(mint(&a, &minter), None).await.unwrap();
        ledger.append(mint(&b, &minter), None).await.unwrap();
        ledger
            .append(step(a.id, &minter, BatchState::Produced), None)
            .await
            .unwrap();

        // Batch `b` still has zero steps; `a`'s step must not trip the fence.
        let fence = AppendFence {
            batch_id: b.id,
            expected_total_steps: 0,
        };
        ledger
            .append(step(b.id, &minter, BatchState::Produced), Some(fence))
            .await
            .unwrap();
    }

    // -----------------------------------------------------------------------
    // Scan semantics
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn scan_is_idempotent_and_ordered() {
        let ledger = InMemoryLedger::new();
        let minter = ActorId::random();
        let b = batch();
        ledger.append(mint(&b, &minter), None).await.unwrap();
        ledger
            .append(step(b.id, &minter, BatchState::Produced), None)
            .await
            .unwrap();

        let first = ledger.scan(&EventFilter::for_batch(b.id)).await.unwrap();
        let second = ledger.scan(&EventFilter::for_batch(b.id)).await.unwrap();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].seq < w[1].seq));
    }

    #[tokio::test]
    async fn scan_with_no_matches_is_empty_not_error() {
        let ledger = InMemoryLedger::new();
        let events = ledger
            .scan(&EventFilter::for_batch(BatchId::new()))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn kind_filter_selects_role_events() {
        let ledger = InMemoryLedger::new();
        let admin = ActorId::random();
        let carrier = ActorId::random();
        ledger.append(mint(&batch(), &admin), None).await.unwrap();
        ledger
            .append(
                EventPayload::RoleGranted {
                    actor: carrier.clone(),
                    role: Role::Carrier,
                    granted_by: admin,
                },
                None,
            )
            .await
            .unwrap();

        let grants = ledger
            .scan(&EventFilter::of_kind(EventKind::RoleGranted))
            .await
            .unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].payload.actor(), &carrier);
    }
}
