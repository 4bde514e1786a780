use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use hpl_ledger::{EventFilter, EventPayload, LedgerReader};
use hpl_store::MetadataStore;
use hpl_types::{
    ActorId, Batch, BatchDetails, BatchId, ProvenanceRecord, ProvenanceStep,
};

use crate::error::EngineError;
use crate::replay::replay;

/// Whether a reconstructed item's descriptive metadata resolved.
///
/// Degradation is per-item data, not an error path: a catalog with three
/// unresolvable metadata documents still returns every entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hydration {
    Full,
    Degraded { reason: String },
}

impl Hydration {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Full reconstructed view of one batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProvenance {
    pub batch: Batch,
    pub minter: ActorId,
    pub record: ProvenanceRecord,
    /// Steps in ledger order.
    pub steps: Vec<ProvenanceStep>,
    /// Descriptive fields, when the metadata store could resolve them.
    pub details: Option<BatchDetails>,
    pub hydration: Hydration,
}

/// One row of the batch catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub batch: Batch,
    pub minter: ActorId,
    /// `None` when the batch is minted but its provenance is not yet
    /// initialized.
    pub record: Option<ProvenanceRecord>,
    pub details: Option<BatchDetails>,
    pub hydration: Hydration,
}

/// The full catalog of minted batches, in mint order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// How many entries have unresolved descriptive metadata.
    pub fn degraded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.hydration.is_degraded())
            .count()
    }
}

/// Rebuilds provenance views by replaying ledger events.
///
/// Every method performs a fresh scan; nothing derived is cached between
/// calls. Concurrent calls are independent — the only shared state is the
/// metadata store's own read cache.
pub struct ReconstructionEngine<R, S> {
    reader: R,
    store: S,
}

impl<R: LedgerReader, S: MetadataStore> ReconstructionEngine<R, S> {
    pub fn new(reader: R, store: S) -> Self {
        Self { reader, store }
    }

    /// The full provenance view for one batch: ordered history, record,
    /// and descriptive metadata (degraded rather than failing when the
    /// store cannot resolve it).
    pub async fn provenance(&self, batch_id: BatchId) -> Result<BatchProvenance, EngineError> {
        let (batch, minter, steps) = self.batch_events(batch_id).await?;
        let record = replay(batch_id, &steps).ok_or(EngineError::NotInitialized(batch_id))?;
        let (details, hydration) = self.hydrate(&batch).await;

        Ok(BatchProvenance {
            batch,
            minter,
            record,
            steps,
            details,
            hydration,
        })
    }

    /// Current materialized record, or `Ok(None)` for a minted batch with
    /// no initialization step yet.
    pub async fn current_record(
        &self,
        batch_id: BatchId,
    ) -> Result<Option<ProvenanceRecord>, EngineError> {
        let (_, _, steps) = self.batch_events(batch_id).await?;
        Ok(replay(batch_id, &steps))
    }

    /// The mint event's batch and minter, without replaying steps.
    pub async fn minted_batch(&self, batch_id: BatchId) -> Result<(Batch, ActorId), EngineError> {
        let (batch, minter, _) = self.batch_events(batch_id).await?;
        Ok((batch, minter))
    }

    /// Build the catalog of every minted batch.
    ///
    /// One unfiltered scan, partitioned and folded per batch. The most
    /// expensive view in the system; a single batch's metadata failing to
    /// resolve degrades that entry only.
    pub async fn catalog(&self) -> Result<Catalog, EngineError> {
        let mut events = self.reader.scan(&EventFilter::all()).await?;
        events.sort_by_key(|e| e.seq);

        let mut mints: Vec<(Batch, ActorId)> = Vec::new();
        let mut steps_by_batch: HashMap<BatchId, Vec<ProvenanceStep>> = HashMap::new();

        for event in events {
            match event.payload {
                EventPayload::BatchMinted { batch, minter } => {
                    mints.push((batch, minter));
                }
                EventPayload::StepRecorded { draft } => {
                    steps_by_batch
                        .entry(draft.batch_id)
                        .or_default()
                        .push(ProvenanceStep::from_draft(draft, event.event_ref));
                }
                EventPayload::RoleGranted { .. } | EventPayload::RoleRevoked { .. } => {}
            }
        }

        let mut entries = Vec::with_capacity(mints.len());
        for (batch, minter) in mints {
            let record = steps_by_batch
                .get(&batch.id)
                .and_then(|steps| replay(batch.id, steps));
            let (details, hydration) = self.hydrate(&batch).await;
            entries.push(CatalogEntry {
                batch,
                minter,
                record,
                details,
                hydration,
            });
        }

        debug!(
            total = entries.len(),
            degraded = entries.iter().filter(|e| e.hydration.is_degraded()).count(),
            "catalog reconstructed"
        );
        Ok(Catalog { entries })
    }

    /// Every batch an actor has ever minted or stepped, sorted and
    /// deduplicated. Backs "my batches" views.
    pub async fn batches_touched_by(
        &self,
        actor: &ActorId,
    ) -> Result<Vec<BatchId>, EngineError> {
        let events = self
            .reader
            .scan(&EventFilter::by_actor(actor.clone()))
            .await?;

        let ids: BTreeSet<BatchId> = events
            .iter()
            .filter_map(|e| e.payload.batch_id())
            .collect();
        Ok(ids.into_iter().collect())
    }

    async fn batch_events(
        &self,
        batch_id: BatchId,
    ) -> Result<(Batch, ActorId, Vec<ProvenanceStep>), EngineError> {
        let mut events = self
            .reader
            .scan(&EventFilter::for_batch(batch_id))
            .await?;
        // Ledger sequence is the only ordering authority; re-sort in case
        // the transport delivered out of order.
        events.sort_by_key(|e| e.seq);

        let mut minted: Option<(Batch, ActorId)> = None;
        let mut steps = Vec::new();

        for event in events {
            match event.payload {
                EventPayload::BatchMinted { batch, minter } => {
                    minted = Some((batch, minter));
                }
                EventPayload::StepRecorded { draft } => {
                    steps.push(ProvenanceStep::from_draft(draft, event.event_ref));
                }
                EventPayload::RoleGranted { .. } | EventPayload::RoleRevoked { .. } => {}
            }
        }

        let (batch, minter) = minted.ok_or(EngineError::UnknownBatch(batch_id))?;
        Ok((batch, minter, steps))
    }

    async fn hydrate(&self, batch: &Batch) -> (Option<BatchDetails>, Hydration) {
        match self.store.fetch(&batch.metadata_ref).await {
            Ok(bytes) => match BatchDetails::from_json_bytes(&bytes) {
                Ok(details) => (Some(details), Hydration::Full),
                Err(e) => {
                    warn!(batch_id = %batch.id, reference = %batch.metadata_ref,
                        error = %e, "metadata document is not decodable");
                    (
                        None,
                        Hydration::Degraded {
                            reason: e.to_string(),
                        },
                    )
                }
            },
            Err(e) => {
                warn!(batch_id = %batch.id, reference = %batch.metadata_ref,
                    error = %e, "metadata fetch failed; returning degraded entry");
                (
                    None,
                    Hydration::Degraded {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }
}
