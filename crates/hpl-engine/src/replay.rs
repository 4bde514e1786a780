use tracing::warn;

use hpl_types::{BatchId, ProvenanceRecord, ProvenanceStep};

/// Fold a batch's ordered step history into its materialized record.
///
/// `steps` must already be in ledger-sequence order; embedded timestamps
/// are advisory and play no part here. Returns `None` for an empty history
/// (the batch is not initialized).
///
/// The fold trusts the gate as the sole legal writer. Should an observed
/// log still contain a backward transition, the last step wins — the
/// ledger is the source of truth — and the anomaly is logged.
pub fn replay(batch_id: BatchId, steps: &[ProvenanceStep]) -> Option<ProvenanceRecord> {
    let first = steps.first()?;
    let last = steps.last()?;

    for pair in steps.windows(2) {
        if pair[1].state < pair[0].state {
            warn!(
                batch_id = %batch_id,
                from = %pair[0].state,
                to = %pair[1].state,
                "observed backward state transition in ledger history"
            );
        }
    }

    Some(ProvenanceRecord {
        batch_id,
        original_producer: first.actor.clone(),
        creation_time: first.timestamp,
        current_state: last.state,
        current_owner: last.actor.clone(),
        total_steps: steps.len() as u64,
    })
}
