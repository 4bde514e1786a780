use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::BatchId;
use crate::identity::ActorId;
use crate::state::BatchState;

/// Materialized view of a batch's supply-chain status.
///
/// Never stored anywhere — always derived by replaying the batch's
/// provenance steps in ledger order. Stale the moment a new event lands;
/// callers re-reconstruct whenever new events may exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub batch_id: BatchId,
    /// Actor that appended the initialization step.
    pub original_producer: ActorId,
    /// Advisory timestamp of the initialization step.
    pub creation_time: DateTime<Utc>,
    pub current_state: BatchState,
    pub current_owner: ActorId,
    /// Count of provenance steps replayed into this record.
    pub total_steps: u64,
}

impl ProvenanceRecord {
    /// Returns `true` if no further transfer may leave the current state.
    pub fn is_terminal(&self) -> bool {
        self.current_state.is_terminal()
    }
}
