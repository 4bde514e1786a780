use hpl_ledger::LedgerError;
use hpl_types::{BatchId, ErrorKind};

/// Errors from reconstruction.
///
/// Metadata-resolution failures are deliberately NOT here: they degrade
/// individual results (see [`Hydration`](crate::Hydration)) instead of
/// failing a reconstruction call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The ledger stayed unreachable through its retry budget; no events
    /// could be observed at all.
    #[error("reconstruction unavailable: {0}")]
    Unavailable(LedgerError),

    /// Any other ledger-boundary failure during a scan.
    #[error("ledger error during reconstruction: {0}")]
    Ledger(LedgerError),

    /// No mint event exists for this batch id.
    #[error("batch {0} has never been minted")]
    UnknownBatch(BatchId),

    /// The batch is minted but no initialization step has been appended.
    #[error("batch {0} is not initialized")]
    NotInitialized(BatchId),
}

impl From<LedgerError> for EngineError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Unavailable { .. } => Self::Unavailable(e),
            other => Self::Ledger(other),
        }
    }
}

impl EngineError {
    /// Stable classification tag.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) | Self::Ledger(_) => ErrorKind::Network,
            Self::UnknownBatch(_) | Self::NotInitialized(_) => ErrorKind::State,
        }
    }
}
