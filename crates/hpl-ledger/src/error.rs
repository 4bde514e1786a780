use hpl_types::ErrorKind;

/// Errors surfaced at the ledger boundary.
///
/// The write-path variants (`Rejected`, `InsufficientBalance`, `Reverted`)
/// map the external collaborator's failure modes into HPL's taxonomy; the
/// read-path variants distinguish transient transport faults from a ledger
/// declared unavailable after retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Transient transport failure; eligible for retry.
    #[error("ledger endpoint unreachable: {reason}")]
    Unreachable { reason: String },

    /// The endpoint stayed unreachable through the configured retries.
    #[error("ledger unavailable after {attempts} attempts")]
    Unavailable { attempts: u32 },

    /// The signer refused to authorize the append.
    #[error("append rejected by signer: {reason}")]
    Rejected { reason: String },

    /// The acting account cannot cover the append cost.
    #[error("insufficient balance for append")]
    InsufficientBalance,

    /// The ledger accepted then reverted the append.
    #[error("append reverted: {reason}")]
    Reverted { reason: String },

    /// A fenced append observed a head that moved since reconstruction.
    #[error("stale head: expected {expected} steps, ledger has {actual}")]
    StaleHead { expected: u64, actual: u64 },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal ledger fault: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Whether a retry might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Stable classification tag.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StaleHead { .. } => ErrorKind::State,
            _ => ErrorKind::Network,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unreachable_is_transient() {
        assert!(LedgerError::Unreachable {
            reason: "timeout".into()
        }
        .is_transient());
        assert!(!LedgerError::Unavailable { attempts: 3 }.is_transient());
        assert!(!LedgerError::InsufficientBalance.is_transient());
        assert!(!LedgerError::StaleHead {
            expected: 1,
            actual: 2
        }
        .is_transient());
    }

    #[test]
    fn stale_head_classifies_as_state() {
        assert_eq!(
            LedgerError::StaleHead {
                expected: 0,
                actual: 1
            }
            .kind(),
            ErrorKind::State
        );
        assert_eq!(
            LedgerError::Unavailable { attempts: 3 }.kind(),
            ErrorKind::Network
        );
    }
}
