use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable classification tag carried by every HPL error.
///
/// Presentation layers branch on the kind to choose wording; the core never
/// renders user-facing text itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed input rejected before any network call.
    Validation,
    /// The acting party is not entitled to the operation.
    Authorization,
    /// The operation is illegal in the entity's current lifecycle state.
    State,
    /// A ledger or storage-network failure.
    Network,
    /// The operation completed with some items degraded.
    Partial,
}

impl ErrorKind {
    /// The stable string tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::State => "state",
            Self::Network => "network",
            Self::Partial => "partial",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by parsing and encoding the foundation types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid actor identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid event reference: {0}")]
    InvalidEventRef(String),

    #[error("invalid content reference: {0}")]
    InvalidContentRef(String),

    #[error("invalid batch id: {0}")]
    InvalidBatchId(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Deterministic input rejections, surfaced immediately and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("quantity {quantity} out of range (1..={max})")]
    QuantityOutOfRange { quantity: u32, max: u32 },

    #[error("harvest date {0} is in the future")]
    FutureHarvestDate(DateTime<Utc>),

    #[error("crop type must not be empty")]
    EmptyCropType,

    #[error("origin farm must not be empty")]
    EmptyOriginFarm,

    #[error("notes too long: {len} exceeds maximum of {max}")]
    NotesTooLong { len: usize, max: usize },

    #[error("malformed identifier: {0}")]
    Identifier(#[from] TypeError),
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(ErrorKind::Validation.as_str(), "validation");
        assert_eq!(ErrorKind::Authorization.as_str(), "authorization");
        assert_eq!(ErrorKind::State.as_str(), "state");
        assert_eq!(ErrorKind::Network.as_str(), "network");
        assert_eq!(ErrorKind::Partial.as_str(), "partial");
    }

    #[test]
    fn validation_errors_classify_as_validation() {
        let err = ValidationError::EmptyCropType;
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: ValidationError =
            TypeError::InvalidIdentity("bad".into()).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
