use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::ContentRef;
use crate::error::{TypeError, ValidationError};

/// Unique batch identifier, assigned once at mint time.
///
/// UUID v7 gives mint-time ordering and collision-free assignment without
/// coordinating through the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchId(Uuid);

impl BatchId {
    /// Allocate a fresh id for a batch being minted.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse from the canonical hyphenated form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidBatchId(e.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Abbreviated form for logs (first 8 hex characters).
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.short())
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounds applied to mint-time input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MintLimits {
    /// Inclusive upper bound on batch quantity.
    pub max_quantity: u32,
    /// Maximum length of free-text notes, in bytes.
    pub max_notes_len: usize,
}

impl Default for MintLimits {
    fn default() -> Self {
        Self {
            max_quantity: 1_000_000,
            max_notes_len: 1024,
        }
    }
}

/// Mint-time input for a new batch, validated before any event is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchDraft {
    pub crop_type: String,
    pub quantity: u32,
    pub origin_farm: String,
    pub harvest_date: DateTime<Utc>,
    pub notes: String,
}

impl BatchDraft {
    /// Check the draft against mint limits.
    ///
    /// Deterministic rejection: a failed draft is never retried.
    pub fn validate(&self, limits: &MintLimits) -> Result<(), ValidationError> {
        if self.crop_type.trim().is_empty() {
            return Err(ValidationError::EmptyCropType);
        }
        if self.origin_farm.trim().is_empty() {
            return Err(ValidationError::EmptyOriginFarm);
        }
        if self.quantity == 0 || self.quantity > limits.max_quantity {
            return Err(ValidationError::QuantityOutOfRange {
                quantity: self.quantity,
                max: limits.max_quantity,
            });
        }
        if self.harvest_date > Utc::now() {
            return Err(ValidationError::FutureHarvestDate(self.harvest_date));
        }
        if self.notes.len() > limits.max_notes_len {
            return Err(ValidationError::NotesTooLong {
                len: self.notes.len(),
                max: limits.max_notes_len,
            });
        }
        Ok(())
    }

    /// Seal a validated draft into an immutable batch.
    pub fn into_batch(self, id: BatchId, metadata_ref: ContentRef) -> Batch {
        Batch {
            id,
            crop_type: self.crop_type,
            quantity: self.quantity,
            origin_farm: self.origin_farm,
            harvest_date: self.harvest_date,
            notes: self.notes,
            metadata_ref,
        }
    }
}

/// The tracked physical-goods entity.
///
/// Core fields are fixed at mint; only ownership and lifecycle state evolve,
/// and those live in the provenance event stream, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub crop_type: String,
    pub quantity: u32,
    pub origin_farm: String,
    pub harvest_date: DateTime<Utc>,
    pub notes: String,
    /// Content hash of the descriptive metadata document.
    pub metadata_ref: ContentRef,
}
