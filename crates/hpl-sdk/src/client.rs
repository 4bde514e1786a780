use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use hpl_engine::{BatchProvenance, Catalog, ReconstructionEngine, RoleCache};
use hpl_gate as gate;
use hpl_gate::{GateError, TransferRequest};
use hpl_ledger::{AppendFence, EventPayload, LedgerError, LedgerReader, LedgerWriter};
use hpl_store::{MetadataStore, PayloadKind};
use hpl_types::{
    ActorId, Batch, BatchDetails, BatchDraft, BatchId, EventRef, MintLimits, ProvenanceRecord,
    Role,
};

use crate::error::{SdkError, SdkResult};

/// High-level client for the full provenance flow.
///
/// Every mutating operation follows the same shape: reconstruct the
/// current record from the ledger, run the pure gate against it, and
/// append the authorized step with a fence carrying the step count the
/// decision assumed. When the fence trips (another client committed
/// first), the client re-reconstructs and retries exactly once before
/// surfacing [`SdkError::Conflict`].
pub struct ProvenanceClient<L, S> {
    ledger: Arc<L>,
    store: Arc<S>,
    engine: ReconstructionEngine<Arc<L>, Arc<S>>,
    roles: RoleCache<Arc<L>>,
    limits: MintLimits,
}

impl<L, S> ProvenanceClient<L, S>
where
    L: LedgerReader + LedgerWriter,
    S: MetadataStore,
{
    pub fn new(ledger: L, store: S) -> Self {
        Self::from_shared(Arc::new(ledger), Arc::new(store), MintLimits::default())
    }

    pub fn with_limits(ledger: L, store: S, limits: MintLimits) -> Self {
        Self::from_shared(Arc::new(ledger), Arc::new(store), limits)
    }

    /// Build from shared handles, for embedders that keep their own.
    pub fn from_shared(ledger: Arc<L>, store: Arc<S>, limits: MintLimits) -> Self {
        Self {
            engine: ReconstructionEngine::new(Arc::clone(&ledger), Arc::clone(&store)),
            roles: RoleCache::new(Arc::clone(&ledger)),
            ledger,
            store,
            limits,
        }
    }

    pub fn limits(&self) -> &MintLimits {
        &self.limits
    }

    // -----------------------------------------------------------------------
    // Minting
    // -----------------------------------------------------------------------

    /// Validate a draft, upload its metadata document, and append the mint
    /// event. The returned batch's core fields are immutable from here on.
    pub async fn mint_batch(
        &self,
        draft: BatchDraft,
        details: &BatchDetails,
        minter: &ActorId,
    ) -> SdkResult<Batch> {
        draft.validate(&self.limits)?;

        let bytes = details.to_json_bytes()?;
        let metadata_ref = self.store.upload(&bytes, PayloadKind::Json).await?;
        let batch = draft.into_batch(BatchId::new(), metadata_ref);

        self.ledger
            .append(
                EventPayload::BatchMinted {
                    batch: batch.clone(),
                    minter: minter.clone(),
                },
                None,
            )
            .await?;

        info!(batch_id = %batch.id, minter = %minter, crop = %batch.crop_type, "batch minted");
        Ok(batch)
    }

    // -----------------------------------------------------------------------
    // Roles
    // -----------------------------------------------------------------------

    /// Record a role grant on the ledger.
    ///
    /// Producer/Carrier/Purchaser may be self-registered; granting them to
    /// someone else takes an admin. The admin role itself requires an
    /// existing admin, except the bootstrap grant into an empty directory.
    pub async fn grant_role(
        &self,
        actor: &ActorId,
        role: Role,
        granted_by: &ActorId,
    ) -> SdkResult<EventRef> {
        // Privileged decision: resynchronize from the ledger first.
        self.roles.refresh().await?;
        let granter_is_admin = self.roles.role_of(granted_by).await? == Some(Role::Admin);

        if role == Role::Admin {
            if !granter_is_admin && self.roles.any_admin().await? {
                return Err(SdkError::AdminRequired);
            }
        } else if actor != granted_by && !granter_is_admin {
            return Err(SdkError::RoleAdministration {
                actor: granted_by.clone(),
                subject: actor.clone(),
            });
        }

        let event_ref = self
            .ledger
            .append(
                EventPayload::RoleGranted {
                    actor: actor.clone(),
                    role,
                    granted_by: granted_by.clone(),
                },
                None,
            )
            .await?;
        self.roles.invalidate();
        debug!(actor = %actor, role = %role, "role granted");
        Ok(event_ref)
    }

    /// Record a role revocation. Admin-only.
    pub async fn revoke_role(
        &self,
        actor: &ActorId,
        role: Role,
        revoked_by: &ActorId,
    ) -> SdkResult<EventRef> {
        self.roles.refresh().await?;
        if self.roles.role_of(revoked_by).await? != Some(Role::Admin) {
            return Err(SdkError::RoleAdministration {
                actor: revoked_by.clone(),
                subject: actor.clone(),
            });
        }

        let event_ref = self
            .ledger
            .append(
                EventPayload::RoleRevoked {
                    actor: actor.clone(),
                    role,
                    revoked_by: revoked_by.clone(),
                },
                None,
            )
            .await?;
        self.roles.invalidate();
        Ok(event_ref)
    }

    /// The actor's current role, resynchronizing once on a miss.
    pub async fn role_of(&self, actor: &ActorId) -> SdkResult<Option<Role>> {
        if let Some(role) = self.roles.role_of(actor).await? {
            return Ok(Some(role));
        }
        self.roles.refresh().await?;
        Ok(self.roles.role_of(actor).await?)
    }

    async fn require_role(&self, actor: &ActorId) -> SdkResult<Role> {
        self.role_of(actor)
            .await?
            .ok_or_else(|| SdkError::UnknownRole(actor.clone()))
    }

    // -----------------------------------------------------------------------
    // Lifecycle operations
    // -----------------------------------------------------------------------

    /// Append the first provenance step for a freshly minted batch.
    pub async fn initialize(
        &self,
        batch_id: BatchId,
        caller: &ActorId,
        location: impl Into<String>,
        notes: impl Into<String>,
    ) -> SdkResult<EventRef> {
        let location = location.into();
        let notes = notes.into();

        for attempt in 0..2u8 {
            let (batch, minter) = self.engine.minted_batch(batch_id).await?;
            let existing = self.engine.current_record(batch_id).await?;
            let draft = gate::initialize(
                &batch,
                &minter,
                caller,
                existing.as_ref(),
                location.clone(),
                notes.clone(),
                Utc::now(),
            )?;

            let fence = AppendFence {
                batch_id,
                expected_total_steps: 0,
            };
            match self
                .ledger
                .append(EventPayload::StepRecorded { draft }, Some(fence))
                .await
            {
                Ok(event_ref) => {
                    info!(batch_id = %batch_id, producer = %caller, "provenance initialized");
                    return Ok(event_ref);
                }
                Err(LedgerError::StaleHead { .. }) if attempt == 0 => {
                    warn!(batch_id = %batch_id, "initialization raced; re-reconstructing");
                }
                Err(LedgerError::StaleHead { .. }) => return Err(SdkError::Conflict(batch_id)),
                Err(e) => return Err(e.into()),
            }
        }

        Err(SdkError::Conflict(batch_id))
    }

    /// Execute an ownership transfer on behalf of `caller`.
    pub async fn transfer(
        &self,
        request: TransferRequest,
        caller: &ActorId,
    ) -> SdkResult<EventRef> {
        for attempt in 0..2u8 {
            let record = self
                .engine
                .current_record(request.batch_id)
                .await?
                .ok_or(GateError::NotInitialized(request.batch_id))?;

            let caller_role = self.require_role(caller).await?;
            let sender_role = self.require_role(&request.from).await?;
            let recipient_role = self.require_role(&request.to).await?;

            let draft = gate::authorize_transfer(
                &record,
                &request,
                caller,
                caller_role,
                sender_role,
                recipient_role,
            )?;

            let fence = AppendFence {
                batch_id: request.batch_id,
                expected_total_steps: record.total_steps,
            };
            match self
                .ledger
                .append(EventPayload::StepRecorded { draft }, Some(fence))
                .await
            {
                Ok(event_ref) => {
                    info!(
                        batch_id = %request.batch_id,
                        from = %request.from,
                        to = %request.to,
                        state = %request.requested_state,
                        "transfer committed"
                    );
                    return Ok(event_ref);
                }
                Err(LedgerError::StaleHead { .. }) if attempt == 0 => {
                    warn!(batch_id = %request.batch_id,
                        "fenced append conflicted; re-reconstructing once");
                }
                Err(LedgerError::StaleHead { .. }) => {
                    return Err(SdkError::Conflict(request.batch_id))
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(SdkError::Conflict(request.batch_id))
    }

    /// Record terminal consumption by the current owner.
    pub async fn mark_consumed(
        &self,
        batch_id: BatchId,
        actor: &ActorId,
        location: impl Into<String>,
        notes: impl Into<String>,
    ) -> SdkResult<EventRef> {
        let location = location.into();
        let notes = notes.into();

        for attempt in 0..2u8 {
            let record = self
                .engine
                .current_record(batch_id)
                .await?
                .ok_or(GateError::NotInitialized(batch_id))?;

            let draft =
                gate::mark_consumed(&record, actor, location.clone(), notes.clone(), Utc::now())?;

            let fence = AppendFence {
                batch_id,
                expected_total_steps: record.total_steps,
            };
            match self
                .ledger
                .append(EventPayload::StepRecorded { draft }, Some(fence))
                .await
            {
                Ok(event_ref) => {
                    info!(batch_id = %batch_id, owner = %actor, "batch consumed");
                    return Ok(event_ref);
                }
                Err(LedgerError::StaleHead { .. }) if attempt == 0 => {
                    warn!(batch_id = %batch_id, "consumption raced; re-reconstructing once");
                }
                Err(LedgerError::StaleHead { .. }) => return Err(SdkError::Conflict(batch_id)),
                Err(e) => return Err(e.into()),
            }
        }

        Err(SdkError::Conflict(batch_id))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Full reconstructed provenance for one batch.
    pub async fn provenance(&self, batch_id: BatchId) -> SdkResult<BatchProvenance> {
        Ok(self.engine.provenance(batch_id).await?)
    }

    /// Current record, or `None` for a minted-but-uninitialized batch.
    pub async fn current_record(
        &self,
        batch_id: BatchId,
    ) -> SdkResult<Option<ProvenanceRecord>> {
        Ok(self.engine.current_record(batch_id).await?)
    }

    /// The full batch catalog, degraded entries included.
    pub async fn catalog(&self) -> SdkResult<Catalog> {
        Ok(self.engine.catalog().await?)
    }

    /// Every batch the actor has minted or stepped.
    pub async fn batches_of(&self, actor: &ActorId) -> SdkResult<Vec<BatchId>> {
        Ok(self.engine.batches_touched_by(actor).await?)
    }
}
