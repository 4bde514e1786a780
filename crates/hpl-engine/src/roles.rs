use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use hpl_ledger::{EventFilter, EventPayload, LedgerReader};
use hpl_types::{ActorId, Role};

use crate::error::EngineError;

/// Local projection of role-grant events.
///
/// Two-tier by design: the ledger's `RoleGranted`/`RoleRevoked` events are
/// the authoritative source, and this cache is only a fast local copy for
/// UX. It is NEVER a security boundary — the gate receives roles as
/// explicit arguments, and callers making privileged decisions should
/// `refresh()` first. An actor holds at most one role; a later grant
/// replaces the earlier one.
pub struct RoleCache<R> {
    reader: R,
    projection: RwLock<Option<HashMap<ActorId, Role>>>,
}

impl<R: LedgerReader> RoleCache<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            projection: RwLock::new(None),
        }
    }

    /// The actor's role per the local projection, synchronizing from the
    /// ledger on first use or after `invalidate()`.
    pub async fn role_of(&self, actor: &ActorId) -> Result<Option<Role>, EngineError> {
        if !self.is_synced() {
            self.refresh().await?;
        }

        let projection = self
            .projection
            .read()
            .map_err(|_| EngineError::Ledger(poisoned()))?;
        Ok(projection.as_ref().and_then(|map| map.get(actor).copied()))
    }

    /// Whether any actor currently holds the admin role.
    pub async fn any_admin(&self) -> Result<bool, EngineError> {
        if !self.is_synced() {
            self.refresh().await?;
        }

        let projection = self
            .projection
            .read()
            .map_err(|_| EngineError::Ledger(poisoned()))?;
        Ok(projection
            .as_ref()
            .is_some_and(|map| map.values().any(|r| *r == Role::Admin)))
    }

    /// Re-derive the projection from the full role-event history.
    pub async fn refresh(&self) -> Result<(), EngineError> {
        let mut events = self.reader.scan(&EventFilter::all()).await?;
        events.sort_by_key(|e| e.seq);

        let mut map = HashMap::new();
        for event in events {
            match event.payload {
                EventPayload::RoleGranted { actor, role, .. } => {
                    map.insert(actor, role);
                }
                EventPayload::RoleRevoked { actor, role, .. } => {
                    // Only the currently held role can be revoked.
                    if map.get(&actor) == Some(&role) {
                        map.remove(&actor);
                    }
                }
                _ => {}
            }
        }

        debug!(actors = map.len(), "role projection refreshed");
        let mut projection = self
            .projection
            .write()
            .map_err(|_| EngineError::Ledger(poisoned()))?;
        *projection = Some(map);
        Ok(())
    }

    /// Drop the projection; the next read resynchronizes.
    pub fn invalidate(&self) {
        if let Ok(mut projection) = self.projection.write() {
            *projection = None;
        }
    }

    fn is_synced(&self) -> bool {
        self.projection
            .read()
            .map(|p| p.is_some())
            .unwrap_or(false)
    }
}

fn poisoned() -> hpl_ledger::LedgerError {
    hpl_ledger::LedgerError::Internal("role projection lock poisoned".into())
}
