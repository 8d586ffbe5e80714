use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::RotationRecord;

/// Why a rotation attempt was refused.
#[derive(Debug, PartialEq, Eq)]
pub enum RotationErr {
    /// No ledger entry for the presented jti (never issued here, or
    /// already purged past expiry).
    NotFound,
    /// Entry exists but its expiry has passed.
    Expired,
    /// The record or its whole family was revoked earlier.
    Revoked,
    /// The presented jti was already rotated: replay of a spent token.
    /// Carries the family so the caller can revoke the entire lineage.
    Reused { family_id: Uuid },
    Internal,
}

/// Server-side state machine behind refresh rotation.
///
/// Per refresh jti: `Active -> Rotated` on first use; presenting a
/// `Rotated` jti again is reuse, which the caller escalates to a
/// family-wide revocation (`Compromised`, terminal).
///
/// Callers serialize mutations behind a write lock; `rotate` is the
/// check-and-mark critical section and must never be split.
#[async_trait::async_trait]
pub trait RotationStore: Send + Sync {
    /// Register the first refresh token of a new family.
    async fn insert_initial(&mut self, record: RotationRecord) -> Result<(), RotationErr>;

    /// Atomically spend `presented_jti` and register its successor.
    /// Returns the spent record on success.
    async fn rotate(
        &mut self,
        presented_jti: Uuid,
        next: RotationRecord,
        now: DateTime<Utc>,
    ) -> Result<RotationRecord, RotationErr>;

    /// Look up the ledger entry for a refresh jti.
    async fn find(&self, jti: Uuid) -> Option<RotationRecord>;

    /// Mark every record in the family revoked. Returns the token ids
    /// (refresh and companion access) with their expiries, so the caller
    /// can feed them to the revocation store.
    async fn revoke_family(
        &mut self,
        family_id: Uuid,
        now: DateTime<Utc>,
    ) -> Vec<(Uuid, DateTime<Utc>)>;

    /// Drop records whose refresh expiry has passed. Returns the count.
    async fn purge_expired(&mut self, now: DateTime<Utc>) -> usize;
}
