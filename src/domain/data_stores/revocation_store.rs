use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::RevocationStoreErr;

/// Set of invalidated token ids, each kept until its natural expiry.
///
/// The store exclusively owns its records: other components only ever
/// `add` and `contains`. Implementations backed by external storage must
/// use bounded timeouts and surface `Unavailable` rather than hang.
#[async_trait::async_trait]
pub trait RevocationStore: Send + Sync {
    async fn add(
        &mut self,
        token_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationStoreErr>;

    async fn contains(&self, token_id: Uuid) -> Result<bool, RevocationStoreErr>;

    /// Drop records whose expiry has passed. Returns how many were purged.
    async fn purge_expired(&mut self, now: DateTime<Utc>) -> Result<usize, RevocationStoreErr>;
}
