use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{RevocationStore, RevocationStoreErr};

/// In-memory revocation set: token id -> natural expiry.
///
/// Entries are kept until purged; a token past its expiry fails the
/// expiry check before the revocation lookup anyway, so `contains` does
/// not consult the clock.
#[derive(Default)]
pub struct HashmapRevocationStore {
    revoked: HashMap<Uuid, DateTime<Utc>>,
}

#[async_trait::async_trait]
impl RevocationStore for HashmapRevocationStore {
    async fn add(
        &mut self,
        token_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationStoreErr> {
        self.revoked.insert(token_id, expires_at);
        Ok(())
    }

    async fn contains(&self, token_id: Uuid) -> Result<bool, RevocationStoreErr> {
        Ok(self.revoked.contains_key(&token_id))
    }

    async fn purge_expired(&mut self, now: DateTime<Utc>) -> Result<usize, RevocationStoreErr> {
        let before = self.revoked.len();
        self.revoked.retain(|_, expires_at| *expires_at > now);
        Ok(before - self.revoked.len())
    }
}
