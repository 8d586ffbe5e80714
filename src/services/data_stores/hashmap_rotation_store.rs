use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{RotationErr, RotationRecord, RotationStore};

/// In-memory rotation ledger.
#[derive(Default)]
pub struct HashmapRotationStore {
    // refresh jti -> record
    by_jti: HashMap<Uuid, RotationRecord>,
    // quick check for compromised/terminated families
    revoked_families: HashSet<Uuid>,
}

#[async_trait::async_trait]
impl RotationStore for HashmapRotationStore {
    async fn insert_initial(&mut self, record: RotationRecord) -> Result<(), RotationErr> {
        if self.by_jti.contains_key(&record.jti) {
            return Err(RotationErr::Internal);
        }
        self.by_jti.insert(record.jti, record);
        Ok(())
    }

    async fn rotate(
        &mut self,
        presented_jti: Uuid,
        next: RotationRecord,
        now: DateTime<Utc>,
    ) -> Result<RotationRecord, RotationErr> {
        let old = match self.by_jti.get(&presented_jti) {
            Some(r) => r.clone(),
            None => return Err(RotationErr::NotFound),
        };

        if old.expires_at <= now {
            return Err(RotationErr::Expired);
        }
        if old.revoked_at.is_some() || self.revoked_families.contains(&old.family_id) {
            return Err(RotationErr::Revoked);
        }
        if old.rotated_at.is_some() || old.replaced_by.is_some() {
            // Reuse: someone presented an already-rotated refresh token.
            return Err(RotationErr::Reused {
                family_id: old.family_id,
            });
        }
        if next.family_id != old.family_id || next.parent != Some(presented_jti) {
            return Err(RotationErr::Internal);
        }

        let spent = {
            let entry = self
                .by_jti
                .get_mut(&presented_jti)
                .ok_or(RotationErr::Internal)?;
            entry.rotated_at = Some(now);
            entry.replaced_by = Some(next.jti);
            entry.clone()
        };

        self.by_jti.insert(next.jti, next);
        Ok(spent)
    }

    async fn find(&self, jti: Uuid) -> Option<RotationRecord> {
        self.by_jti.get(&jti).cloned()
    }

    async fn revoke_family(
        &mut self,
        family_id: Uuid,
        now: DateTime<Utc>,
    ) -> Vec<(Uuid, DateTime<Utc>)> {
        self.revoked_families.insert(family_id);

        let mut revoked = Vec::new();
        for r in self.by_jti.values_mut() {
            if r.family_id != family_id {
                continue;
            }
            if r.revoked_at.is_none() {
                r.revoked_at = Some(now);
            }
            revoked.push((r.jti, r.expires_at));
            revoked.push((r.access_jti, r.access_expires_at));
        }
        revoked
    }

    async fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.by_jti.len();
        self.by_jti.retain(|_, r| r.expires_at > now);

        // A family id is only worth remembering while an unexpired record
        // of that family could still be presented.
        let live_families: HashSet<Uuid> =
            self.by_jti.values().map(|r| r.family_id).collect();
        self.revoked_families
            .retain(|family_id| live_families.contains(family_id));

        before - self.by_jti.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(family_id: Uuid, parent: Option<Uuid>, now: DateTime<Utc>) -> RotationRecord {
        RotationRecord {
            jti: Uuid::new_v4(),
            access_jti: Uuid::new_v4(),
            subject: "alice".to_string(),
            family_id,
            issued_at: now,
            expires_at: now + Duration::days(7),
            access_expires_at: now + Duration::minutes(15),
            parent,
            replaced_by: None,
            rotated_at: None,
            revoked_at: None,
        }
    }

    #[tokio::test]
    async fn rotate_marks_old_and_registers_successor() {
        let mut store = HashmapRotationStore::default();
        let now = Utc::now();
        let family = Uuid::new_v4();
        let first = record(family, None, now);
        let first_jti = first.jti;
        store.insert_initial(first).await.unwrap();

        let next = record(family, Some(first_jti), now);
        let next_jti = next.jti;
        let spent = store.rotate(first_jti, next, now).await.unwrap();
        assert_eq!(spent.replaced_by, Some(next_jti));
        assert!(spent.rotated_at.is_some());
        assert!(store.find(next_jti).await.is_some());
    }

    #[tokio::test]
    async fn second_rotation_of_same_jti_reports_reuse() {
        let mut store = HashmapRotationStore::default();
        let now = Utc::now();
        let family = Uuid::new_v4();
        let first = record(family, None, now);
        let first_jti = first.jti;
        store.insert_initial(first).await.unwrap();

        store
            .rotate(first_jti, record(family, Some(first_jti), now), now)
            .await
            .unwrap();
        let err = store
            .rotate(first_jti, record(family, Some(first_jti), now), now)
            .await
            .unwrap_err();
        assert_eq!(err, RotationErr::Reused { family_id: family });
    }

    #[tokio::test]
    async fn revoke_family_reaches_refresh_and_access_ids() {
        let mut store = HashmapRotationStore::default();
        let now = Utc::now();
        let family = Uuid::new_v4();
        let first = record(family, None, now);
        let first_jti = first.jti;
        let first_access = first.access_jti;
        store.insert_initial(first).await.unwrap();
        let next = record(family, Some(first_jti), now);
        let next_jti = next.jti;
        store.rotate(first_jti, next, now).await.unwrap();

        let revoked = store.revoke_family(family, now).await;
        let ids: Vec<Uuid> = revoked.iter().map(|(id, _)| *id).collect();
        assert!(ids.contains(&first_jti));
        assert!(ids.contains(&first_access));
        assert!(ids.contains(&next_jti));
        assert_eq!(revoked.len(), 4);

        let err = store
            .rotate(next_jti, record(family, Some(next_jti), now), now)
            .await
            .unwrap_err();
        assert_eq!(err, RotationErr::Revoked);
    }

    #[tokio::test]
    async fn purge_forgets_revoked_families_with_no_live_records() {
        let mut store = HashmapRotationStore::default();
        let now = Utc::now();

        let dead_family = Uuid::new_v4();
        let mut dead = record(dead_family, None, now);
        dead.expires_at = now + Duration::minutes(1);
        store.insert_initial(dead).await.unwrap();
        store.revoke_family(dead_family, now).await;

        let live_family = Uuid::new_v4();
        let live = record(live_family, None, now);
        store.insert_initial(live).await.unwrap();
        store.revoke_family(live_family, now).await;

        assert_eq!(store.revoked_families.len(), 2);

        // Once the dead family's last record passes its refresh expiry,
        // the family id goes with it; the live family stays marked.
        store.purge_expired(now + Duration::minutes(2)).await;
        assert!(!store.revoked_families.contains(&dead_family));
        assert!(store.revoked_families.contains(&live_family));
    }

    #[tokio::test]
    async fn expired_record_cannot_rotate_and_gets_purged() {
        let mut store = HashmapRotationStore::default();
        let now = Utc::now();
        let family = Uuid::new_v4();
        let mut stale = record(family, None, now);
        stale.expires_at = now;
        let stale_jti = stale.jti;
        store.insert_initial(stale).await.unwrap();

        let err = store
            .rotate(stale_jti, record(family, Some(stale_jti), now), now)
            .await
            .unwrap_err();
        assert_eq!(err, RotationErr::Expired);

        assert_eq!(store.purge_expired(now).await, 1);
        assert!(store.find(stale_jti).await.is_none());
    }
}
