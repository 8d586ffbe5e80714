use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Ledger entry for one issued refresh token.
///
/// `family_id` ties together the lineage produced by successive rotations
/// from one original issuance; `access_jti` is the companion access token
/// issued alongside this refresh token, recorded so a family-wide
/// revocation can reach descendants of both kinds.
#[derive(Clone, Debug)]
pub struct RotationRecord {
    pub jti: Uuid,
    pub access_jti: Uuid,
    pub subject: String,
    pub family_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub access_expires_at: DateTime<Utc>,
    pub parent: Option<Uuid>,
    pub replaced_by: Option<Uuid>,
    pub rotated_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}
