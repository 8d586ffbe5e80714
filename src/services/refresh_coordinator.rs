use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    IssuedTokens, RotationErr, RotationRecord, Subject, TokenClaims, TokenType,
};
use crate::errors::AuthError;
use crate::services::token_service::{RevocationStoreType, RotationStoreType};
use crate::services::{SignedPair, TokenSigner, TokenValidator};

/// Owns issuance and rotation of refresh token families.
///
/// Rotation runs its check-and-mark sequence under the ledger write lock
/// and updates the revocation store before releasing it, so two racing
/// refreshes of the same jti serialize: one rotates, the other hits the
/// rotated flag and triggers the reuse response.
#[derive(Clone)]
pub struct RefreshCoordinator {
    signer: TokenSigner,
    validator: TokenValidator,
    rotations: RotationStoreType,
    revocations: RevocationStoreType,
}

impl RefreshCoordinator {
    pub fn new(
        signer: TokenSigner,
        validator: TokenValidator,
        rotations: RotationStoreType,
        revocations: RevocationStoreType,
    ) -> Self {
        Self {
            signer,
            validator,
            rotations,
            revocations,
        }
    }

    /// Issue the first pair of a brand-new token family.
    pub async fn issue_initial(&self, subject: &Subject) -> Result<IssuedTokens, AuthError> {
        let now = Utc::now();
        let pair = self.signer.issue_at(subject, now).await?;
        let family_id = Uuid::new_v4();
        let record = ledger_record(&pair, subject, family_id, None, now)?;

        {
            let mut ledger = self.rotations.write().await;
            ledger.insert_initial(record).await.map_err(|e| {
                log::error!("rotation ledger rejected initial record: {e:?}");
                AuthError::Internal
            })?;
        }

        Ok(IssuedTokens {
            subject: subject.as_ref().to_string(),
            family_id,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    pub async fn refresh(&self, presented: &str) -> Result<IssuedTokens, AuthError> {
        self.refresh_at(presented, Utc::now()).await
    }

    /// Exchange a valid refresh token for a new pair, spending it.
    ///
    /// A second presentation of the same token fails with `ReuseDetected`
    /// and revokes the whole family, descendants included, before the
    /// error is returned.
    pub async fn refresh_at(
        &self,
        presented: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedTokens, AuthError> {
        let claims = self.validator.decode_verified(presented, now)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::WrongTokenType);
        }
        let presented_jti = Uuid::parse_str(&claims.jti).map_err(|_| AuthError::Malformed)?;
        let subject =
            Subject::parse(claims.sub.clone()).map_err(|_| AuthError::Malformed)?;

        // Sign the successor pair before taking the lock; on any failure
        // below it is dropped unregistered and never reaches a caller.
        let pair = self.signer.issue_at(&subject, now).await?;

        let mut ledger = self.rotations.write().await;

        let old = match ledger.find(presented_jti).await {
            Some(r) => r,
            None => {
                // Validly signed but absent from the ledger: treat like a
                // revoked token rather than leaking ledger state.
                log::warn!("refresh token {presented_jti} has no ledger record");
                return Err(AuthError::Revoked);
            }
        };

        let next = ledger_record(&pair, &subject, old.family_id, Some(presented_jti), now)?;

        match ledger.rotate(presented_jti, next, now).await {
            Ok(spent) => {
                let mut revocations = self.revocations.write().await;
                revocations.add(spent.jti, spent.expires_at).await?;

                Ok(IssuedTokens {
                    subject: subject.as_ref().to_string(),
                    family_id: old.family_id,
                    access_token: pair.access_token,
                    refresh_token: pair.refresh_token,
                })
            }
            Err(RotationErr::Reused { family_id }) => {
                log::warn!(
                    "refresh token reuse detected for subject {}; revoking family {family_id}",
                    subject.as_ref()
                );
                let revoked = ledger.revoke_family(family_id, now).await;
                let mut revocations = self.revocations.write().await;
                for (token_id, expires_at) in revoked {
                    revocations.add(token_id, expires_at).await?;
                }
                Err(AuthError::ReuseDetected)
            }
            Err(RotationErr::Revoked) => Err(AuthError::Revoked),
            Err(RotationErr::Expired) => Err(AuthError::Expired),
            Err(RotationErr::NotFound) => Err(AuthError::Revoked),
            Err(RotationErr::Internal) => Err(AuthError::Internal),
        }
    }

    /// Explicit revocation (logout): an access token loses its own jti,
    /// a refresh token takes its entire family down.
    pub async fn revoke(&self, claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), AuthError> {
        let jti = Uuid::parse_str(&claims.jti).map_err(|_| AuthError::Malformed)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(AuthError::Malformed)?;

        match claims.token_type {
            TokenType::Access => {
                let mut revocations = self.revocations.write().await;
                revocations.add(jti, expires_at).await?;
            }
            TokenType::Refresh => {
                let mut ledger = self.rotations.write().await;
                match ledger.find(jti).await {
                    Some(record) => {
                        let revoked = ledger.revoke_family(record.family_id, now).await;
                        let mut revocations = self.revocations.write().await;
                        for (token_id, token_exp) in revoked {
                            revocations.add(token_id, token_exp).await?;
                        }
                    }
                    None => {
                        let mut revocations = self.revocations.write().await;
                        revocations.add(jti, expires_at).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Lazy garbage collection for both stores.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AuthError> {
        let from_ledger = {
            let mut ledger = self.rotations.write().await;
            ledger.purge_expired(now).await
        };
        let from_revocations = {
            let mut revocations = self.revocations.write().await;
            revocations.purge_expired(now).await?
        };
        Ok(from_ledger + from_revocations)
    }
}

fn ledger_record(
    pair: &SignedPair,
    subject: &Subject,
    family_id: Uuid,
    parent: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<RotationRecord, AuthError> {
    let jti = Uuid::parse_str(&pair.refresh_claims.jti).map_err(|_| AuthError::Internal)?;
    let access_jti = Uuid::parse_str(&pair.access_claims.jti).map_err(|_| AuthError::Internal)?;
    let expires_at =
        DateTime::<Utc>::from_timestamp(pair.refresh_claims.exp, 0).ok_or(AuthError::Internal)?;
    let access_expires_at =
        DateTime::<Utc>::from_timestamp(pair.access_claims.exp, 0).ok_or(AuthError::Internal)?;

    Ok(RotationRecord {
        jti,
        access_jti,
        subject: subject.as_ref().to_string(),
        family_id,
        issued_at: now,
        expires_at,
        access_expires_at,
        parent,
        replaced_by: None,
        rotated_at: None,
        revoked_at: None,
    })
}
