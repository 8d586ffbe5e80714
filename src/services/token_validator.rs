use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use uuid::Uuid;

use crate::domain::{JwtKeyStore, TokenClaims};
use crate::errors::AuthError;
use crate::services::token_service::RevocationStoreType;

/// Verifies presented tokens: structure, signature, expiry, revocation.
///
/// Checks run in that order and the first failure wins, so a tampered
/// token reports `BadSignature` even if it is also expired. Expiry is
/// checked here rather than by `jsonwebtoken` so the boundary is exact:
/// a token whose `exp` equals the validation instant is already expired.
#[derive(Clone)]
pub struct TokenValidator {
    keys: Arc<JwtKeyStore>,
    revocations: RevocationStoreType,
}

impl TokenValidator {
    pub fn new(keys: Arc<JwtKeyStore>, revocations: RevocationStoreType) -> Self {
        Self { keys, revocations }
    }

    pub async fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.validate_at(token, Utc::now()).await
    }

    /// Full validation against an explicit clock instant. No side effects
    /// beyond the revocation lookup.
    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, AuthError> {
        let claims = self.decode_verified(token, now)?;
        let jti = Uuid::parse_str(&claims.jti).map_err(|_| AuthError::Malformed)?;

        let revoked = {
            let store = self.revocations.read().await;
            store.contains(jti).await?
        };
        if revoked {
            return Err(AuthError::Revoked);
        }

        Ok(claims)
    }

    /// Structure + signature + expiry, without the revocation lookup.
    ///
    /// The refresh flow uses this and judges revocation through the
    /// rotation ledger instead, so replaying a rotated token reports
    /// `ReuseDetected` rather than being shadowed by the jti's own
    /// revocation entry.
    pub(crate) fn decode_verified(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::Malformed)?;
        if header.alg != Algorithm::HS256 {
            return Err(AuthError::BadSignature);
        }

        let key = self
            .keys
            .verifying_key_for_kid(header.kid.as_deref())
            .ok_or(AuthError::BadSignature)?;

        let mut validation = Validation::new(Algorithm::HS256);
        // exp presence stays required; the timestamp itself is compared
        // below for the exact boundary.
        validation.validate_exp = false;

        // The MAC is checked over the raw header.payload bytes before the
        // payload segment is decoded, so any payload corruption reports
        // `BadSignature`; the `Malformed` arm covers undecodable header or
        // signature segments and bad claim structure.
        let data = decode::<TokenClaims>(token, key, &validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::BadSignature,
            _ => AuthError::Malformed,
        })?;

        if data.claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(data.claims)
    }
}
