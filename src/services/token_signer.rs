use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, Header};
use uuid::Uuid;

use crate::domain::{JwtKeyStore, Subject, TokenClaims, TokenType};
use crate::errors::AuthError;
use crate::services::token_service::ConfigType;

/// One freshly signed access + refresh pair, with the claims both tokens
/// were signed over (the coordinator needs the jtis and expiries to feed
/// the rotation ledger).
#[derive(Debug, Clone)]
pub struct SignedPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_claims: TokenClaims,
    pub refresh_claims: TokenClaims,
}

/// Builds and signs token pairs with the active HS256 key.
///
/// Every token gets a fresh UUID v4 jti, `iat = now` and
/// `exp = now + ttl` with the configured per-type TTL. The signed header
/// carries the active kid so validators can pick the right key after a
/// key roll.
#[derive(Clone)]
pub struct TokenSigner {
    cfg: ConfigType,
    keys: Arc<JwtKeyStore>,
}

impl TokenSigner {
    pub fn new(cfg: ConfigType, keys: Arc<JwtKeyStore>) -> Self {
        Self { cfg, keys }
    }

    pub async fn issue(&self, subject: &Subject) -> Result<SignedPair, AuthError> {
        self.issue_at(subject, Utc::now()).await
    }

    pub async fn issue_at(
        &self,
        subject: &Subject,
        now: DateTime<Utc>,
    ) -> Result<SignedPair, AuthError> {
        let (access_ttl, refresh_ttl) = {
            let config = self.cfg.read().await;
            (config.access_ttl_seconds(), config.refresh_ttl_seconds())
        };

        let access_claims = build_claims(subject, now, access_ttl, TokenType::Access);
        let refresh_claims = build_claims(subject, now, refresh_ttl, TokenType::Refresh);

        let access_token = self.sign(&access_claims)?;
        let refresh_token = self.sign(&refresh_claims)?;

        Ok(SignedPair {
            access_token,
            refresh_token,
            access_claims,
            refresh_claims,
        })
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        let (key, kid) = self.keys.signing_key_and_kid();
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(kid.to_string());

        encode(&header, claims, key).map_err(|e| {
            log::error!("token signing failed: {e}");
            AuthError::Internal
        })
    }
}

fn build_claims(
    subject: &Subject,
    now: DateTime<Utc>,
    ttl_seconds: i64,
    token_type: TokenType,
) -> TokenClaims {
    TokenClaims {
        sub: subject.as_ref().to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        jti: Uuid::new_v4().to_string(),
        token_type,
    }
}
