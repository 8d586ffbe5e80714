//! Token issuance and verification facade.
//!
//! `TokenService` wires the components together and exposes the public
//! surface:
//! - `issue`: credentials in, access + refresh pair out
//! - `validate` / `validate_at`: signature, expiry and revocation checks
//! - `refresh`: rotation with reuse detection and family revocation
//! - `revoke`: explicit invalidation (logout)
//! - `purge_expired`: lazy garbage collection of both stores
//!
//! Security model:
//! 1. Each rotation produces a new refresh token and marks the previous
//!    one as rotated; the spent jti enters the revocation store.
//! 2. Presenting an already-rotated refresh token is treated as replay of
//!    a stolen token: the entire family is revoked and the call fails
//!    with `ReuseDetected`.
//! 3. Access tokens are short-lived and die early when their family is
//!    revoked (their jtis are recorded in the rotation ledger).
//!
//! Concurrency:
//! - Mutable state sits behind async `RwLock`s; the coordinator holds the
//!   ledger write lock for the whole check-and-rotate critical section,
//!   so concurrent refreshes of one token cannot both succeed.
//!
//! Extensibility:
//! - All three stores are trait objects supplied at construction, so an
//!   external-cache implementation drops in without touching the flows.
//! - Key material and TTLs come from the injected `Config`; verification
//!   accepts every configured key by kid, enabling key rolls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{
    CredentialStore, IssuedTokens, JwtKeyStore, RevocationStore, RotationStore, TokenClaims,
};
use crate::errors::AuthError;
use crate::services::{CredentialVerifier, RefreshCoordinator, TokenSigner, TokenValidator};
use crate::utils::Config;

pub type ConfigType = Arc<RwLock<Config>>;
pub type CredentialStoreType = Arc<RwLock<Box<dyn CredentialStore>>>;
pub type RevocationStoreType = Arc<RwLock<Box<dyn RevocationStore>>>;
pub type RotationStoreType = Arc<RwLock<Box<dyn RotationStore>>>;

#[derive(Clone)]
pub struct TokenService {
    verifier: CredentialVerifier,
    validator: TokenValidator,
    coordinator: RefreshCoordinator,
}

impl TokenService {
    /// Construct the service from configuration and store implementations.
    ///
    /// `Config` has already validated key material, so building the key
    /// store here cannot fail.
    pub async fn new(
        cfg: ConfigType,
        credentials: Box<dyn CredentialStore>,
        rotations: Box<dyn RotationStore>,
        revocations: Box<dyn RevocationStore>,
    ) -> Self {
        let (keys, hash_key) = {
            let config = cfg.read().await;
            (
                Arc::new(JwtKeyStore::from_config(
                    config.jwt_keys(),
                    config.jwt_active_kid(),
                )),
                *config.credential_hash_key(),
            )
        };

        let credentials: CredentialStoreType = Arc::new(RwLock::new(credentials));
        let rotations: RotationStoreType = Arc::new(RwLock::new(rotations));
        let revocations: RevocationStoreType = Arc::new(RwLock::new(revocations));

        let verifier = CredentialVerifier::new(credentials, hash_key);
        let signer = TokenSigner::new(cfg, Arc::clone(&keys));
        let validator = TokenValidator::new(keys, Arc::clone(&revocations));
        let coordinator =
            RefreshCoordinator::new(signer, validator.clone(), rotations, revocations);

        Self {
            verifier,
            validator,
            coordinator,
        }
    }

    /// Verify credentials and issue the initial pair of a new family.
    pub async fn issue(&self, subject_id: &str, secret: &str) -> Result<IssuedTokens, AuthError> {
        let subject = self.verifier.verify(subject_id, secret).await?;
        self.coordinator.issue_initial(&subject).await
    }

    pub async fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.validator.validate(token).await
    }

    /// Validation against an explicit instant; `exp <= now` is expired.
    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, AuthError> {
        self.validator.validate_at(token, now).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, AuthError> {
        self.coordinator.refresh(refresh_token).await
    }

    /// Invalidate a presented token: access tokens individually, refresh
    /// tokens together with their whole family.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let now = Utc::now();
        let claims = self.validator.decode_verified(token, now)?;
        self.coordinator.revoke(&claims, now).await
    }

    /// Drop expired records from the revocation store and rotation
    /// ledger. Returns how many were purged.
    pub async fn purge_expired(&self) -> Result<usize, AuthError> {
        self.coordinator.purge_expired(Utc::now()).await
    }
}
