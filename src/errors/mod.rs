use thiserror::Error;

use crate::domain::{CredentialStoreErr, RevocationStoreErr};

/// Every failure the service hands back to a caller.
///
/// All variants are terminal for the request except `StoreUnavailable`,
/// which signals a transient backing-store problem worth retrying with
/// backoff. `ReuseDetected` additionally means the presented token's whole
/// family was revoked before the error was returned.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token is not well-formed")]
    Malformed,

    #[error("token signature verification failed")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token has been revoked")]
    Revoked,

    #[error("wrong token type for this operation")]
    WrongTokenType,

    #[error("refresh token reuse detected; token family revoked")]
    ReuseDetected,

    #[error("backing store unavailable, retry later")]
    StoreUnavailable,

    #[error("internal error")]
    Internal,
}

impl AuthError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::StoreUnavailable)
    }
}

impl From<RevocationStoreErr> for AuthError {
    fn from(e: RevocationStoreErr) -> Self {
        match e {
            RevocationStoreErr::Unavailable => AuthError::StoreUnavailable,
        }
    }
}

impl From<CredentialStoreErr> for AuthError {
    fn from(e: CredentialStoreErr) -> Self {
        match e {
            CredentialStoreErr::Unavailable => AuthError::StoreUnavailable,
        }
    }
}
