use crate::domain::{hash_secret, Subject};
use crate::errors::AuthError;
use crate::services::token_service::CredentialStoreType;

/// Checks a presented secret against the stored credential digest.
///
/// Both the unknown-subject and wrong-secret paths compute a digest and
/// return the same `InvalidCredentials`, so callers (and the wire) learn
/// nothing about which check failed. Specifics go to internal logs only.
#[derive(Clone)]
pub struct CredentialVerifier {
    credentials: CredentialStoreType,
    hash_key: [u8; 32],
}

impl CredentialVerifier {
    pub fn new(credentials: CredentialStoreType, hash_key: [u8; 32]) -> Self {
        Self {
            credentials,
            hash_key,
        }
    }

    pub async fn verify(&self, subject_id: &str, secret: &str) -> Result<Subject, AuthError> {
        // Digest the presented secret up front so the unknown-subject path
        // does the same work as the mismatch path. blake3::Hash equality
        // is constant-time.
        let presented = hash_secret(&self.hash_key, secret);

        let stored = {
            let store = self.credentials.read().await;
            store.secret_digest(subject_id).await?
        };

        match stored {
            Some(expected) if expected == presented => Subject::parse(subject_id.to_string())
                .map_err(|_| AuthError::InvalidCredentials),
            Some(_) => {
                log::warn!("credential mismatch for subject {subject_id}");
                Err(AuthError::InvalidCredentials)
            }
            None => {
                log::warn!("authentication attempt for unknown subject {subject_id}");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
