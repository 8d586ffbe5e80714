use super::CredentialStoreErr;

/// Backing store for credential digests. Secrets are never stored in the
/// clear; callers hand over a keyed BLAKE3 digest (see `hash_secret`).
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn put_secret_digest(
        &mut self,
        subject_id: String,
        digest: blake3::Hash,
    ) -> Result<(), CredentialStoreErr>;

    async fn secret_digest(
        &self,
        subject_id: &str,
    ) -> Result<Option<blake3::Hash>, CredentialStoreErr>;
}

/// Keyed digest of a credential secret. `blake3::Hash` compares in
/// constant time, so digest equality is safe against timing probes.
pub fn hash_secret(key32: &[u8; 32], secret: &str) -> blake3::Hash {
    blake3::keyed_hash(key32, secret.as_bytes())
}
