use std::collections::HashMap;

use crate::domain::{CredentialStore, CredentialStoreErr};

/// In-memory credential digests, keyed by subject id.
#[derive(Default)]
pub struct HashmapCredentialStore {
    digests: HashMap<String, blake3::Hash>,
}

#[async_trait::async_trait]
impl CredentialStore for HashmapCredentialStore {
    async fn put_secret_digest(
        &mut self,
        subject_id: String,
        digest: blake3::Hash,
    ) -> Result<(), CredentialStoreErr> {
        self.digests.insert(subject_id, digest);
        Ok(())
    }

    async fn secret_digest(
        &self,
        subject_id: &str,
    ) -> Result<Option<blake3::Hash>, CredentialStoreErr> {
        Ok(self.digests.get(subject_id).copied())
    }
}
