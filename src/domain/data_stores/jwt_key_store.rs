use jsonwebtoken::{DecodingKey, EncodingKey};
use std::collections::HashMap;

/// Signing/verification key material, addressed by key id.
///
/// One key (the active kid) signs; every listed key verifies. Rolling a
/// key means adding the new secret, switching the active kid, and keeping
/// the old secret listed until tokens signed with it have expired.
#[derive(Clone)]
pub struct JwtKeyStore {
    active_kid: String,
    signing: EncodingKey,
    // every accepted verification key, the active one included
    verifying: HashMap<String, DecodingKey>,
}

impl JwtKeyStore {
    /// `keys` must be non-empty and contain `active_kid`; `Config`
    /// validation guarantees both before this is reached.
    pub fn from_config(keys: &[(String, Vec<u8>)], active_kid: &str) -> Self {
        let mut verifying = HashMap::with_capacity(keys.len());
        let mut signing = None;
        for (kid, secret) in keys {
            verifying.insert(kid.clone(), DecodingKey::from_secret(secret));
            if kid == active_kid {
                signing = Some(EncodingKey::from_secret(secret));
            }
        }
        Self {
            active_kid: active_kid.to_string(),
            signing: signing.expect("active kid must be present in key set"),
            verifying,
        }
    }

    pub fn signing_key_and_kid(&self) -> (&EncodingKey, &str) {
        (&self.signing, &self.active_kid)
    }

    /// Tokens without a `kid` header fall back to the active key.
    pub fn verifying_key_for_kid(&self, kid: Option<&str>) -> Option<&DecodingKey> {
        self.verifying.get(kid.unwrap_or(&self.active_kid))
    }
}
