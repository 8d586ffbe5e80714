use std::sync::{Arc, Once};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use token_service::domain::{
    hash_secret, CredentialStore, RevocationStore, RevocationStoreErr,
};
use token_service::services::data_stores::{
    HashmapCredentialStore, HashmapRevocationStore, HashmapRotationStore,
};
use token_service::utils::Config;
use token_service::{AuthError, TokenService};

const TEST_KEY_B64: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

static ENV_INIT: Once = Once::new();

fn set_env_config() {
    ENV_INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
        std::env::set_var("ACCESS_TTL_SECONDS", "900");
        std::env::set_var("REFRESH_TTL_SECONDS", "604800");
        std::env::set_var("CREDENTIAL_HASH_KEY_B64", TEST_KEY_B64);
        let keys_json = format!(
            r#"[{{"kid":"k1","secret_b64":"{secret}"}}]"#,
            secret = TEST_KEY_B64
        );
        std::env::set_var("JWT_HS256_KEYS_JSON", keys_json);
        std::env::set_var("JWT_ACTIVE_KID", "k1");
    });
}

async fn build_token_service(revocations: Box<dyn RevocationStore>) -> TokenService {
    set_env_config();
    let cfg = Arc::new(RwLock::new(
        Config::from_env().expect("failed to build test config"),
    ));

    let mut credential_store = HashmapCredentialStore::default();
    credential_store
        .put_secret_digest("alice".to_string(), hash_secret(&[0u8; 32], "pw"))
        .await
        .expect("seed credential");

    TokenService::new(
        cfg,
        Box::new(credential_store),
        Box::new(HashmapRotationStore::default()),
        revocations,
    )
    .await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn hundred_parallel_refreshes_yield_exactly_one_success() {
    let svc = Arc::new(build_token_service(Box::new(HashmapRevocationStore::default())).await);
    let issued = svc.issue("alice", "pw").await.expect("issue");
    let refresh_token = Arc::new(issued.refresh_token);

    let mut handles = Vec::with_capacity(100);
    for _ in 0..100 {
        let svc = Arc::clone(&svc);
        let token = Arc::clone(&refresh_token);
        handles.push(tokio::spawn(async move { svc.refresh(&token).await }));
    }

    let mut successes = Vec::new();
    let mut failures = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(pair) => successes.push(pair),
            Err(e) => {
                assert!(
                    matches!(e, AuthError::ReuseDetected | AuthError::Revoked),
                    "unexpected refresh failure: {e:?}"
                );
                failures += 1;
            }
        }
    }

    assert_eq!(successes.len(), 1, "rotation must not double-issue");
    assert_eq!(failures, 99);
    assert_eq!(successes[0].family_id, issued.family_id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_refreshes_of_distinct_families_all_succeed() {
    let svc = Arc::new(build_token_service(Box::new(HashmapRevocationStore::default())).await);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            let issued = svc.issue("alice", "pw").await?;
            svc.refresh(&issued.refresh_token).await
        }));
    }

    for handle in handles {
        let rotated = handle.await.expect("task panicked").expect("refresh");
        assert_eq!(rotated.subject, "alice");
    }
}

/// Revocation backend that is permanently down, standing in for a
/// timed-out external cache.
struct UnavailableRevocationStore;

#[async_trait::async_trait]
impl RevocationStore for UnavailableRevocationStore {
    async fn add(
        &mut self,
        _token_id: Uuid,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), RevocationStoreErr> {
        Err(RevocationStoreErr::Unavailable)
    }

    async fn contains(&self, _token_id: Uuid) -> Result<bool, RevocationStoreErr> {
        Err(RevocationStoreErr::Unavailable)
    }

    async fn purge_expired(&mut self, _now: DateTime<Utc>) -> Result<usize, RevocationStoreErr> {
        Err(RevocationStoreErr::Unavailable)
    }
}

#[tokio::test]
async fn unavailable_store_surfaces_retryable_error_instead_of_hanging() {
    let svc = build_token_service(Box::new(UnavailableRevocationStore)).await;
    let issued = svc.issue("alice", "pw").await.expect("issue");

    let err = svc.validate(&issued.access_token).await.unwrap_err();
    assert_eq!(err, AuthError::StoreUnavailable);
    assert!(err.is_retryable());

    let err = svc.refresh(&issued.refresh_token).await.unwrap_err();
    assert_eq!(err, AuthError::StoreUnavailable);
}
