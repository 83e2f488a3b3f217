//! Integration test: full lifecycle against the stub engine.
//!
//! Loads the engine module, initializes it with proving-key material
//! and policy defaults, and exercises both proof operations end to
//! end, including the failure paths a server integration has to
//! handle.

use std::time::Duration;

use identify_client::{
    ByteSource, ClientError, ProofClient, ProofConfig, ProofRequest, ReadyPoll, RuntimeLoader,
};
use identify_engine::StubRuntime;

// Small KDF cost so the suite stays fast; production engines default
// to 64 MiB / 3 iterations.
fn policy_2025() -> ProofConfig {
    ProofConfig {
        target_year: Some(2025),
        limit_age: Some(18),
        argon_memory: Some(64),
        argon_iterations: Some(1),
    }
}

async fn initialized_client() -> ProofClient {
    let loader = RuntimeLoader::new(
        StubRuntime::new().registration_delay(Duration::from_millis(20)),
    )
    .ready_poll(ReadyPoll {
        timeout: Duration::from_millis(500),
        interval: Duration::from_millis(5),
    });
    let handle = loader
        .load(ByteSource::from_bytes(StubRuntime::sample_module()))
        .await
        .expect("module should load");
    handle
        .init(
            ByteSource::from_bytes(StubRuntime::sample_proving_key()),
            policy_2025(),
        )
        .await
        .expect("init should succeed")
}

// =========================================================================
// Identity proofs
// =========================================================================

#[tokio::test]
async fn test_identity_proof_round_trip() {
    let client = initialized_client().await;
    let request = ProofRequest::new("hunter2", 1990)
        .challenge(742_001)
        .salt_hex("a1b2c3d4e5f60718");
    let result = client.generate_proof(&request).expect("proof should generate");

    assert!(!result.proof.is_empty());
    assert!(!result.hash.is_empty());
    assert!(!result.binding.is_empty());
    assert_eq!(result.salt, "a1b2c3d4e5f60718");
    assert_eq!(result.policy_year, Some(2025));
    assert_eq!(result.limit_age, Some(18));
    assert!(result.pk_id.is_some());
}

#[tokio::test]
async fn test_fresh_challenge_changes_binding() {
    let client = initialized_client().await;
    let first = client
        .generate_proof(
            &ProofRequest::new("hunter2", 1990)
                .challenge(1)
                .salt_hex("a1b2c3d4e5f60718"),
        )
        .unwrap();
    let second = client
        .generate_proof(
            &ProofRequest::new("hunter2", 1990)
                .challenge(2)
                .salt_hex("a1b2c3d4e5f60718"),
        )
        .unwrap();
    assert_ne!(
        first.binding, second.binding,
        "replayed parameters with a fresh challenge must rebind"
    );
    // Same secret and salt, so the commitment hash itself is stable.
    assert_eq!(first.hash, second.hash);
}

#[tokio::test]
async fn test_per_call_config_overrides_init_defaults() {
    let client = initialized_client().await;
    let request = ProofRequest::new("hunter2", 1990)
        .challenge(7)
        .config(ProofConfig {
            limit_age: Some(30),
            ..Default::default()
        });
    let result = client.generate_proof(&request).unwrap();
    // Overridden per call:
    assert_eq!(result.limit_age, Some(30));
    // Inherited from init:
    assert_eq!(result.policy_year, Some(2025));
}

#[tokio::test]
async fn test_engine_rejects_empty_secret() {
    let client = initialized_client().await;
    let err = client
        .generate_proof(&ProofRequest::new("", 1990).challenge(7))
        .unwrap_err();
    match err {
        ClientError::ProofGeneration { code, .. } => {
            assert_eq!(code.map(|c| c.to_string()), Some("E1010".to_string()));
        }
        other => panic!("expected ProofGeneration, got {other:?}"),
    }
}

// =========================================================================
// Age proofs
// =========================================================================

#[tokio::test]
async fn test_age_proof_adult() {
    // Subject born 2000 is 25 under the 2025 policy, threshold 18.
    let client = initialized_client().await;
    let result = client
        .generate_age_proof(2000, &ProofConfig::default())
        .expect("adult should prove age");
    assert!(!result.proof.is_empty());
    assert_eq!(result.policy_year, Some(2025));
    assert_eq!(result.limit_age, Some(18));
}

#[tokio::test]
async fn test_age_proof_minor_fails_engine_side() {
    // Subject born 2010 is 15 under the 2025 policy; the engine, not
    // the wrapper, refuses to construct the proof.
    let client = initialized_client().await;
    let err = client
        .generate_age_proof(2010, &ProofConfig::default())
        .unwrap_err();
    assert!(matches!(err, ClientError::ProofGeneration { .. }));
}

// =========================================================================
// Production presentation
// =========================================================================

#[tokio::test]
async fn test_engine_failure_is_sanitized_for_production() {
    let client = initialized_client().await;
    let err = client
        .generate_age_proof(2010, &ProofConfig::default())
        .unwrap_err();

    let production = err.presented(true);
    let development = err.presented(false);

    assert_eq!(production, "E1008: Proof generation failed");
    assert!(development.contains("age threshold"), "dev keeps detail");
    // Sanitizing an already sanitized message changes nothing.
    assert_eq!(
        identify_client::sanitize(&production, true, "Proof generation failed"),
        production
    );
}
