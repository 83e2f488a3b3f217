//! Integration test: wire contract of results sent on to a server.
//!
//! Servers consume the client's results as JSON; field names and the
//! absence of commitment fields on age proofs are part of the contract.

use std::time::Duration;

use identify_client::{ByteSource, ProofConfig, ProofRequest, RuntimeLoader};
use identify_engine::StubRuntime;

fn policy() -> ProofConfig {
    ProofConfig {
        target_year: Some(2025),
        limit_age: Some(18),
        argon_memory: Some(64),
        argon_iterations: Some(1),
    }
}

#[tokio::test]
async fn test_result_wire_fields_are_camel_case() {
    let loader = RuntimeLoader::new(StubRuntime::new());
    let handle = loader
        .load(ByteSource::from_bytes(StubRuntime::sample_module()))
        .await
        .unwrap();
    let client = handle
        .init(
            ByteSource::from_bytes(StubRuntime::sample_proving_key()),
            policy(),
        )
        .await
        .unwrap();

    let result = client
        .generate_proof(
            &ProofRequest::new("hunter2", 1990)
                .challenge(9)
                .salt_hex("a1b2c3d4e5f60718"),
        )
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    let obj = json.as_object().unwrap();
    for field in ["proof", "hash", "binding", "salt", "pkId", "policyYear", "limitAge"] {
        assert!(obj.contains_key(field), "missing wire field {field}");
    }

    let age = client.generate_age_proof(2000, &ProofConfig::default()).unwrap();
    let json = serde_json::to_value(&age).unwrap();
    let obj = json.as_object().unwrap();
    assert!(obj.contains_key("proof"));
    assert!(!obj.contains_key("hash"));
    assert!(!obj.contains_key("binding"));
    assert!(!obj.contains_key("salt"));
}

#[tokio::test]
async fn test_handle_survives_zero_registration_delay() {
    // A module whose exports are ready immediately must not trip the
    // readiness poll either.
    let loader = RuntimeLoader::new(StubRuntime::new().registration_delay(Duration::ZERO));
    let handle = loader
        .load(ByteSource::from_bytes(StubRuntime::sample_module()))
        .await
        .unwrap();
    handle
        .init(
            ByteSource::from_bytes(StubRuntime::sample_proving_key()),
            policy(),
        )
        .await
        .expect("immediate readiness should pass the poll");
}
