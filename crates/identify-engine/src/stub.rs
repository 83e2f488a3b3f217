//! Deterministic in-process stub engine.
//!
//! Implements the full wire contract of the real sandboxed engine
//! without constructing real circuits: key material is fingerprinted
//! rather than parsed into a proving key, and proof/hash/binding values
//! are argon2/blake3 derivations of the request. Useful for
//! development, integration tests, and server-side mocks. Not suitable
//! for producing verifiable proofs.
//!
//! The stub reproduces the real engine's observable behavior at the
//! boundary: entrypoints register asynchronously after `start`,
//! malformed key material makes `InitIdentify` answer `false`, input
//! problems come back as coded error strings, and engine-side defaults
//! fill unset config fields.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use argon2::{Algorithm, Argon2, Params, Version};
use chrono::Datelike;
use serde_json::{json, Value};

use identify_core::{code, ErrorCode, ProofConfig};

use crate::error::EngineError;
use crate::runtime::{entrypoint, EngineArg, ModuleInstance, ModuleRuntime};

/// Leading magic of a well-formed stub proving key.
const KEY_MAGIC: &[u8] = b"gpk1";
/// Minimum length of a well-formed stub proving key.
const KEY_MIN_LEN: usize = 36;
/// Leading magic of a compiled module image.
const MODULE_MAGIC: &[u8] = b"\0asm";

/// Argon2 lanes, fixed by the shared key-derivation parameters.
const ARGON_THREADS: u32 = 4;
/// Engine-side default Argon2 memory cost in KiB.
const DEFAULT_ARGON_MEMORY: u32 = 64 * 1024;
/// Engine-side default Argon2 iteration count.
const DEFAULT_ARGON_ITERATIONS: u32 = 3;
/// Engine-side default minimum-age threshold.
const DEFAULT_LIMIT_AGE: u32 = 20;
/// Earliest birth year inside the circuit domain.
const MIN_BIRTH_YEAR: i64 = 1850;

/// Domain seed mixed into salt normalization.
const SALT_SEED: &[u8] = b"identify-sdk-stub-salt";

/// Stub implementation of the sandbox runtime support layer.
#[derive(Debug, Clone)]
pub struct StubRuntime {
    available: bool,
    registration_delay: Duration,
    omitted: Vec<String>,
}

impl StubRuntime {
    pub fn new() -> Self {
        Self {
            available: true,
            registration_delay: Duration::ZERO,
            omitted: Vec::new(),
        }
    }

    /// A runtime whose support layer is absent, for exercising the
    /// unavailable path.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Delay entrypoint registration by `delay` after `start`, the way
    /// a real module registers its exports asynchronously.
    pub fn registration_delay(mut self, delay: Duration) -> Self {
        self.registration_delay = delay;
        self
    }

    /// Never register the named entrypoint, for exercising readiness
    /// failures.
    pub fn without_entrypoint(mut self, name: &str) -> Self {
        self.omitted.push(name.to_string());
        self
    }

    /// A well-formed module image accepted by this runtime.
    pub fn sample_module() -> &'static [u8] {
        b"\0asm\x01\0\0\0identify-stub-module"
    }

    /// A well-formed proving key accepted by `InitIdentify`.
    pub fn sample_proving_key() -> Vec<u8> {
        let mut key = KEY_MAGIC.to_vec();
        key.extend((0u8..64).map(|i| i.wrapping_mul(37)));
        key
    }
}

impl Default for StubRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRuntime for StubRuntime {
    fn supported(&self) -> bool {
        self.available
    }

    fn instantiate(&self, module_bytes: &[u8]) -> Result<Box<dyn ModuleInstance>, EngineError> {
        if !module_bytes.starts_with(MODULE_MAGIC) || module_bytes.len() < 8 {
            return Err(EngineError::Instantiation(
                "module bytes are not a compiled engine image".into(),
            ));
        }
        tracing::debug!(bytes = module_bytes.len(), "stub module instantiated");
        Ok(Box::new(StubInstance {
            registration_delay: self.registration_delay,
            omitted: self.omitted.clone(),
            state: Mutex::new(StubState::default()),
        }))
    }
}

/// Policy and KDF parameters with engine-side defaults applied.
#[derive(Debug, Clone, Copy)]
struct ResolvedConfig {
    target_year: i32,
    limit_age: u32,
    argon_memory: u32,
    argon_iterations: u32,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            // The engine's notion of "current year".
            target_year: chrono::Utc::now().year(),
            limit_age: DEFAULT_LIMIT_AGE,
            argon_memory: DEFAULT_ARGON_MEMORY,
            argon_iterations: DEFAULT_ARGON_ITERATIONS,
        }
    }
}

impl ResolvedConfig {
    /// Overlay a wire-encoded config on top of these values. A config
    /// that fails to decode counts as empty, matching the engine's
    /// lenient option parsing.
    fn overlay(&self, wire: &Value) -> ResolvedConfig {
        let parsed: ProofConfig = serde_json::from_value(wire.clone()).unwrap_or_default();
        ResolvedConfig {
            target_year: parsed.target_year.unwrap_or(self.target_year),
            limit_age: parsed.limit_age.unwrap_or(self.limit_age),
            argon_memory: parsed.argon_memory.unwrap_or(self.argon_memory),
            argon_iterations: parsed.argon_iterations.unwrap_or(self.argon_iterations),
        }
    }
}

#[derive(Debug)]
struct EngineState {
    pk_id: String,
    defaults: ResolvedConfig,
}

#[derive(Debug, Default)]
struct StubState {
    started_at: Option<Instant>,
    engine: Option<EngineState>,
}

/// A started stub module.
pub struct StubInstance {
    registration_delay: Duration,
    omitted: Vec<String>,
    state: Mutex<StubState>,
}

impl StubInstance {
    fn lock(&self) -> std::sync::MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn init_identify(&self, args: &[EngineArg<'_>]) -> Value {
        let (pk, wire_config) = match args {
            [EngineArg::Bytes(pk)] => (*pk, Value::Null),
            [EngineArg::Bytes(pk), EngineArg::Config(cfg)] => (*pk, cfg.clone()),
            _ => return fault_uncoded("expected args (provingKeyBytes[, config])"),
        };

        if !pk.starts_with(KEY_MAGIC) || pk.len() < KEY_MIN_LEN {
            tracing::warn!(bytes = pk.len(), "proving key rejected: bad magic or truncated");
            return Value::Bool(false);
        }

        let defaults = ResolvedConfig::default().overlay(&wire_config);
        let pk_id = fingerprint(pk);
        tracing::debug!(%pk_id, target_year = defaults.target_year, "stub engine initialized");
        self.lock().engine = Some(EngineState { pk_id, defaults });
        Value::Bool(true)
    }

    fn generate_identify_proof(&self, args: &[EngineArg<'_>]) -> Value {
        let [EngineArg::Str(secret), EngineArg::Int(birth_year), EngineArg::Config(wire_config), EngineArg::Int(challenge), EngineArg::Str(salt_hex)] =
            args
        else {
            return fault_uncoded("expected args (secret, birthYear, config, challenge, saltHex)");
        };

        let state = self.lock();
        let Some(engine) = &state.engine else {
            return fault_uncoded("prover not initialized");
        };
        let policy = engine.defaults.overlay(wire_config);

        if secret.is_empty() {
            return fault(code::ERR_MISSING_ARGUMENTS, "secret must not be empty");
        }
        if let Some(reject) = check_age(*birth_year, &policy) {
            return reject;
        }
        let salt = match salt_block(salt_hex) {
            Ok(salt) => salt,
            Err(e) => return fault(code::ERR_SALT_PARSE, &format!("failed to parse salt: {e}")),
        };
        let hash = match derive_hash(secret, &salt, &policy) {
            Ok(hash) => hash,
            Err(e) => return fault(code::ERR_PROOF_GENERATION, &e),
        };

        let binding = hex_digest(&[
            b"binding-v1",
            &hash,
            &challenge.to_le_bytes(),
            salt_hex.as_bytes(),
        ]);
        let proof = hex_digest(&[
            b"identify-proof-v1",
            &hash,
            &birth_year.to_le_bytes(),
            &policy.target_year.to_le_bytes(),
            &policy.limit_age.to_le_bytes(),
            &challenge.to_le_bytes(),
            salt_hex.as_bytes(),
        ]);

        json!({
            "proof": proof,
            "hash": hex::encode(hash),
            "binding": binding,
            "salt": salt_hex,
            "pkId": engine.pk_id.clone(),
            "policyYear": policy.target_year,
            "limitAge": policy.limit_age,
        })
    }

    fn generate_age_proof(&self, args: &[EngineArg<'_>]) -> Value {
        let [EngineArg::Int(birth_year), EngineArg::Config(wire_config)] = args else {
            return fault_uncoded("expected args (birthYear, config)");
        };

        let state = self.lock();
        let Some(engine) = &state.engine else {
            return fault_uncoded("prover not initialized");
        };
        let policy = engine.defaults.overlay(wire_config);

        if let Some(reject) = check_age(*birth_year, &policy) {
            return reject;
        }

        let proof = hex_digest(&[
            b"age-proof-v1",
            engine.pk_id.as_bytes(),
            &birth_year.to_le_bytes(),
            &policy.target_year.to_le_bytes(),
            &policy.limit_age.to_le_bytes(),
        ]);

        json!({
            "proof": proof,
            "pkId": engine.pk_id.clone(),
            "policyYear": policy.target_year,
            "limitAge": policy.limit_age,
        })
    }
}

impl ModuleInstance for StubInstance {
    fn start(&self) -> Result<(), EngineError> {
        self.lock().started_at = Some(Instant::now());
        Ok(())
    }

    fn has_entrypoint(&self, name: &str) -> bool {
        let state = self.lock();
        let Some(started_at) = state.started_at else {
            return false;
        };
        if started_at.elapsed() < self.registration_delay {
            return false;
        }
        entrypoint::REQUIRED.contains(&name) && !self.omitted.iter().any(|o| o == name)
    }

    fn invoke(&self, name: &str, args: &[EngineArg<'_>]) -> Result<Value, EngineError> {
        if !self.has_entrypoint(name) {
            return Err(EngineError::UnknownEntrypoint(name.to_string()));
        }
        match name {
            entrypoint::INIT_IDENTIFY => Ok(self.init_identify(args)),
            entrypoint::GENERATE_IDENTIFY_PROOF => Ok(self.generate_identify_proof(args)),
            entrypoint::GENERATE_AGE_PROOF => Ok(self.generate_age_proof(args)),
            other => Err(EngineError::UnknownEntrypoint(other.to_string())),
        }
    }
}

/// Engine-side input validation shared by both proof entrypoints.
/// Returns the error string to report, if any.
fn check_age(birth_year: i64, policy: &ResolvedConfig) -> Option<Value> {
    if birth_year < MIN_BIRTH_YEAR || birth_year > policy.target_year as i64 {
        return Some(fault(
            code::ERR_WITNESS_CREATE,
            "birth year outside the circuit domain",
        ));
    }
    if policy.target_year as i64 - birth_year < policy.limit_age as i64 {
        return Some(fault(
            code::ERR_PROOF_GENERATION,
            "subject does not meet the age threshold",
        ));
    }
    None
}

fn fault(code: ErrorCode, detail: &str) -> Value {
    Value::String(format!("{code}: {detail}"))
}

fn fault_uncoded(detail: &str) -> Value {
    Value::String(format!("Error: {detail}"))
}

fn fingerprint(pk: &[u8]) -> String {
    hex::encode(&blake3::hash(pk).as_bytes()[..8])
}

/// Normalize a caller salt into a fixed-size derivation block. An
/// empty salt falls back to the engine seed.
fn salt_block(salt_hex: &str) -> Result<[u8; 32], hex::FromHexError> {
    let raw = if salt_hex.is_empty() {
        SALT_SEED.to_vec()
    } else {
        hex::decode(salt_hex)?
    };
    let mut hasher = blake3::Hasher::new();
    hasher.update(SALT_SEED);
    hasher.update(&raw);
    Ok(*hasher.finalize().as_bytes())
}

fn derive_hash(
    secret: &str,
    salt: &[u8; 32],
    policy: &ResolvedConfig,
) -> Result<[u8; 32], String> {
    let params = Params::new(
        policy.argon_memory,
        policy.argon_iterations,
        ARGON_THREADS,
        Some(32),
    )
    .map_err(|e| format!("bad key-derivation parameters: {e}"))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let mut out = [0u8; 32];
    argon
        .hash_password_into(secret.as_bytes(), salt, &mut out)
        .map_err(|e| format!("key derivation failed: {e}"))?;
    Ok(out)
}

fn hex_digest(parts: &[&[u8]]) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize().as_bytes())
}
