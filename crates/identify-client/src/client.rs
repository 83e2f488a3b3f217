use std::fmt;
use std::sync::Mutex;

use zeroize::Zeroizing;

use identify_core::{AgeProofResult, ProofConfig, ProofResult};
use identify_engine::{entrypoint, EngineArg, EngineError, EngineReply, ModuleInstance};

use crate::error::ClientError;

/// One identity-proof request. Call-scoped; nothing is retained after
/// the call returns. The secret is wiped from memory on drop.
pub struct ProofRequest {
    secret: Zeroizing<String>,
    pub birth_year: i32,
    /// Per-call config, overlaid on the client's init-time defaults.
    pub config: ProofConfig,
    /// Server-issued anti-replay nonce. Defaults to 0 for engine
    /// compatibility, but a real deployment should always set one; the
    /// client logs a warning when a proof is generated without it.
    pub challenge: i64,
    /// Hex-encoded salt; empty means engine-chosen derivation salt.
    pub salt_hex: String,
}

impl ProofRequest {
    pub fn new(secret: impl Into<String>, birth_year: i32) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            birth_year,
            config: ProofConfig::default(),
            challenge: 0,
            salt_hex: String::new(),
        }
    }

    pub fn config(mut self, config: ProofConfig) -> Self {
        self.config = config;
        self
    }

    pub fn challenge(mut self, challenge: i64) -> Self {
        self.challenge = challenge;
        self
    }

    pub fn salt_hex(mut self, salt_hex: impl Into<String>) -> Self {
        self.salt_hex = salt_hex.into();
        self
    }
}

impl fmt::Debug for ProofRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofRequest")
            .field("secret", &"<redacted>")
            .field("birth_year", &self.birth_year)
            .field("config", &self.config)
            .field("challenge", &self.challenge)
            .field("salt_hex", &self.salt_hex)
            .finish()
    }
}

/// Stateful handle for proof generation against one initialized
/// engine instance.
///
/// The engine declares no concurrency guarantee, so the client keeps
/// at most one request in flight: overlapping callers queue on the
/// internal lock. Calls block until the engine answers; there is no
/// timeout or cancellation at this boundary, and no retry on failure.
pub struct ProofClient {
    instance: Mutex<Box<dyn ModuleInstance>>,
    defaults: ProofConfig,
}

impl fmt::Debug for ProofClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofClient")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ProofClient {
    pub(crate) fn new(instance: Box<dyn ModuleInstance>, defaults: ProofConfig) -> Self {
        Self {
            instance: Mutex::new(instance),
            defaults,
        }
    }

    /// The init-time config used as the base for every call.
    pub fn defaults(&self) -> &ProofConfig {
        &self.defaults
    }

    fn call(&self, name: &str, args: &[EngineArg<'_>]) -> Result<EngineReply, ClientError> {
        let instance = self
            .instance
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let raw = instance.invoke(name, args)?;
        Ok(EngineReply::classify(raw)?)
    }

    /// Generate a full identity proof.
    ///
    /// On success, `policy_year` and `limit_age` the engine left unset
    /// (absent or zero) are filled from the request's effective config;
    /// the engine's value wins when it reports one.
    pub fn generate_proof(&self, request: &ProofRequest) -> Result<ProofResult, ClientError> {
        let config = request.config.merged(&self.defaults);
        if request.challenge == 0 {
            tracing::warn!(
                "generating proof without a server-issued challenge; replay protection is weakened"
            );
        }
        let wire_config = serde_json::to_value(config).map_err(EngineError::from)?;

        let reply = self.call(
            entrypoint::GENERATE_IDENTIFY_PROOF,
            &[
                EngineArg::Str(request.secret.as_str()),
                EngineArg::Int(i64::from(request.birth_year)),
                EngineArg::Config(wire_config),
                EngineArg::Int(request.challenge),
                EngineArg::Str(&request.salt_hex),
            ],
        )?;

        match reply {
            EngineReply::Payload(payload) => {
                let mut result: ProofResult =
                    serde_json::from_value(payload).map_err(EngineError::from)?;
                result.policy_year = fill_zero(result.policy_year, config.target_year);
                result.limit_age = fill_zero(result.limit_age, config.limit_age);
                tracing::debug!(
                    pk_id = result.pk_id.as_deref().unwrap_or("-"),
                    "identity proof generated"
                );
                Ok(result)
            }
            EngineReply::Fault { code, message } => {
                Err(ClientError::ProofGeneration { code, message })
            }
            EngineReply::Ack(_) => Err(EngineError::Protocol(
                "bare acknowledgement from a proof entrypoint".into(),
            )
            .into()),
        }
    }

    /// Generate an age-only proof: attests that `birth_year` satisfies
    /// the configured threshold, with no secret involved and no
    /// secret-derived commitment in the result.
    pub fn generate_age_proof(
        &self,
        birth_year: i32,
        config: &ProofConfig,
    ) -> Result<AgeProofResult, ClientError> {
        let config = config.merged(&self.defaults);
        let wire_config = serde_json::to_value(config).map_err(EngineError::from)?;

        let reply = self.call(
            entrypoint::GENERATE_AGE_PROOF,
            &[
                EngineArg::Int(i64::from(birth_year)),
                EngineArg::Config(wire_config),
            ],
        )?;

        match reply {
            EngineReply::Payload(payload) => {
                let mut result: AgeProofResult =
                    serde_json::from_value(payload).map_err(EngineError::from)?;
                result.policy_year = fill_zero(result.policy_year, config.target_year);
                result.limit_age = fill_zero(result.limit_age, config.limit_age);
                Ok(result)
            }
            EngineReply::Fault { code, message } => {
                Err(ClientError::ProofGeneration { code, message })
            }
            EngineReply::Ack(_) => Err(EngineError::Protocol(
                "bare acknowledgement from a proof entrypoint".into(),
            )
            .into()),
        }
    }
}

/// Engine values of zero mean "unset", matching the engine's own
/// convention; fall back to the caller's config.
fn fill_zero<T: Copy + Default + PartialEq>(engine: Option<T>, fallback: Option<T>) -> Option<T> {
    engine.filter(|v| *v != T::default()).or(fallback)
}
