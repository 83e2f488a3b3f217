use serde::{Deserialize, Serialize};

/// Policy and key-derivation options understood by the proving engine.
///
/// Every field is optional: fields left unset are omitted from the wire
/// payload and defaulted by the engine itself, never by this wrapper.
/// A config is immutable once passed into a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProofConfig {
    /// Reference policy year the proof attests against. The engine
    /// falls back to its notion of the current year. Older engine
    /// builds emitted this field as `currentYear`; both spellings are
    /// accepted on input.
    #[serde(alias = "currentYear", skip_serializing_if = "Option::is_none")]
    pub target_year: Option<i32>,
    /// Minimum age threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_age: Option<u32>,
    /// Argon2 memory cost in KiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argon_memory: Option<u32>,
    /// Argon2 iteration count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argon_iterations: Option<u32>,
}

impl ProofConfig {
    /// Overlay this config on top of `base`: fields set here win,
    /// unset fields fall back to `base`. Applied once when a request
    /// is constructed, so call sites never re-derive defaults.
    pub fn merged(&self, base: &ProofConfig) -> ProofConfig {
        ProofConfig {
            target_year: self.target_year.or(base.target_year),
            limit_age: self.limit_age.or(base.limit_age),
            argon_memory: self.argon_memory.or(base.argon_memory),
            argon_iterations: self.argon_iterations.or(base.argon_iterations),
        }
    }
}
