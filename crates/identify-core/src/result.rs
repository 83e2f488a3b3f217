use serde::{Deserialize, Serialize};

/// Result of a full identity proof.
///
/// `proof`, `hash` and `binding` are opaque engine-encoded strings;
/// the wrapper never parses or interprets their contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResult {
    /// The zero-knowledge proof.
    pub proof: String,
    /// Commitment hash derived from the secret.
    pub hash: String,
    /// Commitment tying the proof to the challenge and salt.
    pub binding: String,
    /// The salt the proof was generated with, echoed back.
    pub salt: String,
    /// Fingerprint of the proving-key set in use, for auditing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk_id: Option<String>,
    /// Policy year the proof attests against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_year: Option<i32>,
    /// Minimum-age threshold the proof attests against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_age: Option<u32>,
}

/// Result of an age-only proof.
///
/// Carries no `hash` or `binding`: an age proof involves no secret, so
/// there is no secret-derived commitment to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeProofResult {
    /// The zero-knowledge proof.
    pub proof: String,
    /// Fingerprint of the proving-key set in use, for auditing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk_id: Option<String>,
    /// Policy year the proof attests against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_year: Option<i32>,
    /// Minimum-age threshold the proof attests against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_age: Option<u32>,
}
