use identify_core::{code, sanitize, ErrorCode};
use identify_engine::{entrypoint, EngineError};

/// Client-facing failures around the engine boundary.
///
/// Every engine-reported failure surfaces as one of these variants;
/// the wrapper performs no retry, so each failure is terminal for that
/// call. Input validation lives engine-side and comes back as
/// [`ProofGeneration`] carrying the engine's code.
///
/// [`ProofGeneration`]: ClientError::ProofGeneration
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("sandbox runtime support layer is not available")]
    RuntimeUnavailable,

    #[error("module load failed: {0}")]
    ModuleLoad(String),

    #[error("entrypoint {0} did not register before the readiness deadline")]
    EntrypointMissing(String),

    #[error("proving key rejected by the engine")]
    KeyLoadRejected,

    #[error("key material unavailable: {0}")]
    KeyMaterial(#[source] EngineError),

    /// The engine reported a failure for this call. `message` is the
    /// raw engine report, code prefix included; `code` is that prefix
    /// parsed out for triage.
    #[error("proof generation failed: {message}")]
    ProofGeneration {
        code: Option<ErrorCode>,
        message: String,
    },

    #[error("engine call failed: {0}")]
    Engine(#[from] EngineError),
}

impl ClientError {
    /// The structured triage code for this failure, when one exists.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::RuntimeUnavailable => Some(code::ERR_RUNTIME_UNAVAILABLE),
            ClientError::EntrypointMissing(name) if name.as_str() == entrypoint::INIT_IDENTIFY => {
                Some(code::ERR_INIT_ENTRYPOINT)
            }
            ClientError::EntrypointMissing(_) => Some(code::ERR_PROOF_ENTRYPOINT),
            ClientError::KeyLoadRejected => Some(code::ERR_KEY_LOAD_REJECTED),
            ClientError::ProofGeneration { code, .. } => *code,
            ClientError::ModuleLoad(_)
            | ClientError::KeyMaterial(_)
            | ClientError::Engine(_) => None,
        }
    }

    fn fallback(&self) -> &'static str {
        match self {
            ClientError::RuntimeUnavailable => "Runtime initialization failed",
            ClientError::ModuleLoad(_)
            | ClientError::EntrypointMissing(_)
            | ClientError::KeyLoadRejected
            | ClientError::KeyMaterial(_) => "Initialization failed",
            ClientError::ProofGeneration { .. } | ClientError::Engine(_) => {
                "Proof generation failed"
            }
        }
    }

    /// Render this error for presentation. In production the detail is
    /// replaced by a generic message while the triage code is kept.
    pub fn presented(&self, production: bool) -> String {
        let raw = match self {
            // The engine report already carries its own code prefix.
            ClientError::ProofGeneration { message, .. } => message.clone(),
            _ => match self.code() {
                Some(code) => format!("{code}: {self}"),
                None => self.to_string(),
            },
        };
        sanitize(&raw, production, self.fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presented_keeps_code_in_production() {
        let err = ClientError::KeyLoadRejected;
        assert_eq!(err.presented(true), "E4003: Initialization failed");
        assert_eq!(
            err.presented(false),
            "E4003: proving key rejected by the engine"
        );
    }

    #[test]
    fn test_presented_engine_fault_is_sanitized() {
        let err = ClientError::ProofGeneration {
            code: ErrorCode::parse("E1008"),
            message: "E1008: witness rejected for birth year 1987".into(),
        };
        assert_eq!(err.presented(true), "E1008: Proof generation failed");
        assert_eq!(
            err.presented(false),
            "E1008: witness rejected for birth year 1987"
        );
    }

    #[test]
    fn test_presented_uncoded_fault_hides_everything() {
        let err = ClientError::ProofGeneration {
            code: None,
            message: "Error: prover not initialized".into(),
        };
        assert_eq!(err.presented(true), "Proof generation failed");
    }

    #[test]
    fn test_entrypoint_codes_follow_the_missing_export() {
        let init = ClientError::EntrypointMissing(entrypoint::INIT_IDENTIFY.into());
        let prove = ClientError::EntrypointMissing(entrypoint::GENERATE_IDENTIFY_PROOF.into());
        assert_eq!(init.code(), Some(code::ERR_INIT_ENTRYPOINT));
        assert_eq!(prove.code(), Some(code::ERR_PROOF_ENTRYPOINT));
    }
}
