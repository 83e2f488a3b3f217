//! Production error sanitization.
//!
//! Engine diagnostics can echo parameters and internal state. In
//! production deployments those details must not reach clients, but
//! the structured code prefix is kept so support can still triage.

use crate::code::ErrorCode;

/// Sanitize an error message for presentation.
///
/// In production mode a message carrying a coded prefix becomes
/// `"<code>: <fallback>"` and anything else becomes exactly
/// `fallback`. Outside production the message passes through
/// unchanged. Idempotent under repeated application in production
/// mode.
pub fn sanitize(raw: &str, production: bool, fallback: &str) -> String {
    if !production {
        return raw.to_string();
    }
    match ErrorCode::split_prefix(raw) {
        Some((code, _)) => format!("{code}: {fallback}"),
        None => fallback.to_string(),
    }
}

/// Whether the current process should be treated as production,
/// decided by `IDENTIFY_ENV=production`.
pub fn production_from_env() -> bool {
    std::env::var("IDENTIFY_ENV")
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Proof generation failed";

    #[test]
    fn test_production_keeps_code_drops_detail() {
        let out = sanitize("E1008: witness rejected for input 1987", true, FALLBACK);
        assert_eq!(out, "E1008: Proof generation failed");
    }

    #[test]
    fn test_production_uncoded_returns_fallback_exactly() {
        assert_eq!(sanitize("Error: prover not initialized", true, FALLBACK), FALLBACK);
        assert_eq!(sanitize("some internal detail", true, FALLBACK), FALLBACK);
        assert_eq!(sanitize("", true, FALLBACK), FALLBACK);
    }

    #[test]
    fn test_non_production_passthrough() {
        for raw in ["E1008: full detail", "Error: raw", "anything at all", ""] {
            assert_eq!(sanitize(raw, false, FALLBACK), raw);
        }
    }

    #[test]
    fn test_idempotent_in_production() {
        for raw in ["E1008: secret detail", "uncoded detail", "W0042: odd code"] {
            let once = sanitize(raw, true, FALLBACK);
            let twice = sanitize(&once, true, FALLBACK);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_any_letter_counts_as_coded() {
        let out = sanitize("W1234: warning-class failure", true, FALLBACK);
        assert_eq!(out, "W1234: Proof generation failed");
    }
}
