//! Structured engine error codes.
//!
//! The engine reports failures as strings carrying an optional leading
//! code of the form one ASCII letter followed by four digits and a
//! colon, e.g. `"E1008: failed to generate proof"`. The published code
//! space is:
//!
//! - `E1xxx` — authentication / proof construction
//! - `E2xxx` — key material and setup
//! - `E3xxx` — cryptography
//! - `E4xxx` — configuration and runtime lifecycle

use std::fmt;

/// A structured error code: one ASCII letter followed by four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode([u8; 5]);

impl ErrorCode {
    /// Construct a code from a 5-byte ASCII literal. Only used for the
    /// published constants below; callers should go through [`parse`].
    ///
    /// [`parse`]: ErrorCode::parse
    pub const fn from_ascii(code: [u8; 5]) -> Self {
        Self(code)
    }

    /// Parse a bare code such as `"E1008"`. Returns `None` unless the
    /// input is exactly one letter followed by four digits.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 {
            return None;
        }
        if !bytes[0].is_ascii_alphabetic() {
            return None;
        }
        if !bytes[1..].iter().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mut code = [0u8; 5];
        code.copy_from_slice(bytes);
        Some(Self(code))
    }

    /// Split a coded message of the form `"<code>:<detail>"` into the
    /// code and the detail text (leading whitespace trimmed). Returns
    /// `None` when the message carries no valid code prefix.
    pub fn split_prefix(message: &str) -> Option<(Self, &str)> {
        let (head, rest) = message.split_once(':')?;
        let code = Self::parse(head)?;
        Some((code, rest.trim_start()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        // Constructed only from validated ASCII.
        std::str::from_utf8(&self.0).unwrap_or("?????")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Authentication / proof construction (E1xxx)
pub const ERR_PROOF_FORMAT: ErrorCode = ErrorCode::from_ascii(*b"E1001");
pub const ERR_COMMITMENT_PARSE: ErrorCode = ErrorCode::from_ascii(*b"E1002");
pub const ERR_VERIFICATION_FAIL: ErrorCode = ErrorCode::from_ascii(*b"E1003");
pub const ERR_SALT_PARSE: ErrorCode = ErrorCode::from_ascii(*b"E1005");
pub const ERR_BINDING_COMPUTE: ErrorCode = ErrorCode::from_ascii(*b"E1006");
pub const ERR_WITNESS_CREATE: ErrorCode = ErrorCode::from_ascii(*b"E1007");
pub const ERR_PROOF_GENERATION: ErrorCode = ErrorCode::from_ascii(*b"E1008");
pub const ERR_MISSING_ARGUMENTS: ErrorCode = ErrorCode::from_ascii(*b"E1010");
pub const ERR_CHALLENGE_EXPIRED: ErrorCode = ErrorCode::from_ascii(*b"E1011");

// Key material / setup (E2xxx)
pub const ERR_KEY_PARSE: ErrorCode = ErrorCode::from_ascii(*b"E2001");
pub const ERR_KEY_MISMATCH: ErrorCode = ErrorCode::from_ascii(*b"E2004");

// Runtime lifecycle (E4xxx), raised by the client wrapper itself
pub const ERR_RUNTIME_UNAVAILABLE: ErrorCode = ErrorCode::from_ascii(*b"E4001");
pub const ERR_INIT_ENTRYPOINT: ErrorCode = ErrorCode::from_ascii(*b"E4002");
pub const ERR_KEY_LOAD_REJECTED: ErrorCode = ErrorCode::from_ascii(*b"E4003");
pub const ERR_PROOF_ENTRYPOINT: ErrorCode = ErrorCode::from_ascii(*b"E4004");
