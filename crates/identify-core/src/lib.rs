//! Identify Core — shared types for the Identify proving-engine client.
//!
//! Everything here is independent of any particular sandbox runtime:
//! the engine configuration and its wire format, the structured error
//! code convention, proof result payloads, and the production error
//! sanitizer.

pub mod code;
pub mod config;
pub mod result;
pub mod sanitize;

pub use code::ErrorCode;
pub use config::ProofConfig;
pub use result::{AgeProofResult, ProofResult};
pub use sanitize::{production_from_env, sanitize};
