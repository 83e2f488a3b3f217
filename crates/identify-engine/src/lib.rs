//! Identify Engine — the boundary between the client wrapper and the
//! sandboxed proving engine.
//!
//! The engine itself is an external collaborator: it constructs the
//! circuits, derives keys and serializes proofs inside a sandboxed
//! module. This crate defines the contract the wrapper holds it to:
//! the runtime traits a sandbox backend implements, resolution of
//! module/key byte sources, and classification of the engine's raw
//! polymorphic replies into a tagged result. A deterministic stub
//! backend is included for development and tests; it honors the full
//! wire contract without performing real proof construction.

pub mod error;
pub mod reply;
pub mod runtime;
pub mod source;
pub mod stub;

pub use error::EngineError;
pub use reply::EngineReply;
pub use runtime::{entrypoint, EngineArg, ModuleInstance, ModuleRuntime};
pub use source::ByteSource;
pub use stub::StubRuntime;
