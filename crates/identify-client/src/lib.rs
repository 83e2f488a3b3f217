//! Identify Client — host-application bridge to the sandboxed
//! zero-knowledge proving engine.
//!
//! The lifecycle is explicit and owned end to end: a [`RuntimeLoader`]
//! instantiates and starts the engine module, the returned
//! [`RuntimeHandle`] waits for the module's entrypoints and loads the
//! proving key, and the resulting [`ProofClient`] generates proofs.
//! There is no process-wide singleton: every handle owns its own
//! engine state, and initializing twice means loading a second handle.
//!
//! ```no_run
//! use identify_client::{ByteSource, ProofConfig, ProofRequest, RuntimeLoader};
//! use identify_engine::StubRuntime;
//!
//! # async fn demo() -> Result<(), identify_client::ClientError> {
//! let loader = RuntimeLoader::new(StubRuntime::new());
//! let handle = loader.load(ByteSource::from_path("dist/identify.wasm")).await?;
//! let client = handle
//!     .init(ByteSource::from_path("dist/user.pk"), ProofConfig::default())
//!     .await?;
//!
//! let request = ProofRequest::new("secret", 1990)
//!     .challenge(742_001)
//!     .salt_hex("a1b2c3d4e5f60718");
//! let result = client.generate_proof(&request)?;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod loader;

pub use client::{ProofClient, ProofRequest};
pub use error::ClientError;
pub use loader::{ReadyPoll, RuntimeHandle, RuntimeLoader};

pub use identify_core::{sanitize, AgeProofResult, ErrorCode, ProofConfig, ProofResult};
pub use identify_engine::ByteSource;
