use serde_json::Value;

use crate::error::EngineError;

/// Names of the exports the engine registers once its runtime has
/// finished starting up.
pub mod entrypoint {
    /// Loads proving-key material and policy defaults into the engine.
    pub const INIT_IDENTIFY: &str = "InitIdentify";
    /// Generates a full identity proof.
    pub const GENERATE_IDENTIFY_PROOF: &str = "GenerateIdentifyProof";
    /// Generates an age-only proof.
    pub const GENERATE_AGE_PROOF: &str = "GenerateAgeProof";

    /// Every export the wrapper requires before first use.
    pub const REQUIRED: [&str; 3] = [INIT_IDENTIFY, GENERATE_IDENTIFY_PROOF, GENERATE_AGE_PROOF];
}

/// A single argument crossing into the engine, mirroring the value
/// kinds the sandbox boundary can carry.
#[derive(Debug)]
pub enum EngineArg<'a> {
    /// Raw bytes (proving-key material).
    Bytes(&'a [u8]),
    /// A string (secret, hex-encoded salt).
    Str(&'a str),
    /// An integer (birth year, challenge).
    Int(i64),
    /// A structured options object, already wire-encoded.
    Config(Value),
}

/// The sandbox runtime support layer.
///
/// An implementation wraps one concrete sandbox backend. It must be
/// present in the environment before any module can be loaded; a
/// backend compiled out of the build reports `supported() == false`.
pub trait ModuleRuntime: Send + Sync {
    /// Whether this runtime can actually host modules here.
    fn supported(&self) -> bool;

    /// Instantiate a compiled module from its bytes. The instance is
    /// not started and exposes no entrypoints yet.
    fn instantiate(&self, module_bytes: &[u8]) -> Result<Box<dyn ModuleInstance>, EngineError>;
}

/// An instantiated sandbox module.
///
/// `start` is non-blocking: it returns before the module's exports are
/// guaranteed registered, and `has_entrypoint` reports readiness as it
/// converges. Callers must poll for the exports they need before the
/// first `invoke`. `invoke` is a synchronous blocking call and is not
/// declared safe for concurrent use; callers serialize access.
pub trait ModuleInstance: Send + Sync {
    /// Begin running the module. Returns immediately.
    fn start(&self) -> Result<(), EngineError>;

    /// Whether the named export has been registered yet.
    fn has_entrypoint(&self, name: &str) -> bool;

    /// Call an export. The reply is the engine's raw polymorphic value;
    /// classify it with [`EngineReply::classify`].
    ///
    /// [`EngineReply::classify`]: crate::reply::EngineReply::classify
    fn invoke(&self, name: &str, args: &[EngineArg<'_>]) -> Result<Value, EngineError>;
}

impl std::fmt::Debug for dyn ModuleInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ModuleInstance")
    }
}
