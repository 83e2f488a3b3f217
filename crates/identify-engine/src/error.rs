/// Errors at the engine boundary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no byte source: neither inline bytes nor a path was supplied")]
    MissingSource,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("module instantiation failed: {0}")]
    Instantiation(String),

    #[error("entrypoint {0} is not registered")]
    UnknownEntrypoint(String),

    #[error("engine protocol violation: {0}")]
    Protocol(String),

    #[error("wire encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
}
