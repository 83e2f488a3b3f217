use std::time::{Duration, Instant};

use identify_core::ProofConfig;
use identify_engine::{
    entrypoint, ByteSource, EngineArg, EngineError, EngineReply, ModuleInstance, ModuleRuntime,
};

use crate::client::ProofClient;
use crate::error::ClientError;

/// Bounds for the readiness poll between module start and first use.
///
/// Module start is non-blocking: the engine registers its exports some
/// time after `start` returns. Rather than yielding once and hoping,
/// the handle polls for the required exports until they are all
/// present or the deadline passes.
#[derive(Debug, Clone, Copy)]
pub struct ReadyPoll {
    /// Give up after this long.
    pub timeout: Duration,
    /// Pause between checks.
    pub interval: Duration,
}

impl Default for ReadyPoll {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            interval: Duration::from_millis(10),
        }
    }
}

/// Loads the engine module into a sandbox runtime.
pub struct RuntimeLoader {
    runtime: Box<dyn ModuleRuntime>,
    poll: ReadyPoll,
}

impl RuntimeLoader {
    pub fn new(runtime: impl ModuleRuntime + 'static) -> Self {
        Self {
            runtime: Box::new(runtime),
            poll: ReadyPoll::default(),
        }
    }

    /// Override the readiness poll bounds.
    pub fn ready_poll(mut self, poll: ReadyPoll) -> Self {
        self.poll = poll;
        self
    }

    /// Instantiate the engine module and start it.
    ///
    /// The returned handle is not ready for calls yet; readiness is
    /// established during [`RuntimeHandle::init`].
    pub async fn load(&self, module: ByteSource) -> Result<RuntimeHandle, ClientError> {
        if !self.runtime.supported() {
            return Err(ClientError::RuntimeUnavailable);
        }
        let bytes = module
            .resolve()
            .await
            .map_err(|e| ClientError::ModuleLoad(e.to_string()))?;
        let instance = self
            .runtime
            .instantiate(&bytes)
            .map_err(|e| ClientError::ModuleLoad(e.to_string()))?;
        instance
            .start()
            .map_err(|e| ClientError::ModuleLoad(e.to_string()))?;
        tracing::info!(module_bytes = bytes.len(), "engine module instantiated and started");
        Ok(RuntimeHandle {
            instance,
            poll: self.poll,
        })
    }
}

/// A started engine module awaiting initialization.
///
/// Owns the instance outright. `init` consumes the handle, so a handle
/// is initialized at most once by construction; replacing key material
/// means loading a fresh handle, which replaces the engine state
/// wholesale rather than adding to it.
pub struct RuntimeHandle {
    instance: Box<dyn ModuleInstance>,
    poll: ReadyPoll,
}

impl std::fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl RuntimeHandle {
    async fn wait_ready(&self) -> Result<(), ClientError> {
        let deadline = Instant::now() + self.poll.timeout;
        loop {
            let missing = entrypoint::REQUIRED
                .iter()
                .find(|name| !self.instance.has_entrypoint(name));
            match missing {
                None => return Ok(()),
                Some(name) => {
                    if Instant::now() >= deadline {
                        return Err(ClientError::EntrypointMissing((*name).to_string()));
                    }
                    tokio::time::sleep(self.poll.interval).await;
                }
            }
        }
    }

    /// Wait for the module's entrypoints, then load proving-key
    /// material and policy defaults into the engine.
    ///
    /// `config` becomes the default base for every later call on the
    /// returned client. A declined key (malformed bytes, wrong format)
    /// is [`ClientError::KeyLoadRejected`], never a crash.
    pub async fn init(
        self,
        key: ByteSource,
        config: ProofConfig,
    ) -> Result<ProofClient, ClientError> {
        self.wait_ready().await?;

        let key_bytes = key.resolve().await.map_err(ClientError::KeyMaterial)?;
        let wire_config = serde_json::to_value(config).map_err(EngineError::from)?;
        let raw = self.instance.invoke(
            entrypoint::INIT_IDENTIFY,
            &[EngineArg::Bytes(&key_bytes), EngineArg::Config(wire_config)],
        )?;

        match EngineReply::classify(raw)? {
            EngineReply::Ack(true) => {
                tracing::info!(key_bytes = key_bytes.len(), "proving key loaded");
                Ok(ProofClient::new(self.instance, config))
            }
            EngineReply::Ack(false) => Err(ClientError::KeyLoadRejected),
            EngineReply::Fault { code, message } => {
                tracing::warn!(code = ?code, %message, "engine declined initialization");
                Err(ClientError::KeyLoadRejected)
            }
            EngineReply::Payload(_) => Err(EngineError::Protocol(
                "structured payload from an initialization entrypoint".into(),
            )
            .into()),
        }
    }
}
