//! Startup sequence driven by the studio's entry point.
//!
//! One session creates an engine, initializes it, executes it once, and then
//! releases it. Any failure stops the sequence; the handle is still released.

use std::convert::Infallible;
use std::fmt;

use crate::binding::{EngineBinding, NativeBinding};
use crate::config::LibraryConfig;
use crate::error::EngineError;
use crate::facade::{Engine, LifecycleStats};

/// Step of the session that the external component rejected.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Initialize,
    Execute,
    Terminate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialize => "initialize",
            Self::Execute => "execute",
            Self::Terminate => "terminate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The external component's own error, kept intact as the source.
    #[error("engine {stage} failed")]
    External {
        stage: Stage,
        #[source]
        source: E,
    },
}

/// Runs create, initialize, execute, and terminate once on `binding`.
pub fn run<B: EngineBinding>(binding: B) -> Result<LifecycleStats, SessionError<B::Error>> {
    log::info!("Welcome to the Dynamik Studio!");

    let mut engine = Engine::new(binding)?;
    engine.initialize().map_err(|source| SessionError::External {
        stage: Stage::Initialize,
        source,
    })?;
    engine.execute().map_err(|source| SessionError::External {
        stage: Stage::Execute,
        source,
    })?;

    let stats = engine.stats();
    engine.terminate().map_err(|source| SessionError::External {
        stage: Stage::Terminate,
        source,
    })?;

    log::info!("Shutting down the Dynamik Studio!");
    Ok(stats)
}

/// Loads the configured engine library and runs one session against it.
pub fn launch(library: &LibraryConfig) -> Result<LifecycleStats, SessionError<Infallible>> {
    let binding = NativeBinding::from_config(library)?;
    log::info!("engine library {} loaded", binding.path().display());
    run(binding)
}
