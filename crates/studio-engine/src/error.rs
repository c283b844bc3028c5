use std::path::PathBuf;

/// Errors raised while preparing or constructing an engine.
///
/// Failures reported by the external component during `initialize`,
/// `execute` or `terminate` are not represented here; they surface as the
/// binding's own error type.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to read config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load engine library {}", library.display())]
    Load {
        library: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("engine library does not export `{symbol}`")]
    Symbol {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    /// `create` returned the null sentinel. The engine must not be used.
    #[error("engine create returned a null handle")]
    NullHandle,
}
