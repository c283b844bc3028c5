use serde::Deserialize;

/// Exported symbol names of the engine library's entry points.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SymbolNames {
    pub create: String,
    pub initialize: String,
    pub execute: String,
    pub terminate: String,
}

impl Default for SymbolNames {
    fn default() -> Self {
        Self {
            create: "createInstance".to_string(),
            initialize: "initializeInstance".to_string(),
            execute: "executeInstance".to_string(),
            terminate: "terminateInstance".to_string(),
        }
    }
}
