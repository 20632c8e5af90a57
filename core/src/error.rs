use thiserror::Error;

/// Feil som stoppes helt ved inngangen til motoren.
///
/// Alt annet (manglende HR, ukjent lap-format, ugyldige samples) degraderes
/// lokalt per økt og blir aldri en `EngineError`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Toppnivået mangler `sessions`.
    #[error("training export has no `sessions` field")]
    MissingSessions,

    /// `sessions` finnes, men er ikke en liste.
    #[error("`sessions` must be a sequence, found {found}")]
    SessionsNotSequence { found: &'static str },

    /// Blobben er ikke et objekt i det hele tatt.
    #[error("training export must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON-feil med sti til feltet, f.eks. `zones.zones[2].min`.
    #[error("config parse at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid zone table: {0}")]
    InvalidZoneTable(String),

    #[error("invalid HR bounds: min {min} > max {max}")]
    InvalidBounds { min: u16, max: u16 },

    #[error("invalid config value: {0}")]
    InvalidValue(&'static str),

    #[error("config serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
}

/// Navn på JSON-typen, brukt i feilmeldinger.
pub(crate) fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
