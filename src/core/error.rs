use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("insufficient size for router '{name}': need {need} bytes, got {got}")]
    InsufficientKeyLength {
        name: String,
        need: usize,
        got: usize,
    },

    #[error("Unknown router type '{0}'")]
    UnknownRouterType(String),

    #[error("verify called with {values} values but {ids} shard ids")]
    LengthMismatch { values: usize, ids: usize },
}

pub type Result<T> = std::result::Result<T, RouteError>;

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
