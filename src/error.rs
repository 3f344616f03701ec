use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Errors surfaced while resolving, configuring or rendering a chart.
///
/// `Clone` so that a single failed load can be replayed to every caller
/// awaiting the same shared future.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("item with key \"{key}\" is not registered in {registry}")]
    NotFound { registry: String, key: String },

    #[error("failed to load \"{key}\": {reason}")]
    LoadFailed { key: String, reason: String },

    #[error("failed to spawn resolution task: {0}")]
    Spawn(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ChartError {
    #[must_use]
    pub fn load_failed(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::LoadFailed {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
