use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParamError {
    /// A declaration could not be resolved. Raised while resolving a schema,
    /// never when an attribute is accessed.
    #[error("Bind error: {0}")]
    Bind(String),

    /// A value was rejected by a validator or a kind-compatibility check.
    /// The store is left untouched.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Cannot decode stored value for '{key}': {reason}")]
    Decode { key: String, reason: String },

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ParamError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ParamError::InvalidValue(reason.into())
    }

    pub(crate) fn decode(key: &str, reason: impl ToString) -> Self {
        ParamError::Decode {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParamError>;
