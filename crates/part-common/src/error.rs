//! Error types for render request parsing and validation.

use thiserror::Error;

/// Result type alias using ParamError.
pub type ParamResult<T> = Result<T, ParamError>;

/// Rejection of an incoming render request.
///
/// Every variant is a client error: the request never reaches the renderer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    /// The body could not be decoded as a render request.
    #[error("Invalid JSON: {0}")]
    Malformed(String),

    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("{message}")]
    InvalidParameter {
        param: &'static str,
        message: String,
    },
}

impl ParamError {
    pub(crate) fn out_of_range(param: &'static str, min: impl ToString, max: impl ToString) -> Self {
        ParamError::InvalidParameter {
            param,
            message: format!(
                "{} must be between {} and {}",
                param,
                min.to_string(),
                max.to_string()
            ),
        }
    }

    /// Name of the offending field, if the error is tied to one.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            ParamError::Malformed(_) => None,
            ParamError::MissingParameter(p) => Some(p),
            ParamError::InvalidParameter { param, .. } => Some(param),
        }
    }
}

impl From<serde_json::Error> for ParamError {
    fn from(err: serde_json::Error) -> Self {
        ParamError::Malformed(err.to_string())
    }
}
