use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValuationError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    /// A valuation method hit an undefined or degenerate computation.
    /// Always fatal for the whole valuation; no partial results are returned.
    #[error("Calculation error in {method}: {reason}")]
    Calculation { method: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Valuation task failed: {0}")]
    TaskFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ValuationError {
    pub(crate) fn calculation(method: impl Into<String>, reason: impl Into<String>) -> Self {
        ValuationError::Calculation {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ValuationError {
    fn from(e: serde_json::Error) -> Self {
        ValuationError::SerializationError(e.to_string())
    }
}
