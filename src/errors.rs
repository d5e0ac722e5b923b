// /src/errors.rs
//! Error taxonomy for reconciliation. The core algorithm is total over
//! well-formed input; every variant here points at a caller-side defect or
//! a failure at the Python boundary.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcilerError {
    #[error("Node with key '{key}' is not reachable from the old cursor (duplicate keys?)")]
    UnreachableNode { key: String },

    #[error("Key extraction failed: {details}")]
    KeyError { details: String },

    #[error("Type conversion error: expected {expected}, got {actual}")]
    TypeConversionError { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[cfg(feature = "python")]
    #[error("Python call failed: {0}")]
    PythonError(String),
}

#[cfg(feature = "python")]
impl From<ReconcilerError> for pyo3::PyErr {
    fn from(err: ReconcilerError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for ReconcilerError {
    fn from(err: pyo3::PyErr) -> Self {
        ReconcilerError::PythonError(err.to_string())
    }
}
