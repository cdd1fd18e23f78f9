//! Errors raised while talking to the recommender collaborator.

use data_loader::DataLoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MLClientError {
    #[error("Failed to connect to ML service: {0}")]
    ConnectionError(String),

    #[error("ML service request failed: {0}")]
    RequestError(#[from] tonic::Status),

    #[error("Invalid response from ML service: {0}")]
    InvalidResponse(String),

    #[error("Invalid model parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to read exported model output: {0}")]
    Export(#[from] DataLoadError),

    #[error("Failed to read evaluation file {path}: {reason}")]
    Evaluation { path: String, reason: String },

    #[error("Expected metric {expected} but found {found}")]
    MetricMismatch { expected: String, found: String },
}
