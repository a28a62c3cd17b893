use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymptomsRequest {
    pub fever: bool,
    pub cough: bool,
    pub headache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("ml service unreachable: {0}")]
    Transport(String),

    #[error("ml service returned status {0}")]
    UpstreamStatus(u16),

    #[error("ml service returned an invalid body: {0}")]
    InvalidBody(String),
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}
