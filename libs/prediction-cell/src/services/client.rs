use std::sync::OnceLock;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{PredictionError, PredictionResponse, SymptomsRequest};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the external symptom-prediction service. One instance is
/// shared by every request so the connection pool survives between calls.
pub struct PredictionClient {
    http: OnceLock<Client>,
    base_url: String,
}

impl PredictionClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: OnceLock::new(),
            base_url: config.ml_service_url.trim_end_matches('/').to_string(),
        }
    }

    fn http(&self) -> Result<&Client, PredictionError> {
        if let Some(client) = self.http.get() {
            return Ok(client);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PredictionError::Transport(e.to_string()))?;
        Ok(self.http.get_or_init(|| client))
    }

    pub async fn predict_symptoms(&self, symptoms: SymptomsRequest) -> Result<PredictionResponse, PredictionError> {
        let url = format!("{}/predict/", self.base_url);
        debug!("Requesting prediction from {}", url);

        let response = self
            .http()?
            .post(&url)
            .json(&symptoms)
            .send()
            .await
            .map_err(|e| {
                error!("Prediction request failed: {}", e);
                PredictionError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Prediction service error ({})", status);
            return Err(PredictionError::UpstreamStatus(status.as_u16()));
        }

        response
            .json::<PredictionResponse>()
            .await
            .map_err(|e| PredictionError::InvalidBody(e.to_string()))
    }
}
