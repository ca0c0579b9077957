// API client module: a small blocking HTTP client for the road defect
// detection service. One upload-and-detect call, plus two advisory calls
// (health and model info) that never propagate their failures.

use crate::config::ClientConfig;
use crate::error::DetectError;
use crate::types::{DetectionResult, HealthStatus, UploadResponse};
use crate::upload::ImageFile;
use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Anything that can turn an image into a detection result. `ApiClient` is
/// the real implementation; the state flow only depends on this trait.
pub trait Detector {
    fn detect(&self, image: &ImageFile) -> Result<DetectionResult, DetectError>;
}

/// Holds a reqwest blocking client and the base URL of the service.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

/// Error body of a non-2xx response. Only `error` is looked at.
#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client, config })
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Upload `image` as the multipart field `image` to `/detect`. A single
    /// attempt is made; every failure is classified into a `DetectError`.
    pub fn detect_defects(&self, image: &ImageFile) -> Result<DetectionResult, DetectError> {
        let url = self.config.endpoint("detect");
        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.mime())
            .map_err(|e| classify_transport(&e))?;
        let form = multipart::Form::new().part("image", part);

        log::debug!("POST {} ({} bytes)", url, image.size());
        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| classify_transport(&e))?;
        let status = res.status().as_u16();
        let body = res.text().map_err(|e| classify_transport(&e))?;
        log::debug!("detect responded {} ({} bytes)", status, body.len());
        interpret_detect_response(status, &body)
    }

    /// True iff `/health` answers with `status == "healthy"`. Any failure
    /// counts as unhealthy.
    pub fn check_model_health(&self) -> bool {
        match self.get_json::<HealthStatus>("health") {
            Ok(health) => health.is_healthy(),
            Err(e) => {
                log::warn!("Model health check failed: {:#}", e);
                false
            }
        }
    }

    /// Raw `/model-info` payload, or `None` if it could not be fetched.
    pub fn get_model_info(&self) -> Option<serde_json::Value> {
        match self.get_json::<serde_json::Value>("model-info") {
            Ok(info) => Some(info),
            Err(e) => {
                log::warn!("Failed to get model info: {:#}", e);
                None
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        log::debug!("GET {}", url);
        let res = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to send request to {}", url))?;
        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("{} returned {}", url, status);
        }
        res.json().with_context(|| format!("Parsing {} response json", path))
    }
}

impl Detector for ApiClient {
    fn detect(&self, image: &ImageFile) -> Result<DetectionResult, DetectError> {
        self.detect_defects(image)
    }
}

/// Map a status code and raw body from `/detect` to the outcome the user
/// sees.
pub fn interpret_detect_response(status: u16, body: &str) -> Result<DetectionResult, DetectError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error);
        return Err(DetectError::from_status(status, message));
    }
    match serde_json::from_str::<UploadResponse>(body) {
        Ok(UploadResponse {
            success: true,
            data: Some(data),
            ..
        }) => Ok(data),
        Ok(UploadResponse { success: true, .. }) => {
            log::warn!("detect reported success without data");
            Err(DetectError::application(None))
        }
        Ok(resp) => Err(DetectError::application(resp.error)),
        Err(e) => {
            log::warn!("detect returned an unparsable body: {}", e);
            Err(DetectError::application(None))
        }
    }
}

fn classify_transport(err: &reqwest::Error) -> DetectError {
    if err.is_timeout() {
        log::warn!("detect request timed out: {}", err);
        DetectError::Timeout
    } else {
        log::warn!("detect request failed: {}", err);
        DetectError::Connection(crate::error::CONNECTION_FAILED.to_string())
    }
}
