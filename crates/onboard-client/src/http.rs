//! HTTP implementation of the onboarding service contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use onboard_model::{DetectedField, FileType, UploadSession};

use crate::api::{OnboardingApi, SubmitAck, SubmitMappingRequest, UploadReceipt, UploadRequest};
use crate::error::ApiError;

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the onboarding service's HTTP API.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Network)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl OnboardingApi for HttpApi {
    async fn upload_files(&self, request: &UploadRequest) -> Result<UploadReceipt, ApiError> {
        let mut form = Form::new();
        for (file_type, path) in request.parts() {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("{file_type}.csv"));
            debug!(%file_type, file = %file_name, bytes = bytes.len(), "adding upload part");
            form = form.part(file_type.as_str().to_string(), Part::bytes(bytes).file_name(file_name));
        }
        let response = self
            .client
            .post(self.url("/uploads"))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn detect_fields(
        &self,
        upload_id: &str,
        file_type: FileType,
    ) -> Result<Vec<DetectedField>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/uploads/{upload_id}/fields")))
            .query(&[("file_type", file_type.as_str())])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn submit_mapping(&self, request: &SubmitMappingRequest) -> Result<SubmitAck, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/uploads/{}/mappings", request.upload_id)))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn get_status(&self, upload_id: &str) -> Result<UploadSession, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/uploads/{upload_id}/status")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://localhost:8080/").unwrap();
        assert_eq!(api.url("/uploads"), "http://localhost:8080/uploads");
    }
}
