use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::DeviceList,
};

/// Anything that can produce the current device list for a credential.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn fetch_devices(&self, api_key: &str) -> AppResult<DeviceList>;
}

/// OneStepGPS public device endpoint.
#[derive(Clone)]
pub struct OneStepGpsClient {
    http: reqwest::Client,
    base_url: String,
}

impl OneStepGpsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DeviceSource for OneStepGpsClient {
    async fn fetch_devices(&self, api_key: &str) -> AppResult<DeviceList> {
        let resp = self
            .http
            .get(format!("{}/device", self.base_url))
            .query(&[("latest_point", "true"), ("api-key", api_key)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus(status));
        }

        let body = resp.bytes().await?;
        let list: DeviceList = serde_json::from_slice(&body).map_err(AppError::Decode)?;
        tracing::debug!(count = list.devices.len(), "fetched devices from provider");
        Ok(list)
    }
}
