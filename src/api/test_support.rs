use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    config::{Config, API_KEY_VAR},
    error::{AppError, AppResult},
    models::{Device, DeviceList, Position},
    services::telemetry::DeviceSource,
    storage::sqlite::memory_pool,
    AppState,
};

pub const TEST_API_KEY: &str = "test-key";

/// Device source that answers from memory, or fails like an unreachable provider.
pub struct StubSource {
    devices: Option<Vec<Device>>,
}

impl StubSource {
    pub fn with(ids: &[&str]) -> Self {
        Self {
            devices: Some(ids.iter().map(|id| device(id)).collect()),
        }
    }

    pub fn failing() -> Self {
        Self { devices: None }
    }
}

#[async_trait]
impl DeviceSource for StubSource {
    async fn fetch_devices(&self, api_key: &str) -> AppResult<DeviceList> {
        assert_eq!(api_key, TEST_API_KEY);
        match &self.devices {
            Some(devices) => Ok(DeviceList {
                devices: devices.clone(),
            }),
            None => Err(AppError::UpstreamStatus(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            )),
        }
    }
}

pub fn device(id: &str) -> Device {
    Device {
        id: id.to_string(),
        name: format!("Unit {}", id),
        position: Position {
            latitude: 40.0,
            longitude: -74.0,
        },
        active_state: "active".to_string(),
    }
}

pub async fn test_state(source: StubSource) -> AppState {
    let config = Config::from_lookup(|key| (key == API_KEY_VAR).then(|| TEST_API_KEY.to_string()))
        .unwrap();
    AppState {
        db: memory_pool().await,
        devices: Arc::new(source),
        config: Arc::new(config),
    }
}

/// Send one request through the app; a non-JSON or empty body comes back as `Value::Null`.
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, HeaderMap, Value) {
    let body = match body {
        Some(text) => Body::from(text.to_string()),
        None => Body::empty(),
    };
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, json)
}
