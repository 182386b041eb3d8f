use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::DeviceList,
    services::{
        merge::{resolve, visible_devices, PreferenceKey},
        preferences::PreferenceStore,
    },
    AppState,
};

const DEFAULT_USER_ID: i64 = 1;

#[derive(Debug, Deserialize)]
pub struct ListDevicesQuery {
    pub id: Option<String>,
}

fn user_id_param(query: Result<Query<ListDevicesQuery>, QueryRejection>) -> AppResult<i64> {
    let invalid = || AppError::BadRequest("Invalid user ID".to_string());
    let Query(query) = query.map_err(|_| invalid())?;
    match query.id.as_deref() {
        None | Some("") => Ok(DEFAULT_USER_ID),
        Some(raw) => raw.parse().map_err(|_| invalid()),
    }
}

/// Devices from the provider minus the ones the user has hidden.
pub async fn list_devices(
    State(state): State<AppState>,
    query: Result<Query<ListDevicesQuery>, QueryRejection>,
) -> AppResult<Json<DeviceList>> {
    let user_id = user_id_param(query)?;

    let store = PreferenceStore::new(state.db.clone());
    let pref = resolve(&store, &PreferenceKey::Id(user_id))
        .await
        .map_err(AppError::not_found_as_internal)?;

    let fetched = state
        .devices
        .fetch_devices(&state.config.telemetry.api_key)
        .await?;

    Ok(Json(DeviceList {
        devices: visible_devices(fetched.devices, &pref.hidden_devices),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        api::{router::create_app, test_support::*},
        models::UserPreference,
        services::preferences::PreferenceStore,
    };

    async fn seed(state: &crate::AppState, hidden: &[&str]) -> i64 {
        PreferenceStore::new(state.db.clone())
            .create(&UserPreference {
                sort_order: "name".into(),
                hidden_devices: hidden.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    fn ids(body: &serde_json::Value) -> Vec<String> {
        body["result_list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["device_id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn defaults_to_user_one() {
        let state = test_state(StubSource::with(&["a", "b", "c"])).await;
        assert_eq!(seed(&state, &["b"]).await, 1);
        let app = create_app(state);

        let (status, _, body) = call(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), ["a", "c"]);

        let (status, _, body) = call(&app, "GET", "/?id=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), ["a", "c"]);
    }

    #[tokio::test]
    async fn uses_requested_user() {
        let state = test_state(StubSource::with(&["a", "b", "c"])).await;
        seed(&state, &[]).await;
        let second = seed(&state, &["a", "c", "stale"]).await;
        let app = create_app(state);

        let (status, _, body) = call(&app, "GET", &format!("/?id={}", second), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), ["b"]);
        assert_eq!(body["result_list"][0]["display_name"], "Unit b");
        assert_eq!(body["result_list"][0]["latest_device_point"]["lat"], 40.0);
    }

    #[tokio::test]
    async fn all_hidden_yields_empty_array() {
        let state = test_state(StubSource::with(&["a"])).await;
        seed(&state, &["a"]).await;
        let app = create_app(state);

        let (status, _, body) = call(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result_list": [] }));
    }

    #[tokio::test]
    async fn invalid_id_is_bad_request() {
        let app = create_app(test_state(StubSource::with(&["a"])).await);

        let (status, headers, body) = call(&app, "GET", "/?id=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid user ID");
        assert!(headers.contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn missing_preference_is_server_error() {
        let app = create_app(test_state(StubSource::with(&["a"])).await);

        let (status, _, body) = call(&app, "GET", "/?id=9", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn provider_failure_is_generic_server_error() {
        let state = test_state(StubSource::failing()).await;
        seed(&state, &[]).await;
        let app = create_app(state);

        let (status, _, body) = call(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch data");
    }
}
