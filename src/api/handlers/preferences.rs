use std::collections::BTreeSet;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::path_user_id;
use crate::{
    error::{AppError, AppResult},
    models::UserPreference,
    services::{
        merge::{resolve, PreferenceKey},
        preferences::PreferenceStore,
    },
    AppState,
};

/// Preference as served to clients; the icon travels as base64 text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceResponse {
    pub username: String,
    pub id: i64,
    pub sort_order: String,
    pub hidden_devices: BTreeSet<String>,
    #[serde(rename = "Icon")]
    pub icon: String,
}

impl From<UserPreference> for PreferenceResponse {
    fn from(pref: UserPreference) -> Self {
        Self {
            username: pref.username.unwrap_or_default(),
            id: pref.id,
            sort_order: pref.sort_order,
            hidden_devices: pref.hidden_devices,
            icon: STANDARD.encode(&pref.icon),
        }
    }
}

/// Body of create and update requests. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default)]
    pub hidden_devices: Option<BTreeSet<String>>,
    #[serde(default, rename = "Icon", alias = "icon")]
    pub icon: Option<String>,
}

impl PreferenceRequest {
    fn parse(body: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Bad request data: {}", e)))
    }

    /// The caller's id never reaches the store; `id` is what the path (or
    /// the store, on create) says it is.
    fn into_preference(self, id: i64) -> AppResult<UserPreference> {
        let icon = match self.icon.as_deref() {
            None | Some("") => Vec::new(),
            Some(encoded) => STANDARD
                .decode(encoded)
                .map_err(|e| AppError::BadRequest(format!("Bad request data: icon: {}", e)))?,
        };

        Ok(UserPreference {
            id,
            username: self.username.filter(|u| !u.is_empty()),
            sort_order: self.sort_order.unwrap_or_default(),
            hidden_devices: self.hidden_devices.unwrap_or_default(),
            icon,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

pub async fn get_preference(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<PreferenceResponse>> {
    let user_id = path_user_id(path)?;

    let store = PreferenceStore::new(state.db.clone());
    let pref = resolve(&store, &PreferenceKey::Id(user_id))
        .await
        .map_err(AppError::not_found_as_internal)?;

    Ok(Json(pref.into()))
}

pub async fn get_preference_by_username(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<PreferenceResponse>> {
    let Path(username) =
        path.map_err(|e| AppError::BadRequest(format!("Invalid username: {}", e)))?;
    if username.is_empty() || username.contains('/') {
        return Err(AppError::BadRequest("Invalid URL format".to_string()));
    }

    let store = PreferenceStore::new(state.db.clone());
    let pref = resolve(&store, &PreferenceKey::Username(username)).await?;

    Ok(Json(pref.into()))
}

pub async fn missing_username() -> AppError {
    AppError::BadRequest("Invalid URL format".to_string())
}

pub async fn create_preference(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let pref = PreferenceRequest::parse(&body)?.into_preference(0)?;

    let id = PreferenceStore::new(state.db.clone()).create(&pref).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// POST only (OPTIONS never gets here, the CORS middleware answers it);
/// the id in the path wins over any id in the body.
pub async fn update_preference(
    State(state): State<AppState>,
    method: Method,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> AppResult<Response> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let user_id = path_user_id(path)?;
    let pref = PreferenceRequest::parse(&body)?.into_preference(user_id)?;

    PreferenceStore::new(state.db.clone()).update(&pref).await?;

    Ok(Json(MessageResponse {
        message: "Preference updated successfully".to_string(),
    })
    .into_response())
}
