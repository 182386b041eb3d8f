use std::collections::BTreeSet;

use sqlx::FromRow;

use crate::error::{AppError, AppResult};

/// Per-user display preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreference {
    pub id: i64,
    pub username: Option<String>,
    pub sort_order: String,
    pub hidden_devices: BTreeSet<String>,
    pub icon: Vec<u8>,
}

impl UserPreference {
    /// JSON text stored in the `hidden_devices` column.
    pub fn hidden_devices_json(&self) -> AppResult<String> {
        serde_json::to_string(&self.hidden_devices).map_err(|e| AppError::Internal(e.into()))
    }
}

/// Raw `user_preferences` row. Every column but the key is nullable.
#[derive(Debug, Clone, FromRow)]
pub struct PreferenceRow {
    pub id: i64,
    pub username: Option<String>,
    pub sort_order: Option<String>,
    pub hidden_devices: Option<String>,
    pub icon: Option<Vec<u8>>,
}

impl TryFrom<PreferenceRow> for UserPreference {
    type Error = AppError;

    fn try_from(row: PreferenceRow) -> AppResult<Self> {
        let hidden_devices = match row.hidden_devices.as_deref() {
            None | Some("") => BTreeSet::new(),
            Some(text) => serde_json::from_str::<Option<BTreeSet<String>>>(text)
                .map_err(AppError::CorruptData)?
                .unwrap_or_default(),
        };

        Ok(UserPreference {
            id: row.id,
            username: row.username.filter(|u| !u.is_empty()),
            sort_order: row.sort_order.unwrap_or_default(),
            hidden_devices,
            icon: row.icon.unwrap_or_default(),
        })
    }
}
