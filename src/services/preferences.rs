use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{PreferenceRow, UserPreference},
};

/// Persistence for `user_preferences`, one record per user id.
#[derive(Clone)]
pub struct PreferenceStore {
    db: SqlitePool,
}

impl PreferenceStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get the preference record for a user id
    pub async fn get(&self, user_id: i64) -> AppResult<UserPreference> {
        let row: Option<PreferenceRow> = sqlx::query_as(
            "SELECT id, username, sort_order, hidden_devices, icon FROM user_preferences WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let pref = UserPreference::try_from(row.ok_or(AppError::PreferenceNotFound)?)?;
        tracing::debug!(user_id, sort_order = %pref.sort_order, "fetched user preferences");
        Ok(pref)
    }

    /// Get the preference record for a username. Usernames are not unique;
    /// the lowest id wins.
    pub async fn get_by_username(&self, username: &str) -> AppResult<UserPreference> {
        let row: Option<PreferenceRow> = sqlx::query_as(
            r#"
            SELECT id, username, sort_order, hidden_devices, icon
            FROM user_preferences WHERE username = ?
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        let pref = UserPreference::try_from(row.ok_or(AppError::PreferenceNotFound)?)?;
        tracing::debug!(username, user_id = pref.id, "fetched user preferences by username");
        Ok(pref)
    }

    /// Insert a new record and return the id the store assigned to it.
    pub async fn create(&self, pref: &UserPreference) -> AppResult<i64> {
        let hidden_devices = pref.hidden_devices_json()?;

        let result = sqlx::query(
            "INSERT INTO user_preferences (username, sort_order, hidden_devices, icon) VALUES (?, ?, ?, ?)",
        )
        .bind(&pref.username)
        .bind(&pref.sort_order)
        .bind(&hidden_devices)
        .bind(&pref.icon)
        .execute(&self.db)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(user_id = id, "created user preferences");
        Ok(id)
    }

    /// Overwrite sort order, hidden devices and icon for `pref.id`.
    /// Updating an id with no record is accepted and only logged.
    pub async fn update(&self, pref: &UserPreference) -> AppResult<()> {
        let hidden_devices = pref.hidden_devices_json()?;
        tracing::debug!(user_id = pref.id, %hidden_devices, "updating user preferences");

        let result = sqlx::query(
            "UPDATE user_preferences SET sort_order = ?, hidden_devices = ?, icon = ? WHERE id = ?",
        )
        .bind(&pref.sort_order)
        .bind(&hidden_devices)
        .bind(&pref.icon)
        .bind(pref.id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                user_id = pref.id,
                "no records were updated; the user might not exist"
            );
        } else {
            tracing::info!(user_id = pref.id, "updated user preferences");
        }

        Ok(())
    }
}
