use std::collections::BTreeSet;

use crate::{
    error::AppResult,
    models::{Device, UserPreference},
    services::preferences::PreferenceStore,
};

/// Drop every device whose id is in `hidden`, keeping provider order.
pub fn visible_devices(devices: Vec<Device>, hidden: &BTreeSet<String>) -> Vec<Device> {
    if hidden.is_empty() {
        return devices;
    }
    devices
        .into_iter()
        .filter(|device| !hidden.contains(&device.id))
        .collect()
}

/// How a caller identifies whose preferences to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceKey {
    Id(i64),
    Username(String),
}

pub async fn resolve(store: &PreferenceStore, key: &PreferenceKey) -> AppResult<UserPreference> {
    match key {
        PreferenceKey::Id(id) => store.get(*id).await,
        PreferenceKey::Username(username) => store.get_by_username(username).await,
    }
}
