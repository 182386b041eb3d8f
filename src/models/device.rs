use serde::{Deserialize, Deserializer, Serialize};

/// A tracked asset as reported by the telemetry provider.
///
/// Provider records are decoded leniently: a missing or `null` field takes
/// its zero value, so one incomplete record never fails the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "device_id", default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(rename = "display_name", default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(
        rename = "latest_device_point",
        default,
        deserialize_with = "null_default"
    )]
    pub position: Position,
    #[serde(rename = "active_state", default, deserialize_with = "null_default")]
    pub active_state: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "lat", default, deserialize_with = "null_default")]
    pub latitude: f64,
    #[serde(rename = "lng", default, deserialize_with = "null_default")]
    pub longitude: f64,
}

/// Provider envelope; also the response shape of the device listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceList {
    #[serde(rename = "result_list", default, deserialize_with = "null_default")]
    pub devices: Vec<Device>,
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
