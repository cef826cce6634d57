//! Stored reading models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Components;

/// A reading appended to the readings store.
///
/// Pollution fetches fill the environmental fields and `raw`; manual readings
/// fill the per-pollutant fields instead. Both share this record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub aqi: Option<f64>,
    #[serde(default)]
    pub main_pollutant: Option<String>,
    #[serde(default)]
    pub components: Option<Components>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub raw: Option<Value>,

    // Manual sensor submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm25: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nh3: Option<f64>,
}

impl StoredReading {
    /// Empty reading stamped at `timestamp`
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            timestamp,
            user_id: None,
            aqi: None,
            main_pollutant: None,
            components: None,
            humidity: None,
            soil_moisture: None,
            weather: None,
            city: None,
            category: None,
            raw: None,
            lat: None,
            lng: None,
            pm25: None,
            pm10: None,
            co: None,
            no2: None,
            o3: None,
            nh3: None,
        }
    }

    pub fn belongs_to(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Pollutant with the highest concentration, if any
pub fn dominant_pollutant(components: &Components) -> Option<String> {
    components
        .iter()
        .filter(|(_, value)| value.is_finite())
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(name, _)| name.clone())
}
