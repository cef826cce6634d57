//! Environmental snapshot models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Coordinates;

/// Pollutant name to concentration (μg/m³), e.g. `pm2_5`, `no2`
pub type Components = BTreeMap<String, f64>;

/// Normalized environmental reading sent to the recommendation provider.
///
/// Built per request and never persisted. Every field may be unknown; absent
/// values serialize as `null` so the provider sees the full shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentSnapshot {
    pub aqi: Option<f64>,
    pub humidity: Option<f64>,
    pub temp: Option<f64>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub components: Option<Components>,
    pub main_pollutant: Option<String>,
    pub soil_moisture: Option<f64>,
    pub coords: Option<Coordinates>,
    pub pollution_value: Option<f64>,
}

impl EnvironmentSnapshot {
    /// Fill `pollution_value` from the snapshot's own aqi and components
    pub fn with_pollution_value(mut self) -> Self {
        self.pollution_value =
            crate::pollution::estimate_pollution_score(self.aqi, self.components.as_ref());
        self
    }
}
