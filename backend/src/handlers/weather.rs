//! HTTP handlers for weather and pollution lookups

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::StoredReading;

use crate::error::{AppError, AppResult};
use crate::external::weather::CurrentConditions;
use crate::middleware::OptionalUser;
use crate::services::ReadingService;
use crate::AppState;

/// Location query; values stay strings so bad input gets our own 400
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub soil: Option<String>,
    pub soil_moisture: Option<String>,
}

impl LocationQuery {
    fn coordinates(&self) -> AppResult<(f64, f64)> {
        let parse = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };
        match (parse(&self.lat), parse(&self.lon)) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(AppError::Validation("lat & lon required".to_string())),
        }
    }

    /// Soil moisture from `soil` or `soil_moisture`, in that order.
    ///
    /// Absent or blank is `None`; anything else must parse as a number.
    fn soil_moisture(&self) -> AppResult<Option<f64>> {
        let raw = self
            .soil
            .as_deref()
            .or(self.soil_moisture.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match raw {
            None => Ok(None),
            Some(value) => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| AppError::Validation("soil_moisture must be numeric".to_string())),
        }
    }
}

/// Current weather at a location
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<CurrentConditions>> {
    let (lat, lon) = query.coordinates()?;
    let service = ReadingService::new(state.store.clone(), state.weather.clone());
    Ok(Json(service.current_weather(lat, lon).await?))
}

/// Fetch pollution at a location and store it as a reading
pub async fn get_pollution(
    State(state): State<AppState>,
    user: OptionalUser,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<StoredReading>> {
    let (lat, lon) = query.coordinates()?;
    let soil_moisture = query.soil_moisture()?;

    let service = ReadingService::new(state.store.clone(), state.weather.clone());
    let reading = service
        .fetch_pollution(lat, lon, soil_moisture, user.user_id())
        .await?;
    Ok(Json(reading))
}
