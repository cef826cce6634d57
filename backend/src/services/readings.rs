//! Pollution fetches and stored readings

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use shared::{coerce_number, dominant_pollutant, HistoryPage, StoredReading};

use crate::error::{AppError, AppResult};
use crate::external::weather::CurrentConditions;
use crate::external::WeatherClient;
use crate::store::Store;

/// Service for environment readings
#[derive(Clone)]
pub struct ReadingService {
    store: Arc<Store>,
    weather: WeatherClient,
}

/// Sensor submission. Every field is optional; numeric strings are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct ManualReadingInput {
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lng: Option<Value>,
    #[serde(default)]
    pub aqi: Option<Value>,
    #[serde(default)]
    pub pm25: Option<Value>,
    #[serde(default)]
    pub pm10: Option<Value>,
    #[serde(default)]
    pub co: Option<Value>,
    #[serde(default)]
    pub no2: Option<Value>,
    #[serde(default)]
    pub o3: Option<Value>,
    #[serde(default)]
    pub nh3: Option<Value>,
    #[serde(default)]
    pub soil_moisture: Option<Value>,
}

fn number(value: &Option<Value>) -> Option<f64> {
    value.as_ref().and_then(coerce_number)
}

/// Upstream failures become a generic message; a missing key keeps its own
fn upstream(context: &str) -> impl Fn(AppError) -> AppError + '_ {
    move |e| match e {
        AppError::Configuration(_) => e,
        other => AppError::ExternalService {
            context: context.to_string(),
            details: other.to_string(),
        },
    }
}

impl ReadingService {
    pub fn new(store: Arc<Store>, weather: WeatherClient) -> Self {
        Self { store, weather }
    }

    /// Current conditions at a location
    pub async fn current_weather(&self, lat: f64, lon: f64) -> AppResult<CurrentConditions> {
        self.weather
            .current_weather(lat, lon)
            .await
            .map_err(upstream("Weather fetch failed"))
    }

    /// Fetch pollution and weather for a location and store the combined reading
    pub async fn fetch_pollution(
        &self,
        lat: f64,
        lon: f64,
        soil_moisture: Option<f64>,
        user_id: Option<i64>,
    ) -> AppResult<StoredReading> {
        let pollution = self
            .weather
            .air_pollution(lat, lon)
            .await
            .map_err(upstream("Pollution fetch failed"))?;
        let conditions = self
            .weather
            .current_weather(lat, lon)
            .await
            .map_err(upstream("Pollution fetch failed"))?;

        let mut reading = StoredReading::at(Utc::now());
        reading.user_id = user_id;
        reading.aqi = pollution.aqi;
        reading.main_pollutant = dominant_pollutant(&pollution.components);
        reading.components = Some(pollution.components);
        reading.humidity = conditions.humidity;
        reading.soil_moisture = soil_moisture;
        reading.weather = Some(conditions.condition);
        reading.city = Some(conditions.city);
        reading.raw = Some(pollution.raw);

        self.store.readings.append(reading.clone()).await?;
        tracing::debug!(
            "Stored pollution reading city={:?} aqi={:?} user={:?}",
            reading.city,
            reading.aqi,
            reading.user_id
        );
        Ok(reading)
    }

    /// Store a manual sensor reading for `user_id`
    pub async fn record_manual(
        &self,
        user_id: i64,
        input: ManualReadingInput,
    ) -> AppResult<StoredReading> {
        let now = Utc::now();
        let mut reading = StoredReading::at(now);
        reading.id = Some(now.timestamp_millis());
        reading.user_id = Some(user_id);
        reading.lat = number(&input.lat);
        reading.lng = number(&input.lng);
        reading.aqi = number(&input.aqi);
        reading.pm25 = number(&input.pm25);
        reading.pm10 = number(&input.pm10);
        reading.co = number(&input.co);
        reading.no2 = number(&input.no2);
        reading.o3 = number(&input.o3);
        reading.nh3 = number(&input.nh3);
        reading.soil_moisture = number(&input.soil_moisture);

        self.store.readings.append(reading.clone()).await?;
        Ok(reading)
    }

    pub async fn latest(&self, user_id: i64) -> AppResult<Option<StoredReading>> {
        Ok(self.store.readings.latest_for_user(user_id).await?)
    }

    /// A page of readings, newest first, restricted to `user_id` when given
    pub async fn history(
        &self,
        user_id: Option<i64>,
        page: HistoryPage,
    ) -> AppResult<Vec<StoredReading>> {
        Ok(self.store.readings.history(user_id, page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;
    use serde_json::json;

    fn service(dir: &std::path::Path) -> ReadingService {
        ReadingService::new(
            Arc::new(Store::in_dir(dir, 2000)),
            WeatherClient::new(&WeatherConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_manual_reading_coerces_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let input: ManualReadingInput = serde_json::from_value(json!({
            "aqi": 3,
            "pm25": "18.5",
            "soil_moisture": 0,
            "co": "n/a"
        }))
        .unwrap();
        let reading = service.record_manual(7, input).await.unwrap();

        assert_eq!(reading.user_id, Some(7));
        assert_eq!(reading.aqi, Some(3.0));
        assert_eq!(reading.pm25, Some(18.5));
        assert_eq!(reading.soil_moisture, Some(0.0));
        assert_eq!(reading.co, None);
        assert!(reading.id.is_some());

        let latest = service.latest(7).await.unwrap().unwrap();
        assert_eq!(latest, reading);
    }

    #[tokio::test]
    async fn test_pollution_without_key_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = service(dir.path())
            .fetch_pollution(18.79, 98.98, None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.to_string(), "Configuration error: OpenWeatherMap key not configured");
    }

    #[test]
    fn test_upstream_failure_is_generic() {
        let err = upstream("Weather fetch failed")(AppError::Internal("boom".to_string()));
        assert!(matches!(
            err,
            AppError::ExternalService { ref context, .. } if context == "Weather fetch failed"
        ));
    }
}
