//! Weather API client for fetching weather and air pollution data
//!
//! Integrates with the OpenWeatherMap current weather and air pollution APIs

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use shared::Components;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

/// Current conditions as returned to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub condition: String,
    pub city: String,
}

/// Air quality at a location
#[derive(Debug, Clone)]
pub struct AirPollution {
    /// OpenWeatherMap AQI on its 1-5 scale
    pub aqi: Option<f64>,
    pub components: Components,
    /// Untouched API response
    pub raw: Value,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Default, Deserialize)]
struct OWMCurrentResponse {
    #[serde(default)]
    weather: Vec<OWMWeather>,
    #[serde(default)]
    main: Option<OWMMain>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    #[serde(default)]
    main: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

/// OpenWeatherMap API response for air pollution
#[derive(Debug, Default, Deserialize)]
struct OWMPollutionResponse {
    #[serde(default)]
    list: Vec<OWMPollutionItem>,
}

#[derive(Debug, Deserialize)]
struct OWMPollutionItem {
    #[serde(default)]
    main: Option<OWMPollutionMain>,
    #[serde(default)]
    components: Components,
}

#[derive(Debug, Deserialize)]
struct OWMPollutionMain {
    aqi: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch current weather conditions by coordinates
    pub async fn current_weather(&self, lat: f64, lon: f64) -> AppResult<CurrentConditions> {
        let raw = self.get_json("weather", lat, lon, true).await?;
        let data: OWMCurrentResponse = parse(raw)?;
        Ok(convert_current_response(data))
    }

    /// Fetch current air pollution by coordinates
    pub async fn air_pollution(&self, lat: f64, lon: f64) -> AppResult<AirPollution> {
        let raw = self.get_json("air_pollution", lat, lon, false).await?;
        let data: OWMPollutionResponse = parse(raw.clone())?;
        let first = data.list.into_iter().next();

        Ok(AirPollution {
            aqi: first.as_ref().and_then(|item| item.main.as_ref()).and_then(|m| m.aqi),
            components: first.map(|item| item.components).unwrap_or_default(),
            raw,
        })
    }

    async fn get_json(&self, endpoint: &str, lat: f64, lon: f64, metric: bool) -> AppResult<Value> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("OpenWeatherMap key not configured".to_string())
        })?;

        let url = format!("{}/{}", self.base_url, endpoint);
        let mut query = vec![
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", api_key.to_string()),
        ];
        if metric {
            query.push(("units", "metric".to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse weather response: {}", e)))
    }
}

fn parse<T: DeserializeOwned>(raw: Value) -> AppResult<T> {
    serde_json::from_value(raw)
        .map_err(|e| AppError::Internal(format!("Unexpected weather response shape: {}", e)))
}

/// Convert OpenWeatherMap current response to our format
fn convert_current_response(data: OWMCurrentResponse) -> CurrentConditions {
    let weather = data.weather.first();
    let condition = weather
        .and_then(|w| w.main.clone().filter(|m| !m.is_empty()))
        .or_else(|| weather.and_then(|w| w.description.clone()))
        .unwrap_or_default();

    CurrentConditions {
        temperature: data.main.as_ref().and_then(|m| m.temp),
        humidity: data.main.as_ref().and_then(|m| m.humidity),
        condition,
        city: data.name.unwrap_or_default(),
    }
}
